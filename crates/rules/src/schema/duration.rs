//! Prometheus-style duration used for group evaluation intervals.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

const MS_PER_SECOND: u64 = 1000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;
const MS_PER_WEEK: u64 = 7 * MS_PER_DAY;
const MS_PER_YEAR: u64 = 365 * MS_PER_DAY;

/// Units in the only order they may appear, with whether a value must divide
/// exactly to be rendered with that unit.
const UNITS: &[(&str, u64, bool)] = &[
    ("y", MS_PER_YEAR, true),
    ("w", MS_PER_WEEK, true),
    ("d", MS_PER_DAY, false),
    ("h", MS_PER_HOUR, false),
    ("m", MS_PER_MINUTE, false),
    ("s", MS_PER_SECOND, false),
    ("ms", 1, false),
];

/// Evaluation cadence of a rule group, written as `1m`, `1h30m`, `0s`, ...
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleInterval(Duration);

impl RuleInterval {
    /// Largest interval whose millisecond count fits in a `u64`, and so the
    /// largest one that parses back from its own text.
    pub const MAX_SECS: u64 = u64::MAX / MS_PER_SECOND;

    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    /// Whole seconds; sub-second remainders are dropped.
    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl fmt::Display for RuleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ms = self.0.as_millis();
        if ms == 0 {
            return write!(f, "0s");
        }
        for &(unit, mult, exact) in UNITS {
            let mult = u128::from(mult);
            if exact && ms % mult != 0 {
                continue;
            }
            let v = ms / mult;
            if v > 0 {
                write!(f, "{}{}", v, unit)?;
                ms -= v * mult;
            }
        }
        Ok(())
    }
}

impl FromStr for RuleInterval {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == "0" {
            return Ok(Self::default());
        }
        if s.is_empty() {
            return Err("empty duration string".to_string());
        }

        let bytes = s.as_bytes();
        let mut pos = 0;
        let mut next_unit = 0;
        let mut total: u64 = 0;

        while pos < bytes.len() {
            let start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if start == pos {
                return Err(format!("not a valid duration string: '{}'", s));
            }
            let value: u64 = s[start..pos]
                .parse()
                .map_err(|_| format!("duration out of range: '{}'", s))?;

            let unit_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
                pos += 1;
            }
            let unit = &s[unit_start..pos];

            let idx = UNITS[next_unit..]
                .iter()
                .position(|(u, _, _)| *u == unit)
                .map(|i| i + next_unit)
                .ok_or_else(|| format!("not a valid duration string: '{}'", s))?;
            next_unit = idx + 1;

            let part = value
                .checked_mul(UNITS[idx].1)
                .ok_or_else(|| format!("duration out of range: '{}'", s))?;
            total = total
                .checked_add(part)
                .ok_or_else(|| format!("duration out of range: '{}'", s))?;
        }

        Ok(Self(Duration::from_millis(total)))
    }
}

impl Serialize for RuleInterval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RuleInterval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
