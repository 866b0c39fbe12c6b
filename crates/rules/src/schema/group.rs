//! Rule group and namespace documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{RuleInterval, RuleNode};

/// A named, ordered collection of rules sharing one evaluation interval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleGroupConfig {
    pub name: String,
    #[serde(default)]
    pub interval: RuleInterval,
    #[serde(default)]
    pub rules: Vec<RuleNode>,
}

impl RuleGroupConfig {
    pub fn new(name: impl Into<String>, interval: RuleInterval) -> Self {
        Self {
            name: name.into(),
            interval,
            rules: Vec::new(),
        }
    }

    /// Non-empty rule UIDs in payload order.
    pub fn rule_uids(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.uid()).filter(|uid| !uid.is_empty())
    }
}

/// Namespace display name -> groups in that namespace.
pub type NamespaceConfig = BTreeMap<String, Vec<RuleGroupConfig>>;

/// Acknowledgement body for write operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
