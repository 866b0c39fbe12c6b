//! Single-pass group folds at the three supported granularities.

use std::collections::hash_map::Entry as HashEntry;
use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use ruler_core::AlertRule;

use crate::schema::{NamespaceConfig, RuleGroupConfig, RuleInterval, RuleNode};
use crate::translate::{rule_interval, to_rule_node};

use super::error::{AggregateError, Result};

/// Accumulator for one group while folding.
///
/// The first rule seen fixes the group's interval; every later member
/// must agree with it.
struct GroupBuilder {
    name: String,
    interval: RuleInterval,
    rules: Vec<RuleNode>,
}

impl GroupBuilder {
    fn start(rule: &AlertRule) -> Self {
        Self {
            name: rule.rule_group.clone(),
            interval: rule_interval(rule),
            rules: vec![to_rule_node(rule)],
        }
    }

    fn push(&mut self, rule: &AlertRule) -> Result<()> {
        let found = rule_interval(rule);
        if found != self.interval {
            return Err(AggregateError::IntervalMismatch {
                group: self.name.clone(),
                rule_uid: rule.uid.clone(),
                expected: self.interval,
                found,
            });
        }
        self.rules.push(to_rule_node(rule));
        Ok(())
    }

    fn finish(self) -> RuleGroupConfig {
        RuleGroupConfig {
            name: self.name,
            interval: self.interval,
            rules: self.rules,
        }
    }
}

/// Build one group document from rules already filtered to that group.
///
/// `name` is the requested group name. Rules keep their input order; an
/// empty input yields an empty group with a zero interval.
pub fn build_group(name: &str, rules: &[AlertRule]) -> Result<RuleGroupConfig> {
    let mut iter = rules.iter();
    let Some(first) = iter.next() else {
        return Ok(RuleGroupConfig::new(name, RuleInterval::default()));
    };

    let mut builder = GroupBuilder::start(first);
    builder.name = name.to_string();
    for rule in iter {
        builder.push(rule)?;
    }
    Ok(builder.finish())
}

/// Partition rules of a single namespace by group name.
///
/// Groups come back sorted by name; members keep input order.
pub fn group_rules(rules: &[AlertRule]) -> Result<Vec<RuleGroupConfig>> {
    let mut groups: BTreeMap<&str, GroupBuilder> = BTreeMap::new();

    for rule in rules {
        match groups.get_mut(rule.rule_group.as_str()) {
            Some(builder) => builder.push(rule)?,
            None => {
                groups.insert(rule.rule_group.as_str(), GroupBuilder::start(rule));
            }
        }
    }

    Ok(groups.into_values().map(GroupBuilder::finish).collect())
}

/// One-namespace document keyed by the namespace as the caller named it.
///
/// No rules means no key, matching an org-wide read of an empty namespace.
pub fn namespace_config(namespace: &str, rules: &[AlertRule]) -> Result<NamespaceConfig> {
    let groups = group_rules(rules)?;
    let mut config = NamespaceConfig::new();
    if !groups.is_empty() {
        config.insert(namespace.to_string(), groups);
    }
    Ok(config)
}

/// Two-level document over rules from any number of namespaces.
///
/// `display_name` maps a namespace UID to the key used in the output. It is
/// called once per distinct UID, in order of first appearance; its first
/// failure aborts the whole fold. Groups are keyed by
/// `(namespace_uid, rule_group)`, so two namespaces that share a display
/// name never merge their groups.
pub fn org_config<F, E>(rules: &[AlertRule], mut display_name: F) -> std::result::Result<NamespaceConfig, E>
where
    F: FnMut(&str) -> std::result::Result<String, E>,
    E: From<AggregateError>,
{
    let mut names: HashMap<&str, String> = HashMap::new();
    let mut groups: BTreeMap<(&str, &str), GroupBuilder> = BTreeMap::new();

    for rule in rules {
        if let HashEntry::Vacant(slot) = names.entry(rule.namespace_uid.as_str()) {
            slot.insert(display_name(&rule.namespace_uid)?);
        }

        let key = (rule.namespace_uid.as_str(), rule.rule_group.as_str());
        match groups.get_mut(&key) {
            Some(builder) => builder.push(rule)?,
            None => {
                groups.insert(key, GroupBuilder::start(rule));
            }
        }
    }

    let mut config = NamespaceConfig::new();
    for ((namespace_uid, _), builder) in groups {
        let display = names
            .get(namespace_uid)
            .cloned()
            .unwrap_or_else(|| namespace_uid.to_string());
        config.entry(display).or_default().push(builder.finish());
    }
    for groups in config.values_mut() {
        groups.sort_by(|a, b| a.name.cmp(&b.name));
    }

    debug!(
        rules = rules.len(),
        namespaces = config.len(),
        "aggregated org rule groups"
    );
    Ok(config)
}
