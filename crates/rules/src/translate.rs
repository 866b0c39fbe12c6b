//! Conversion between stored [`AlertRule`] rows and external [`RuleNode`]s.

use chrono::Utc;

use ruler_core::{AlertRule, OrgId};

use crate::schema::{ManagedAlert, RuleInterval, RuleNode};

/// Translate one stored rule into its external node. Total: never fails.
pub fn to_rule_node(rule: &AlertRule) -> RuleNode {
    RuleNode {
        grafana_alert: ManagedAlert {
            uid: rule.uid.clone(),
            org_id: rule.org_id,
            title: rule.title.clone(),
            condition: rule.condition.clone(),
            data: rule.data.clone(),
            no_data_state: rule.no_data_state.into(),
            exec_err_state: rule.exec_err_state.into(),
        },
    }
}

/// The group cadence a single rule states.
pub fn rule_interval(rule: &AlertRule) -> RuleInterval {
    RuleInterval::from_secs(rule.interval_seconds)
}

/// Build a stored rule from an external node placed in a group.
///
/// The organization always comes from the caller; the node's own `orgId`
/// is ignored. Version and timestamp are fresh and left to the store.
pub fn from_rule_node(
    node: &RuleNode,
    org_id: OrgId,
    namespace_uid: &str,
    rule_group: &str,
    interval: RuleInterval,
) -> AlertRule {
    let alert = &node.grafana_alert;
    AlertRule {
        uid: alert.uid.clone(),
        org_id,
        namespace_uid: namespace_uid.to_string(),
        rule_group: rule_group.to_string(),
        title: alert.title.clone(),
        condition: alert.condition.clone(),
        data: alert.data.clone(),
        interval_seconds: interval.as_secs(),
        no_data_state: alert.no_data_state.into(),
        exec_err_state: alert.exec_err_state.into(),
        updated: Utc::now(),
        version: 0,
    }
}
