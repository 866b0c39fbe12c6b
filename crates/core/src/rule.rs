use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Organization identifier. Every lookup is scoped by one.
pub type OrgId = i64;

/// Durable namespace identifier (the folder UID rules point at).
pub type NamespaceUid = String;

/// Rule identifier, unique within an organization.
pub type RuleUid = String;

/// A stored alert rule row.
///
/// Instances handed out by a store are value snapshots; the group key is
/// `(org_id, namespace_uid, rule_group)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertRule {
    pub uid: RuleUid,
    pub org_id: OrgId,
    pub namespace_uid: NamespaceUid,
    pub rule_group: String,
    pub title: String,
    /// Ref id of the query or expression that decides firing.
    pub condition: String,
    /// Query and expression payload, opaque to the ruler.
    #[serde(default)]
    pub data: serde_json::Value,
    pub interval_seconds: u64,
    #[serde(default)]
    pub no_data_state: NoDataState,
    #[serde(default)]
    pub exec_err_state: ExecutionErrorState,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub version: i64,
}

impl AlertRule {
    /// True when this rule belongs to the given group key.
    pub fn in_group(&self, org_id: OrgId, namespace_uid: &str, rule_group: &str) -> bool {
        self.org_id == org_id && self.namespace_uid == namespace_uid && self.rule_group == rule_group
    }
}

/// What a rule reports when its queries return no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NoDataState {
    Alerting,
    #[default]
    NoData,
    KeepLastState,
    #[serde(rename = "OK")]
    Ok,
}

/// What a rule reports when evaluation itself fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExecutionErrorState {
    #[default]
    Alerting,
    KeepLastState,
}
