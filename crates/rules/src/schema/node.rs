//! Externally-facing rule node and its policy vocabulary.

use serde::{Deserialize, Serialize};

use ruler_core::{ExecutionErrorState, NoDataState, OrgId, RuleUid};

/// No-data policy as spelled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApiNoDataState {
    Alerting,
    #[default]
    NoData,
    KeepLastState,
    #[serde(rename = "OK")]
    Ok,
}

impl From<NoDataState> for ApiNoDataState {
    fn from(s: NoDataState) -> Self {
        match s {
            NoDataState::Alerting => ApiNoDataState::Alerting,
            NoDataState::NoData => ApiNoDataState::NoData,
            NoDataState::KeepLastState => ApiNoDataState::KeepLastState,
            NoDataState::Ok => ApiNoDataState::Ok,
        }
    }
}

impl From<ApiNoDataState> for NoDataState {
    fn from(s: ApiNoDataState) -> Self {
        match s {
            ApiNoDataState::Alerting => NoDataState::Alerting,
            ApiNoDataState::NoData => NoDataState::NoData,
            ApiNoDataState::KeepLastState => NoDataState::KeepLastState,
            ApiNoDataState::Ok => NoDataState::Ok,
        }
    }
}

/// Execution-error policy as spelled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApiExecutionErrorState {
    #[default]
    Alerting,
    KeepLastState,
}

impl From<ExecutionErrorState> for ApiExecutionErrorState {
    fn from(s: ExecutionErrorState) -> Self {
        match s {
            ExecutionErrorState::Alerting => ApiExecutionErrorState::Alerting,
            ExecutionErrorState::KeepLastState => ApiExecutionErrorState::KeepLastState,
        }
    }
}

impl From<ApiExecutionErrorState> for ExecutionErrorState {
    fn from(s: ApiExecutionErrorState) -> Self {
        match s {
            ApiExecutionErrorState::Alerting => ExecutionErrorState::Alerting,
            ApiExecutionErrorState::KeepLastState => ExecutionErrorState::KeepLastState,
        }
    }
}

/// One rule inside a group document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleNode {
    pub grafana_alert: ManagedAlert,
}

/// Definition of a rule managed by this ruler.
///
/// An empty `uid` in an upsert payload asks the store to create a new rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManagedAlert {
    #[serde(default)]
    pub uid: RuleUid,
    #[serde(rename = "orgId", default)]
    pub org_id: OrgId,
    pub title: String,
    pub condition: String,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub no_data_state: ApiNoDataState,
    #[serde(default)]
    pub exec_err_state: ApiExecutionErrorState,
}

impl RuleNode {
    pub fn uid(&self) -> &str {
        &self.grafana_alert.uid
    }
}
