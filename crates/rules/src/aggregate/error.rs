//! Error type for rule group aggregation.

use crate::schema::RuleInterval;

/// Errors raised while folding rules into group documents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    /// Members of one group disagree on the evaluation interval.
    #[error("rule group '{group}' has inconsistent intervals: rule '{rule_uid}' has {found}, group has {expected}")]
    IntervalMismatch {
        group: String,
        rule_uid: String,
        expected: RuleInterval,
        found: RuleInterval,
    },
}

/// Result alias for aggregation.
pub type Result<T> = std::result::Result<T, AggregateError>;
