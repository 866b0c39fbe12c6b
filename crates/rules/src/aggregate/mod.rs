//! Rule group aggregation.
//!
//! Folds a flat, ordered sequence of [`ruler_core::AlertRule`] rows into
//! group documents at three granularities:
//! - single group: [`build_group`]
//! - one namespace: [`group_rules`] / [`namespace_config`]
//! - whole organization: [`org_config`]
//!
//! Every path requires all members of a group to share one interval and
//! fails with [`AggregateError::IntervalMismatch`] otherwise.

mod error;
mod fold;

#[cfg(test)]
mod tests;

pub use self::error::{AggregateError, Result};
pub use self::fold::{build_group, group_rules, namespace_config, org_config};
