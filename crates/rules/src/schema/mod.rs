//! Externally-facing rule group document types.
//!
//! - `RuleGroupConfig`: one group with its interval and rule nodes
//! - `NamespaceConfig`: namespace display name -> groups
//! - `RuleNode`: one rule, policy enums in wire vocabulary
//! - `RuleInterval`: Prometheus-style duration (`1m`, `1h30m`)

mod duration;
mod group;
mod node;

pub use duration::*;
pub use group::*;
pub use node::*;
