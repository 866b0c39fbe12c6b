//! Ruler service: the six namespace/group operations.
//!
//! Each operation is a thin composition: resolve the namespace slug in the
//! caller's organization, call the store, and for reads fold the rows into
//! group documents. Upserts pass through an [`UpsertPolicy`] first.

mod core;
mod error;
mod policy;


pub use self::core::RulerService;
pub use self::error::{Result, RulerError};
pub use self::policy::{
    default_policy, AllowAll, NonEmptyGroupName, PolicyChain, PolicyViolation, RequireRole,
    UniqueRuleUids, UpsertPolicy, WholeSecondInterval,
};
