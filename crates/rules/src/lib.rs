//! Rule group aggregation and management for the alerting ruler.
//!
//! This crate provides:
//! - External rule group documents with Prometheus-style intervals
//! - Translation between stored rule rows and external rule nodes
//! - Single-pass grouping by namespace and group name
//! - Store and namespace resolver contracts with an in-memory implementation
//! - The ruler service that composes them, with pluggable upsert policies

pub mod aggregate;
pub mod schema;
pub mod service;
pub mod store;
pub mod translate;

pub use service::{RulerError, RulerService};
