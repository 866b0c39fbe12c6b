//! Error type for ruler service operations.

use ruler_core::StoreError;

use crate::aggregate::AggregateError;

use super::policy::PolicyViolation;

/// Failures of a ruler operation, carrying enough context for the transport
/// to pick a status and a message.
#[derive(Debug, thiserror::Error)]
pub enum RulerError {
    /// A namespace slug or UID did not resolve in the caller's organization.
    #[error("failed to get namespace: {namespace}")]
    Namespace {
        namespace: String,
        #[source]
        source: StoreError,
    },

    /// A store call failed; `op` describes what was attempted.
    #[error("{op}")]
    Store {
        op: &'static str,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Policy(#[from] PolicyViolation),
}

impl RulerError {
    pub(crate) fn store(op: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| RulerError::Store { op, source }
    }

    pub(crate) fn namespace(namespace: &str) -> impl FnOnce(StoreError) -> Self {
        let namespace = namespace.to_string();
        move |source| RulerError::Namespace { namespace, source }
    }

    /// HTTP-style status class. Resolution, store and aggregation failures
    /// are all treated as internal faults.
    pub fn status_code(&self) -> u16 {
        match self {
            RulerError::Policy(PolicyViolation::Invalid(_)) => 400,
            RulerError::Policy(PolicyViolation::Forbidden(_)) => 403,
            RulerError::Namespace { .. } | RulerError::Store { .. } | RulerError::Aggregate(_) => 500,
        }
    }

    /// Message of the underlying cause, if any.
    pub fn cause(&self) -> Option<String> {
        match self {
            RulerError::Namespace { source, .. } | RulerError::Store { source, .. } => {
                Some(source.to_string())
            }
            RulerError::Aggregate(_) | RulerError::Policy(_) => None,
        }
    }
}

/// Result alias for service operations.
pub type Result<T> = std::result::Result<T, RulerError>;
