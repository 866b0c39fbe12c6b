use thiserror::Error;

/// Failures reported by rule and namespace store collaborators.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("namespace not found: {0}")]
    NamespaceNotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid rule: {0}")]
    InvalidRule(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NamespaceNotFound(_))
    }
}
