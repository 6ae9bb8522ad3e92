//! Error types for the ACL manager

use thiserror::Error;

/// Result type alias for ACL operations
pub type Result<T> = std::result::Result<T, AuthzError>;

/// Errors raised while building an ACL manager or its collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// An owner principal was empty
    #[error("{role} owner must not be empty")]
    EmptyOwner { role: &'static str },

    /// A configuration value could not be interpreted
    #[error("invalid value for '{key}': {reason}")]
    InvalidConfig { key: String, reason: String },

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthzError {
    fn from(err: anyhow::Error) -> Self {
        AuthzError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AuthzError {
    fn from(err: serde_json::Error) -> Self {
        AuthzError::InvalidConfig {
            key: "<json>".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Failure reported by a group provider
///
/// Never escapes an access check: the check logs it and carries on
/// without a group grant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("no groups found for user '{user}'")]
    NoGroups { user: String },

    #[error("group backend failed for user '{user}': {reason}")]
    Backend { user: String, reason: String },

    #[error("group lookup for user '{user}' timed out after {timeout_ms}ms")]
    Timeout { user: String, timeout_ms: u64 },
}

impl LookupError {
    /// The user whose lookup failed
    pub fn user(&self) -> &str {
        match self {
            LookupError::NoGroups { user }
            | LookupError::Backend { user, .. }
            | LookupError::Timeout { user, .. } => user,
        }
    }
}
