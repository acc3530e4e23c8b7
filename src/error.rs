//! Error types for the request lifecycle core.

use thiserror::Error;

use crate::models::{RequestStatus, Role};

/// Result type alias using the docket error type.
pub type Result<T> = std::result::Result<T, DocketError>;

/// Main error type for the request lifecycle core.
///
/// Every variant is a recoverable, caller-facing outcome: mutations are
/// all-or-nothing, so a returned error means the record is exactly as it
/// was before the operation.
#[derive(Error, Debug)]
pub enum DocketError {
    /// Record fails one of its invariants
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A required identifier or field was absent from a mutation input
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Status transition rejected before any field was touched
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Malformed wire input
    #[error("Malformed wire form: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Reasons a status transition is rejected.
///
/// Split into distinct variants so callers can tell user-fixable input
/// errors (`MissingOption`, `UnknownStatus`) apart from authorization
/// denials (`PermissionDenied`).
#[derive(Error, Debug)]
pub enum TransitionError {
    /// The actor's role may not move a request into the target status
    #[error("Role '{role}' may not move a request to {target}")]
    PermissionDenied { role: Role, target: RequestStatus },

    /// A per-target required option was not supplied
    #[error("Transition to {target} requires option '{option}'")]
    MissingOption {
        target: RequestStatus,
        option: &'static str,
    },

    /// The target status tag is not a member of the status enum
    #[error("Unknown status: '{0}'")]
    UnknownStatus(String),
}
