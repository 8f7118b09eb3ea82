//! Error types for checksum entry points
//!
//! Classification itself never fails; only the raw-text checksum helpers
//! return these.

use thiserror::Error;

/// Rejection of a candidate number before checksum validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("expected {expected} digits, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("non-digit character {found:?} at position {position}")]
    NonDigit { position: usize, found: char },
}

pub type Result<T> = std::result::Result<T, ValidationError>;
