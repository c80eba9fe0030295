//! Error types for topology model operations.

use thiserror::Error;

/// Errors raised when an operation would break a [`Network`](crate::Network) invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("device `{0}` is defined more than once")]
    DuplicateDevice(String),
}
