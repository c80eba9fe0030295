//! Error types for NETAR operations.
//!
//! This module provides the main error type [`NetarError`] which wraps the
//! failures of every conversion stage.

use std::io;

use thiserror::Error;

use netar_parser::error::ParseError;

use crate::xml::{EncodeError, SchemaError};

/// The main error type for NETAR operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the diagnostics so a
/// caller can render labeled snippets.
#[derive(Debug, Error)]
pub enum NetarError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("XML schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("XML encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetarError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
