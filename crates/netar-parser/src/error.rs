//! Diagnostics for the NETAR parsing pipeline.
//!
//! Every phase (lexing, parsing, elaboration) reports problems as
//! [`Diagnostic`]s: a severity, an optional [`ErrorCode`], a message, labeled
//! source spans and optional help. A failed parse returns them wrapped in a
//! [`ParseError`].
//!
//! ```
//! # use netar_parser::error::{Diagnostic, ErrorCode};
//! # use netar_parser::Span;
//! let diag = Diagnostic::error("device `R1` is defined more than once")
//!     .with_code(ErrorCode::E300)
//!     .with_label(Span::new(100..102), "duplicate definition")
//!     .with_secondary_label(Span::new(50..52), "first defined here")
//!     .with_help("rename one of the devices");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;
pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
