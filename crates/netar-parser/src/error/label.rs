//! Source spans annotated with a message.

use crate::span::Span;

/// A message pinned to a region of the DSL source.
///
/// A diagnostic has one primary label marking the offending text and may
/// carry secondary labels pointing at related places, such as the earlier
/// definition of a device that is declared twice:
///
/// ```text
/// error[E300]: device `R1` is defined more than once
///   |
/// 3 |   device R1 router { }
///   |          -- first defined here
/// 7 |   device R1 switch { }
///   |          ^^ duplicate definition
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    primary: bool,
}

impl Label {
    /// Label marking the main location of a diagnostic.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            primary: true,
        }
    }

    /// Label adding context next to the primary one.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.primary
    }
}
