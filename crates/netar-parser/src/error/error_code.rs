//! Stable codes attached to parser diagnostics.
//!
//! Codes are grouped by the phase that raises them:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Syntax errors
//! - `E3xx` - Elaboration errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// A string was opened with a quote but never closed on the same line.
    E001,

    /// A character that starts no token.
    E002,

    /// An escape other than `\\`, `\"`, `\n` or `\t` inside a string.
    E003,

    // =========================================================================
    // Syntax Errors (E1xx)
    // =========================================================================
    /// None of the alternatives allowed at this point matched the token.
    E100,

    /// The input ended before the network was closed.
    E101,

    /// Tokens follow the closing brace of the network.
    E102,

    // =========================================================================
    // Elaboration Errors (E3xx)
    // =========================================================================
    /// Two devices share a name.
    E300,

    /// An `ip` value is not a valid dotted-quad IPv4 address.
    E301,

    /// A numeric field holds a value outside its domain.
    ///
    /// Bandwidth must be a non-negative integer; coordinates must be finite.
    E302,
}

impl ErrorCode {
    /// Returns the code as written in diagnostics (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unexpected end of input",
            ErrorCode::E102 => "trailing input",
            ErrorCode::E300 => "duplicate device",
            ErrorCode::E301 => "invalid IPv4 address",
            ErrorCode::E302 => "invalid numeric value",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E102.to_string(), "E102");
        assert_eq!(ErrorCode::E302.to_string(), "E302");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "unterminated string literal");
        assert_eq!(ErrorCode::E101.description(), "unexpected end of input");
        assert_eq!(ErrorCode::E300.description(), "duplicate device");
    }
}
