//! # NETAR Parser
//!
//! Parser for the NETAR network topology language. This crate provides the
//! pipeline from source text to the [`netar_core::Network`] IR.
//!
//! ## Usage
//!
//! ```
//! # use netar_parser::{parse, Grammar, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         network Lab {
//!             device R1 router { interface Gi0/0 { ip 10.0.0.1 } }
//!             device PC1 pc { interface Fa0 { ip dhcp } }
//!             link R1.Gi0/0 -> PC1.Fa0 { cable straightThrough }
//!         }
//!     "#;
//!
//!     let grammar = Grammar::new();
//!     let network = parse(source, &grammar)?.into_value();
//!     assert_eq!(network.devices().len(), 2);
//!     Ok(())
//! }
//! ```

mod elaborate;
pub mod error;
mod grammar;
mod lexer;
mod parser;
pub mod parser_types;
mod span;
mod tokens;

pub use error::ParseError;
pub use grammar::Grammar;
pub use lexer::tokenize;
pub use span::{Span, Spanned};
pub use tokens::{Keyword, PositionedToken, Symbol, Token, TokenKind};

use log::info;

use netar_core::{Network, Outcome};

use elaborate::Builder;

/// Parse source text into a network.
///
/// This is the main entry point for the topology language. It runs the
/// complete pipeline:
///
/// 1. **Tokenize** - Convert source text to tokens
/// 2. **Parse** - Build the syntax tree from tokens
/// 3. **Elaborate** - Convert values and build the IR
///
/// Links to undeclared devices do not fail the parse; they are returned as
/// warnings alongside the network.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every lexical error, the first syntax
/// error, or every elaboration error, each with its source span.
pub fn parse(source: &str, grammar: &Grammar) -> Result<Outcome<Network>, ParseError> {
    // Step 1: Tokenize
    let tokens = lexer::tokenize(source, grammar)?;

    // Step 2: Parse
    let ast = parser::build_network(&tokens)?;

    // Step 3: Elaborate
    let outcome = Builder::new(grammar).build(&ast)?;

    info!(
        network = outcome.value().name(),
        warnings = outcome.warnings().len();
        "Topology source parsed"
    );
    Ok(outcome)
}
