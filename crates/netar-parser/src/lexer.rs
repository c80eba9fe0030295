//! Lexical analyzer for topology source text.
//!
//! The lexer turns source text into [`PositionedToken`]s. Whitespace and `//`
//! line comments separate tokens and are dropped. At each position the
//! classes are tried in a fixed order (IPv4, MAC, number, string, word,
//! symbol) so dotted octets and dotted MACs are never split into numbers and
//! words. Words are looked up in the [`Grammar`] keyword table.
//!
//! The public entry point is [`tokenize`], which keeps going after a bad
//! character and reports every lexical error in one pass.

use log::debug;
use winnow::{
    Parser as _,
    ascii::{digit1, multispace1},
    combinator::{alt, cut_err, not, opt, peek, preceded, repeat, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, none_of, one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    grammar::Grammar,
    span::Span,
    tokens::{PositionedToken, Symbol, Token},
};

/// Diagnostic details attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span runs from `start` to the position where lexing failed.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

/// Succeeds without consuming if the next character cannot continue an
/// address (so `10.0.0.1` matches but `10.0.0.1a` and `1.2.3.4.5` do not).
fn address_boundary(input: &mut Input<'_>) -> IResult<()> {
    peek(not(one_of(|c: char| {
        c.is_ascii_alphanumeric() || c == '_' || c == '.'
    })))
    .parse_next(input)
}

fn octet<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    take_while(1..=3, |c: char| c.is_ascii_digit()).parse_next(input)
}

/// Dotted-quad IPv4 literal. Octet ranges are checked during elaboration.
fn ipv4<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    terminated(
        (octet, '.', octet, '.', octet, '.', octet).take(),
        address_boundary,
    )
    .map(Token::Ipv4)
    .parse_next(input)
}

fn hex_group<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    take_while(4, |c: char| c.is_ascii_hexdigit()).parse_next(input)
}

/// MAC address in dotted form: `00e0.f7aa.0001`.
fn mac<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    terminated((hex_group, '.', hex_group, '.', hex_group).take(), address_boundary)
        .map(Token::Mac)
        .parse_next(input)
}

/// Integer or decimal number with an optional leading minus, kept as text.
fn number<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (opt('-'), digit1, opt(('.', digit1)))
        .take()
        .map(Token::Number)
        .parse_next(input)
}

/// Escape sequence after a backslash: `\\`, `\"`, `\n` or `\t`.
fn string_escape(input: &mut Input<'_>) -> IResult<char> {
    let escape_start = input.current_token_start();

    preceded(
        '\\',
        cut_err(one_of(['\\', '"', 'n', 't']).map(|c| match c {
            'n' => '\n',
            't' => '\t',
            other => other,
        }))
        .context(LexerDiagnostic {
            code: ErrorCode::E003,
            message: "invalid escape sequence",
            help: Some("valid escapes are `\\\\`, `\\\"`, `\\n` and `\\t`"),
            start: escape_start,
        }),
    )
    .parse_next(input)
}

/// Double-quoted string on a single line.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();

    let content = repeat(0.., alt((string_escape, none_of(['"', '\\', '\n']))))
        .fold(String::new, |mut acc, ch| {
            acc.push(ch);
            acc
        });

    preceded(
        '"',
        cut_err(terminated(content, '"')).context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add a closing `\"` before the end of the line"),
            start,
        }),
    )
    .map(Token::StringLiteral)
    .parse_next(input)
}

/// A character that continues a word. A `-` only counts when it does not
/// start an arrow, so `Gi0/1->R2` splits before the `->`.
fn word_char(input: &mut Input<'_>) -> IResult<()> {
    alt((
        one_of(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '/').void(),
        terminated('-', not('>')).void(),
    ))
    .parse_next(input)
}

fn word_tail(input: &mut Input<'_>) -> IResult<()> {
    repeat(0.., word_char).parse_next(input)
}

/// Keyword or identifier: `[A-Za-z_][A-Za-z0-9_/-]*`.
fn word<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    (one_of(|c: char| c.is_ascii_alphabetic() || c == '_'), word_tail)
        .take()
        .parse_next(input)
}

fn symbol<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        literal("->").value(Symbol::Arrow),
        '{'.value(Symbol::LeftBrace),
        '}'.value(Symbol::RightBrace),
        '.'.value(Symbol::Dot),
    ))
    .map(Token::Symbol)
    .parse_next(input)
}

/// Whitespace or a `//` comment running to the end of the line.
fn trivia(input: &mut Input<'_>) -> IResult<()> {
    alt((
        multispace1.void(),
        preceded("//", take_while(0.., |c: char| c != '\n')).void(),
    ))
    .parse_next(input)
}

/// Parse a single token with position tracking.
fn positioned_token<'a>(
    input: &mut Input<'a>,
    grammar: &Grammar,
) -> IResult<PositionedToken<'a>> {
    let start = input.current_token_start();

    let token = alt((
        ipv4,           // Before number: `10.0.0.1` is not `10.0` `.` `0.1`
        mac,            // Before number and word: `00e0.f7aa.0001`
        number,         // Before symbol: `-5` is not `-` `5`
        string_literal, //
        word.map(|text| match grammar.keyword(text) {
            Some(keyword) => Token::Keyword(keyword),
            None => Token::Identifier(text),
        }),
        symbol,
    ))
    .parse_next(input)?;

    let end = input.current_token_start();
    Ok(PositionedToken::new(token, Span::new(start..end)))
}

/// Skip a string literal that failed to lex, from its opening quote through
/// the closing quote, or up to the end of the line when there is none.
fn skip_bad_string(input: &mut Input<'_>) {
    let _ = input.next_token();
    while let Some(c) = input.chars().next() {
        if c == '\n' {
            break;
        }
        let _ = input.next_token();
        match c {
            '"' => break,
            '\\' if !input.starts_with('\n') => {
                let _ = input.next_token();
            }
            _ => {}
        }
    }
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn tokenize(&mut self, mut input: Input<'a>, grammar: &Grammar) {
        while !input.is_empty() {
            let checkpoint = input.checkpoint();
            if trivia(&mut input).is_ok() {
                continue;
            }
            input.reset(&checkpoint);

            match positioned_token(&mut input, grammar) {
                Ok(token) => self.tokens.push(token),
                Err(err) => {
                    let error_pos = input.current_token_start();
                    let found = input.chars().next();
                    self.diagnostics
                        .emit(Self::convert_err_mode(err, error_pos, found));

                    input.reset(&checkpoint);
                    if input.starts_with('"') {
                        skip_bad_string(&mut input);
                    } else {
                        // Skip one character and keep going.
                        let _ = input.next_token();
                    }
                }
            }
        }
    }

    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    /// Convert a winnow error into a diagnostic.
    ///
    /// Uses the innermost `LexerDiagnostic` context when one is present and
    /// falls back to E002 (unexpected character) otherwise.
    fn convert_err_mode(
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
        found: Option<char>,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos.max(*start + 1));
            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(help) = help {
                diag = diag.with_help(*help);
            }
            return diag;
        }

        let width = found.map_or(1, char::len_utf8);
        let span = Span::new(error_pos..error_pos + width);
        let message = match found {
            Some(ch) => format!("unexpected character `{}`", ch.escape_default()),
            None => "unexpected character".to_string(),
        };
        Diagnostic::error(message)
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
    }
}

/// Split source text into tokens, collecting every lexical error.
///
/// # Errors
///
/// Returns a [`ParseError`] holding one diagnostic per bad character or
/// malformed string if lexing failed anywhere.
pub fn tokenize<'a>(
    source: &'a str,
    grammar: &Grammar,
) -> Result<Vec<PositionedToken<'a>>, ParseError> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(source), grammar);
    let tokens = lexer.finish()?;
    debug!(tokens = tokens.len(); "Source tokenized");
    Ok(tokens)
}
