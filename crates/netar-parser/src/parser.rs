//! Parser for topology source tokens.
//!
//! This module turns the token stream from the [`lexer`](super::lexer) into the
//! syntax tree in [`parser_types`](super::parser_types). The public entry point
//! is [`build_network`].
//!
//! Bodies (`{ ... }`) are order-insensitive repetitions of alternatives. Each
//! decision point goes through [`first_match`], which tries its alternatives
//! in order and either returns the first match or the labels of everything it
//! tried, so a failure can say exactly what was expected.

use log::trace;
use winnow::{
    Parser as _,
    combinator::{not, opt, terminated},
    error::{AddContext, ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    parser_types::{
        DeviceItem, DeviceNode, EndpointNode, InterfaceItem, InterfaceNode, IpValue, LinkNode,
        NetworkItem, NetworkNode, PropertyNode,
    },
    span::{Span, Spanned},
    tokens::{Keyword, PositionedToken, Symbol, Token},
};

/// Context attached to parser errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// One of the things that would have been accepted at the error position.
    Expected(&'static str),
    /// Remaining token count (`eof_offset()`) at the error position.
    Remaining(usize),
    /// Tokens follow a complete network.
    Trailing,
}

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// A labeled alternative at a decision point.
pub(crate) type Alternative<'src, O> = (&'static str, fn(&mut Input<'src>) -> IResult<O>);

/// Result of trying an ordered list of alternatives.
#[derive(Debug, PartialEq)]
pub(crate) enum Choice<O> {
    Matched(O),
    /// Nothing matched; the labels of every alternative tried, in order.
    NoMatch(Vec<&'static str>),
}

/// Try each alternative in order and return the first that matches.
///
/// An alternative that backtracks leaves the input untouched and adds its
/// label to the expected set. A committed (cut) failure inside an alternative
/// is returned as is.
pub(crate) fn first_match<'src, O>(
    input: &mut Input<'src>,
    alternatives: &[Alternative<'src, O>],
) -> IResult<Choice<O>> {
    let mut expected = Vec::with_capacity(alternatives.len());
    for (label, alternative) in alternatives {
        let checkpoint = input.checkpoint();
        match alternative(input) {
            Ok(value) => return Ok(Choice::Matched(value)),
            Err(ErrMode::Backtrack(_)) => {
                input.reset(&checkpoint);
                expected.push(*label);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(Choice::NoMatch(expected))
}

/// A committed error at the current position listing what was expected.
fn expected_error(input: &Input<'_>, expected: &[&'static str]) -> ErrMode<ContextError<Context>> {
    let checkpoint = input.checkpoint();
    let error = expected
        .iter()
        .fold(ContextError::new(), |error, label| {
            error.add_context(input, &checkpoint, Context::Expected(label))
        })
        .add_context(input, &checkpoint, Context::Remaining(input.eof_offset()));
    ErrMode::Cut(error)
}

fn trailing_error(input: &Input<'_>) -> ErrMode<ContextError<Context>> {
    let checkpoint = input.checkpoint();
    let error = ContextError::new()
        .add_context(input, &checkpoint, Context::Trailing)
        .add_context(input, &checkpoint, Context::Remaining(input.eof_offset()));
    ErrMode::Cut(error)
}

/// Run `parser`, turning a backtrack into a committed error expecting `label`.
fn expect<'src, O>(
    input: &mut Input<'src>,
    label: &'static str,
    parser: impl FnOnce(&mut Input<'src>) -> IResult<O>,
) -> IResult<O> {
    let checkpoint = input.checkpoint();
    match parser(input) {
        Err(ErrMode::Backtrack(_)) => {
            input.reset(&checkpoint);
            Err(expected_error(input, &[label]))
        }
        result => result,
    }
}

fn keyword<'src>(input: &mut Input<'src>, keyword: Keyword) -> IResult<Span> {
    any.verify_map(|token: &'src PositionedToken<'src>| match token.token {
        Token::Keyword(found) if found == keyword => Some(token.span),
        _ => None,
    })
    .parse_next(input)
}

fn symbol<'src>(input: &mut Input<'src>, symbol: Symbol) -> IResult<Span> {
    any.verify_map(|token: &'src PositionedToken<'src>| match token.token {
        Token::Symbol(found) if found == symbol => Some(token.span),
        _ => None,
    })
    .parse_next(input)
}

fn left_brace(input: &mut Input<'_>) -> IResult<Span> {
    expect(input, "`{`", |input| symbol(input, Symbol::LeftBrace))
}

/// Names and property keys: any word, number or string.
fn name_text<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    any.verify_map(|token: &'src PositionedToken<'src>| match &token.token {
        Token::Identifier(_) | Token::Keyword(_) | Token::Number(_) | Token::StringLiteral(_) => {
            token.text().map(|text| Spanned::new(text.to_string(), token.span))
        }
        _ => None,
    })
    .parse_next(input)
}

/// Property values: any token except a symbol.
fn value<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    any.verify_map(|token: &'src PositionedToken<'src>| {
        token
            .text()
            .map(|text| Spanned::new(text.to_string(), token.span))
    })
    .parse_next(input)
}

fn number<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    any.verify_map(|token: &'src PositionedToken<'src>| match token.token {
        Token::Number(text) => Some(Spanned::new(text.to_string(), token.span)),
        _ => None,
    })
    .parse_next(input)
}

fn on_off<'src>(input: &mut Input<'src>) -> IResult<Spanned<bool>> {
    any.verify_map(|token: &'src PositionedToken<'src>| match token.token {
        Token::Keyword(Keyword::On) => Some(Spanned::new(true, token.span)),
        Token::Keyword(Keyword::Off) => Some(Spanned::new(false, token.span)),
        _ => None,
    })
    .parse_next(input)
}

fn ip_value<'src>(input: &mut Input<'src>) -> IResult<Spanned<IpValue>> {
    any.verify_map(|token: &'src PositionedToken<'src>| match token.token {
        Token::Ipv4(text) => Some(Spanned::new(IpValue::Literal(text.to_string()), token.span)),
        Token::Keyword(Keyword::Dhcp) => Some(Spanned::new(IpValue::Dhcp, token.span)),
        _ => None,
    })
    .parse_next(input)
}

/// Parse alternatives until the closing `}`.
///
/// Returns the items in source order and the span of the closing brace.
fn body<'src, O>(
    input: &mut Input<'src>,
    alternatives: &[Alternative<'src, O>],
) -> IResult<(Vec<O>, Span)> {
    let mut items = Vec::new();
    loop {
        if let Ok(end) = symbol(input, Symbol::RightBrace) {
            return Ok((items, end));
        }

        match first_match(input, alternatives)? {
            Choice::Matched(item) => items.push(item),
            Choice::NoMatch(mut expected) => {
                expected.push("`}`");
                return Err(expected_error(input, &expected));
            }
        }
    }
}

/// `coordinates X Y`
fn coordinates_item(input: &mut Input<'_>) -> IResult<DeviceItem> {
    keyword(input, Keyword::Coordinates)?;
    let x = expect(input, "number", number)?;
    let y = expect(input, "number", number)?;
    Ok(DeviceItem::Coordinates { x, y })
}

/// `power on|off`
fn power_item(input: &mut Input<'_>) -> IResult<DeviceItem> {
    keyword(input, Keyword::Power)?;
    let state = expect(input, "`on` or `off`", on_off)?;
    Ok(DeviceItem::Power(state))
}

/// `bandwidth N`
fn bandwidth_item(input: &mut Input<'_>) -> IResult<InterfaceItem> {
    keyword(input, Keyword::Bandwidth)?;
    let value = expect(input, "number", number)?;
    Ok(InterfaceItem::Bandwidth(value))
}

/// `ip A.B.C.D` or `ip dhcp`
fn ip_item(input: &mut Input<'_>) -> IResult<InterfaceItem> {
    keyword(input, Keyword::Ip)?;
    let value = expect(input, "IPv4 address or `dhcp`", ip_value)?;
    Ok(InterfaceItem::Ip(value))
}

/// `interface NAME { ... }`
fn interface_item<'src>(input: &mut Input<'src>) -> IResult<DeviceItem> {
    let start = keyword(input, Keyword::Interface)?;
    let name = expect(input, "interface name", name_text)?;
    left_brace(input)?;

    let alternatives: [Alternative<'src, InterfaceItem>; 2] =
        [("`bandwidth`", bandwidth_item), ("`ip`", ip_item)];
    let (items, end) = body(input, &alternatives)?;

    Ok(DeviceItem::Interface(InterfaceNode {
        name,
        items,
        span: start.union(end),
    }))
}

/// `device NAME TYPE { ... }`
fn device_item<'src>(input: &mut Input<'src>) -> IResult<NetworkItem> {
    let start = keyword(input, Keyword::Device)?;
    let name = expect(input, "device name", name_text)?;
    let kind = expect(input, "device type", name_text)?;
    left_brace(input)?;

    let alternatives: [Alternative<'src, DeviceItem>; 3] = [
        ("`coordinates`", coordinates_item),
        ("`power`", power_item),
        ("`interface`", interface_item),
    ];
    let (items, end) = body(input, &alternatives)?;

    Ok(NetworkItem::Device(DeviceNode {
        name,
        kind,
        items,
        span: start.union(end),
    }))
}

/// `NAME.PORT`
fn endpoint(input: &mut Input<'_>) -> IResult<EndpointNode> {
    // In `1.5.p` the number is the whole device name.
    let dot = |input: &mut Input<'_>| symbol(input, Symbol::Dot);
    if let Some(endpoint) = opt(terminated(numeric_endpoint, not(dot))).parse_next(input)? {
        return Ok(endpoint);
    }
    let device = expect(input, "device name", name_text)?;
    expect(input, "`.`", |input| symbol(input, Symbol::Dot))?;
    let port = expect(input, "port name", name_text)?;
    Ok(EndpointNode { device, port })
}

/// `1.2`, which the lexer reads as a single number, split at the dot.
fn numeric_endpoint<'src>(input: &mut Input<'src>) -> IResult<EndpointNode> {
    any.verify_map(|token: &'src PositionedToken<'src>| {
        let Token::Number(text) = &token.token else {
            return None;
        };
        let (device, port) = text.split_once('.')?;
        let dot = token.span.start() + device.len();
        Some(EndpointNode {
            device: Spanned::new(device.to_string(), Span::new(token.span.start()..dot)),
            port: Spanned::new(port.to_string(), Span::new(dot + 1..token.span.end())),
        })
    })
    .parse_next(input)
}

/// `KEY VALUE`
fn property(input: &mut Input<'_>) -> IResult<PropertyNode> {
    let key = name_text(input)?;
    let value = expect(input, "property value", value)?;
    Ok(PropertyNode { key, value })
}

/// `link NAME.PORT -> NAME.PORT { ... }`
fn link_item<'src>(input: &mut Input<'src>) -> IResult<NetworkItem> {
    let start = keyword(input, Keyword::Link)?;
    let from = endpoint(input)?;
    expect(input, "`->`", |input| symbol(input, Symbol::Arrow))?;
    let to = endpoint(input)?;
    left_brace(input)?;

    let alternatives: [Alternative<'src, PropertyNode>; 1] = [("property name", property)];
    let (properties, end) = body(input, &alternatives)?;

    Ok(NetworkItem::Link(LinkNode {
        from,
        to,
        properties,
        span: start.union(end),
    }))
}

/// `network NAME { ... }` followed by the end of input.
fn network<'src>(input: &mut Input<'src>) -> IResult<NetworkNode> {
    let start = expect(input, "`network`", |input| keyword(input, Keyword::Network))?;
    let name = expect(input, "network name", name_text)?;
    left_brace(input)?;

    let alternatives: [Alternative<'src, NetworkItem>; 2] =
        [("`device`", device_item), ("`link`", link_item)];
    let (items, end) = body(input, &alternatives)?;

    if input.eof_offset() > 0 {
        return Err(trailing_error(input));
    }

    Ok(NetworkNode {
        name,
        items,
        span: start.union(end),
    })
}

/// Render an expected set as prose: "`a`", "one of `a`, `b`".
fn describe_expected(expected: &[&str]) -> String {
    match expected {
        [] => "more input".to_string(),
        [single] => (*single).to_string(),
        many => format!("one of {}", many.join(", ")),
    }
}

/// Convert a winnow error into a diagnostic pointing at the offending token.
fn convert_error(error: ErrMode<ContextError<Context>>, tokens: &[PositionedToken<'_>]) -> Diagnostic {
    let context = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    let mut expected = Vec::new();
    let mut remaining = None;
    let mut trailing = false;
    for ctx in context.context() {
        match ctx {
            Context::Expected(label) => expected.push(*label),
            Context::Remaining(count) => remaining = Some(*count),
            Context::Trailing => trailing = true,
        }
    }

    let index = remaining.map_or(tokens.len(), |count| tokens.len() - count);
    let expected = describe_expected(&expected);

    match tokens.get(index) {
        Some(found) if trailing => {
            let last = tokens.last().map_or(found.span, |token| token.span);
            Diagnostic::error(format!(
                "unexpected `{}` after the end of the network",
                found.token
            ))
            .with_code(ErrorCode::E102)
            .with_label(found.span.union(last), "trailing input")
            .with_help("remove everything after the network's closing `}`")
        }
        Some(found) => Diagnostic::error(format!("expected {expected}, found `{}`", found.token))
            .with_code(ErrorCode::E100)
            .with_label(found.span, "unexpected token"),
        None => {
            let end = tokens.last().map_or(0, |token| token.span.end());
            Diagnostic::error(format!("unexpected end of input, expected {expected}"))
                .with_code(ErrorCode::E101)
                .with_label(Span::new(end..end), "input ends here")
                .with_help("check that every `{` has a matching `}`")
        }
    }
}

/// Build the syntax tree of a network from its tokens.
///
/// # Errors
///
/// Returns the first syntax error as a [`Diagnostic`] with code E100
/// (unexpected token), E101 (input ended early) or E102 (trailing input).
pub fn build_network(tokens: &[PositionedToken<'_>]) -> Result<NetworkNode> {
    let mut input = TokenSlice::new(tokens);
    let node = network(&mut input).map_err(|err| convert_error(err, tokens))?;
    trace!(items = node.items.len(); "Syntax tree built");
    Ok(node)
}
