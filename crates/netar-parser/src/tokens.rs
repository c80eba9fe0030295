use std::fmt;

use winnow::stream::Location;

use crate::span::Span;

/// Reserved words of the topology language.
///
/// Several keywords (`vlan`, `acl`, `route`, ...) are reserved for
/// configuration blocks the grammar does not use yet; they still lex as
/// keywords so they cannot silently become identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Network,
    Device,
    Module,
    Slot,
    Interface,
    Vlan,
    Route,
    Dhcp,
    Acl,
    Link,
    Coordinates,
    Power,
    Gateway,
    Dns,
    Bandwidth,
    Allow,
    Deny,
    From,
    To,
    Pool,
    Name,
    Desc,
    Cable,
    Length,
    Functional,
    Static,
    Ip,
    On,
    Off,
}

impl Keyword {
    pub const ALL: [Keyword; 29] = [
        Keyword::Network,
        Keyword::Device,
        Keyword::Module,
        Keyword::Slot,
        Keyword::Interface,
        Keyword::Vlan,
        Keyword::Route,
        Keyword::Dhcp,
        Keyword::Acl,
        Keyword::Link,
        Keyword::Coordinates,
        Keyword::Power,
        Keyword::Gateway,
        Keyword::Dns,
        Keyword::Bandwidth,
        Keyword::Allow,
        Keyword::Deny,
        Keyword::From,
        Keyword::To,
        Keyword::Pool,
        Keyword::Name,
        Keyword::Desc,
        Keyword::Cable,
        Keyword::Length,
        Keyword::Functional,
        Keyword::Static,
        Keyword::Ip,
        Keyword::On,
        Keyword::Off,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Network => "network",
            Keyword::Device => "device",
            Keyword::Module => "module",
            Keyword::Slot => "slot",
            Keyword::Interface => "interface",
            Keyword::Vlan => "vlan",
            Keyword::Route => "route",
            Keyword::Dhcp => "dhcp",
            Keyword::Acl => "acl",
            Keyword::Link => "link",
            Keyword::Coordinates => "coordinates",
            Keyword::Power => "power",
            Keyword::Gateway => "gateway",
            Keyword::Dns => "dns",
            Keyword::Bandwidth => "bandwidth",
            Keyword::Allow => "allow",
            Keyword::Deny => "deny",
            Keyword::From => "from",
            Keyword::To => "to",
            Keyword::Pool => "pool",
            Keyword::Name => "name",
            Keyword::Desc => "desc",
            Keyword::Cable => "cable",
            Keyword::Length => "length",
            Keyword::Functional => "functional",
            Keyword::Static => "static",
            Keyword::Ip => "ip",
            Keyword::On => "on",
            Keyword::Off => "off",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Punctuation of the topology language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    LeftBrace,  // {
    RightBrace, // }
    Dot,        // .
    Arrow,      // ->
}

impl Symbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::LeftBrace => "{",
            Symbol::RightBrace => "}",
            Symbol::Dot => ".",
            Symbol::Arrow => "->",
        }
    }
}

/// Tokens of the topology language.
///
/// Numbers, addresses and identifiers borrow their raw text from the source;
/// string literals own their unescaped content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    Keyword(Keyword),
    Identifier(&'src str),
    Number(&'src str),
    StringLiteral(String),
    Ipv4(&'src str),
    Mac(&'src str),
    Symbol(Symbol),
}

/// The tag of a [`Token`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Number,
    String,
    Ipv4,
    Mac,
    Keyword,
    Symbol,
}

impl Token<'_> {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Keyword(_) => TokenKind::Keyword,
            Token::Identifier(_) => TokenKind::Identifier,
            Token::Number(_) => TokenKind::Number,
            Token::StringLiteral(_) => TokenKind::String,
            Token::Ipv4(_) => TokenKind::Ipv4,
            Token::Mac(_) => TokenKind::Mac,
            Token::Symbol(_) => TokenKind::Symbol,
        }
    }

    /// The token's text as a value: raw text for words, numbers and
    /// addresses, unescaped content for strings. Symbols have none.
    pub fn text(&self) -> Option<&str> {
        match self {
            Token::Keyword(keyword) => Some(keyword.as_str()),
            Token::Identifier(text)
            | Token::Number(text)
            | Token::Ipv4(text)
            | Token::Mac(text) => Some(text),
            Token::StringLiteral(text) => Some(text),
            Token::Symbol(_) => None,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Keyword(keyword) => write!(f, "{keyword}"),
            Token::Identifier(text)
            | Token::Number(text)
            | Token::Ipv4(text)
            | Token::Mac(text) => f.write_str(text),
            Token::StringLiteral(text) => write!(f, "{text:?}"),
            Token::Symbol(symbol) => f.write_str(symbol.as_str()),
        }
    }
}

/// A token with its source span, the element type of the parser's input.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl Location for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}
