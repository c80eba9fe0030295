//! Syntax tree produced by the parser.
//!
//! Every node is a tagged variant with named fields; every leaf keeps the
//! span it was parsed from so elaboration can point diagnostics at it.
//! Values stay as source text here. Numeric and address conversion happens
//! during elaboration.

use crate::span::{Span, Spanned};

/// `network NAME { (device | link)* }`
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkNode {
    pub name: Spanned<String>,
    pub items: Vec<NetworkItem>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkItem {
    Device(DeviceNode),
    Link(LinkNode),
}

/// `device NAME TYPE { (coordinates | power | interface)* }`
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceNode {
    pub name: Spanned<String>,
    pub kind: Spanned<String>,
    pub items: Vec<DeviceItem>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceItem {
    /// `coordinates X Y`, both raw number text.
    Coordinates {
        x: Spanned<String>,
        y: Spanned<String>,
    },
    /// `power on` or `power off`.
    Power(Spanned<bool>),
    Interface(InterfaceNode),
}

/// `interface NAME { (bandwidth | ip)* }`
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceNode {
    pub name: Spanned<String>,
    pub items: Vec<InterfaceItem>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceItem {
    /// `bandwidth N`, raw number text.
    Bandwidth(Spanned<String>),
    Ip(Spanned<IpValue>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpValue {
    /// A dotted-quad literal, not yet range-checked.
    Literal(String),
    /// `ip dhcp`
    Dhcp,
}

/// `link NAME.PORT -> NAME.PORT { (PROPERTY VALUE)* }`
#[derive(Debug, Clone, PartialEq)]
pub struct LinkNode {
    pub from: EndpointNode,
    pub to: EndpointNode,
    pub properties: Vec<PropertyNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndpointNode {
    pub device: Spanned<String>,
    pub port: Spanned<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNode {
    pub key: Spanned<String>,
    pub value: Spanned<String>,
}
