//! Elaboration phase for the topology syntax tree
//!
//! This module turns the syntax tree from [`parser_types`] into the
//! [`netar_core::Network`] IR. It converts raw number and address text into
//! typed values, resolves device types against the [`Grammar`], enforces
//! unique device names and reports links that point at undeclared devices.
//!
//! Errors are collected across the whole tree before failing, so one run
//! reports every bad value at once.

use std::{collections::HashMap, net::Ipv4Addr, str::FromStr};

use log::{debug, info, trace};

use netar_core::{
    Address, Bandwidth, Coordinates, Device, Endpoint, Interface, Link, Network, Outcome,
    Warning, Warnings,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    grammar::Grammar,
    parser_types::{
        DeviceItem, DeviceNode, InterfaceItem, InterfaceNode, IpValue, LinkNode, NetworkItem,
        NetworkNode,
    },
    span::{Span, Spanned},
};

pub struct Builder<'g> {
    grammar: &'g Grammar,
    diagnostics: DiagnosticCollector,
    warnings: Warnings,
    /// Span of each device name's first definition.
    definitions: HashMap<String, Span>,
}

impl<'g> Builder<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            diagnostics: DiagnosticCollector::new(),
            warnings: Warnings::new(),
            definitions: HashMap::new(),
        }
    }

    pub fn build(mut self, node: &NetworkNode) -> Result<Outcome<Network>, ParseError> {
        debug!(network = node.name.inner().as_str(); "Building network");

        let mut network = Network::new(node.name.inner().as_str());
        for item in &node.items {
            match item {
                NetworkItem::Device(device) => self.add_device(&mut network, device),
                NetworkItem::Link(link) => network.add_link(self.build_link(link)),
            }
        }

        let unresolved: Vec<Warning> = network
            .unresolved_endpoints()
            .map(|(link, device)| Warning::UnresolvedReference {
                link,
                device: device.to_string(),
            })
            .collect();
        for warning in unresolved {
            self.warnings.emit(warning);
        }

        self.diagnostics.finish()?;

        info!(
            devices = network.devices().len(),
            links = network.links().len();
            "Network elaborated"
        );
        Ok(self.warnings.finish(network))
    }

    fn add_device(&mut self, network: &mut Network, node: &DeviceNode) {
        let device = self.build_device(node);
        let name = node.name.inner();

        if network.add_device(device).is_err() {
            let mut diagnostic = Diagnostic::error(format!("device `{name}` is defined more than once"))
                .with_code(ErrorCode::E300)
                .with_label(node.name.span(), "duplicate definition")
                .with_help("device names must be unique within a network");
            if let Some(first) = self.definitions.get(name) {
                diagnostic = diagnostic.with_secondary_label(*first, "first defined here");
            }
            self.diagnostics.emit(diagnostic);
            return;
        }

        self.definitions.insert(name.clone(), node.name.span());
    }

    fn build_device(&mut self, node: &DeviceNode) -> Device {
        let kind = self.grammar.device_kind(node.kind.inner());
        trace!(device = node.name.inner().as_str(), kind = kind.as_str(); "Building device");

        let mut device = Device::new(node.name.inner().as_str(), kind);
        for item in &node.items {
            match item {
                DeviceItem::Coordinates { x, y } => {
                    if let (Some(x), Some(y)) = (self.coordinate(x), self.coordinate(y)) {
                        device = device.with_coordinates(Coordinates::new(x, y));
                    }
                }
                DeviceItem::Power(state) => device = device.with_power(*state.inner()),
                DeviceItem::Interface(interface) => {
                    device = device.with_interface(self.build_interface(interface));
                }
            }
        }
        device
    }

    fn build_interface(&mut self, node: &InterfaceNode) -> Interface {
        let mut interface = Interface::new(node.name.inner().as_str());
        for item in &node.items {
            match item {
                InterfaceItem::Bandwidth(value) => {
                    if let Some(bandwidth) = self.bandwidth(value) {
                        interface = interface.with_bandwidth(bandwidth);
                    }
                }
                InterfaceItem::Ip(value) => {
                    if let Some(address) = self.address(value) {
                        interface = interface.with_address(address);
                    }
                }
            }
        }
        interface
    }

    fn build_link(&mut self, node: &LinkNode) -> Link {
        let from = Endpoint::new(node.from.device.inner().as_str(), node.from.port.inner().as_str());
        let to = Endpoint::new(node.to.device.inner().as_str(), node.to.port.inner().as_str());

        node.properties
            .iter()
            .fold(Link::new(from, to), |link, property| {
                link.with_property(property.key.inner().as_str(), property.value.inner().as_str())
            })
    }

    // ============================================================================
    // Value conversion
    // ============================================================================

    fn coordinate(&mut self, text: &Spanned<String>) -> Option<f64> {
        match f64::from_str(text.inner()) {
            Ok(value) if value.is_finite() => Some(value),
            _ => {
                self.diagnostics.emit(
                    Diagnostic::error(format!("invalid coordinate `{}`", text.inner()))
                        .with_code(ErrorCode::E302)
                        .with_label(text.span(), "not a finite number"),
                );
                None
            }
        }
    }

    fn bandwidth(&mut self, text: &Spanned<String>) -> Option<Bandwidth> {
        match u64::from_str(text.inner()) {
            Ok(mbps) => Some(Bandwidth::from_mbps(mbps)),
            Err(_) => {
                self.diagnostics.emit(
                    Diagnostic::error(format!("invalid bandwidth `{}`", text.inner()))
                        .with_code(ErrorCode::E302)
                        .with_label(text.span(), "bandwidth must be a non-negative integer")
                        .with_help("bandwidth is given in whole Mbps"),
                );
                None
            }
        }
    }

    fn address(&mut self, value: &Spanned<IpValue>) -> Option<Address> {
        match value.inner() {
            IpValue::Dhcp => Some(Address::Dhcp),
            IpValue::Literal(text) => match Ipv4Addr::from_str(text) {
                Ok(addr) => Some(Address::Ipv4(addr)),
                Err(_) => {
                    self.diagnostics.emit(
                        Diagnostic::error(format!("invalid IPv4 address `{text}`"))
                            .with_code(ErrorCode::E301)
                            .with_label(value.span(), "each octet must be between 0 and 255"),
                    );
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer, parser};
    use netar_core::DeviceKind;

    fn elaborate(source: &str) -> Result<Outcome<Network>, ParseError> {
        let grammar = Grammar::new();
        let tokens = lexer::tokenize(source, &grammar).expect("source should tokenize");
        let node = parser::build_network(&tokens).expect("source should parse");
        Builder::new(&grammar).build(&node)
    }

    #[test]
    fn test_canonical_device() {
        let outcome = elaborate(
            "network N { device H1 pc { coordinates 10 20 power on \
             interface eth0 { ip 10.0.0.1 bandwidth 100 } } }",
        )
        .unwrap();

        assert!(outcome.warnings().is_empty());
        let network = outcome.value();
        assert_eq!(network.name(), "N");

        let device = network.device("H1").unwrap();
        assert_eq!(device.kind, DeviceKind::Pc);
        assert_eq!(device.coordinates, Coordinates::new(10.0, 20.0));
        assert!(device.power);

        let interface = device.primary_interface().unwrap();
        assert_eq!(interface.name, "eth0");
        assert_eq!(interface.address, Address::Ipv4(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(interface.bandwidth.mbps(), 100);
    }

    #[test]
    fn test_defaults() {
        let outcome = elaborate("network N { device S sw9000 { interface e0 { } } }").unwrap();
        let device = outcome.value().device("S").unwrap();

        assert_eq!(device.kind, DeviceKind::Other("sw9000".to_string()));
        assert_eq!(device.coordinates, Coordinates::default());
        assert!(!device.power);
        assert_eq!(device.interfaces[0].address, Address::default());
        assert_eq!(device.interfaces[0].bandwidth.mbps(), 0);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let outcome = elaborate(
            "network N { device R router { power on coordinates 1 1 power off coordinates 2.5 -3 \
             interface g0 { bandwidth 10 ip 1.1.1.1 bandwidth 20 ip dhcp } } }",
        )
        .unwrap();
        let device = outcome.value().device("R").unwrap();

        assert!(!device.power);
        assert_eq!(device.coordinates, Coordinates::new(2.5, -3.0));
        assert_eq!(device.interfaces[0].bandwidth.mbps(), 20);
        assert!(device.interfaces[0].address.is_dhcp());
    }

    #[test]
    fn test_interfaces_keep_order() {
        let outcome = elaborate(
            "network N { device R router { interface b { } interface a { } interface c { } } }",
        )
        .unwrap();
        let names: Vec<_> = outcome.value().device("R").unwrap().interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_link_properties_in_order() {
        let outcome = elaborate(
            "network N { device A pc { } device B pc { } \
             link A.e0 -> B.e0 { speed 100 cable cross speed 1000 } }",
        )
        .unwrap();

        assert!(outcome.warnings().is_empty());
        let link = &outcome.value().links()[0];
        assert_eq!(link.from, Endpoint::new("A", "e0"));
        assert_eq!(link.to, Endpoint::new("B", "e0"));
        let pairs: Vec<_> = link.properties.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, [("speed", "1000"), ("cable", "cross")]);
    }

    #[test]
    fn test_dangling_endpoint_is_a_warning() {
        let outcome = elaborate("network N { device A pc { } link A.e0 -> Ghost.e0 { } }").unwrap();

        assert_eq!(outcome.value().links().len(), 1);
        assert_eq!(
            outcome.warnings(),
            [Warning::UnresolvedReference {
                link: 0,
                device: "Ghost".to_string()
            }]
        );
    }

    #[test]
    fn test_duplicate_device() {
        let err = elaborate("network N { device A pc { } device A router { } }").unwrap_err();

        let [diag] = err.diagnostics() else {
            panic!("expected one diagnostic, got {err}");
        };
        assert_eq!(diag.code(), Some(ErrorCode::E300));
        assert_eq!(diag.message(), "device `A` is defined more than once");
        assert_eq!(diag.primary_span(), Some(Span::new(35..36)));

        let secondary: Vec<_> = diag.labels().iter().filter(|l| l.is_secondary()).collect();
        assert_eq!(secondary.len(), 1);
        assert_eq!(secondary[0].span(), Span::new(19..20));
    }

    #[test]
    fn test_all_errors_are_collected() {
        let err = elaborate(
            "network N { device A pc { interface e { ip 300.1.1.1 bandwidth 1.5 } } }",
        )
        .unwrap_err();

        let codes: Vec<_> = err.diagnostics().iter().map(|d| d.code()).collect();
        assert_eq!(codes, [Some(ErrorCode::E301), Some(ErrorCode::E302)]);
    }

    #[test]
    fn test_negative_bandwidth_rejected() {
        let err = elaborate("network N { device A pc { interface e { bandwidth -5 } } }").unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E302));
    }
}
