//! Integration tests for the Converter API
//!
//! These tests drive every conversion direction through the public API.

use std::net::Ipv4Addr;

use netar::{
    Address, Bandwidth, Converter, Coordinates, Device, DeviceKind, Endpoint, Interface, Link,
    NetarError, Network, Warning,
    config::{AppConfig, DecodeConfig},
};
use proptest::prelude::*;

const CANONICAL: &str = "network N { device H1 pc { coordinates 10 20 power on \
                         interface eth0 { ip 10.0.0.1 bandwidth 100 } } }";

#[test]
fn test_parse_canonical_example() {
    let converter = Converter::default();
    let outcome = converter.parse_dsl(CANONICAL).expect("Failed to parse");
    assert!(outcome.warnings().is_empty());

    let network = outcome.value();
    let device = &network.devices()[0];
    assert_eq!(device.name, "H1");
    assert_eq!(device.kind, DeviceKind::Pc);
    assert_eq!(device.coordinates, Coordinates::new(10.0, 20.0));
    assert!(device.power);
    assert_eq!(
        device.interfaces[0].address,
        Address::Ipv4(Ipv4Addr::new(10, 0, 0, 1))
    );
    assert_eq!(device.interfaces[0].bandwidth, Bandwidth::from_mbps(100));

    let graph = converter.project_graph(network).into_value();
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].id, "1");
    assert_eq!(graph.nodes[0].data.label, "H1");
    assert!(graph.edges.is_empty());
}

#[test]
fn test_parse_error_keeps_source() {
    let source = "network N { device }";
    let err = Converter::default()
        .parse_dsl(source)
        .expect_err("Should return error for invalid syntax");

    match err {
        NetarError::Parse { err, src } => {
            assert_eq!(src, source);
            assert!(!err.diagnostics().is_empty());
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_one_port_cable_is_skipped_and_others_project() {
    let xml = r#"<?xml version="1.0"?>
<PACKETTRACER5><NETWORK>
  <DEVICES>
    <DEVICE><ENGINE><TYPE model="PC-PT"/><NAME>A</NAME><SAVE_REF_ID>1</SAVE_REF_ID></ENGINE></DEVICE>
    <DEVICE><ENGINE><TYPE model="2960-24TT"/><NAME>B</NAME><SAVE_REF_ID>2</SAVE_REF_ID></ENGINE></DEVICE>
  </DEVICES>
  <LINKS>
    <LINK><CABLE><FROM>1</FROM><PORT>FastEthernet0</PORT><TO>2</TO></CABLE></LINK>
    <LINK><CABLE><FROM>1</FROM><PORT>FastEthernet0</PORT><TO>2</TO><PORT>FastEthernet0/1</PORT></CABLE></LINK>
  </LINKS>
</NETWORK></PACKETTRACER5>"#;

    let converter = Converter::default();
    let outcome = converter.decode_xml(xml.as_bytes()).expect("Failed to decode");
    assert_eq!(
        outcome.warnings(),
        [Warning::IncompleteCable { link: 0, ports: 1 }]
    );

    let network = outcome.into_value();
    assert_eq!(network.links().len(), 1);

    let graph = converter.project_graph(&network);
    assert!(graph.warnings().is_empty());
    assert_eq!(graph.value().edges.len(), 1);
    assert_eq!(graph.value().edges[0].source, "1");
    assert_eq!(graph.value().edges[0].target, "2");
}

#[test]
fn test_dsl_xml_dsl_round_trip() {
    let converter = Converter::default();
    let network = converter
        .parse_dsl(
            "network MyNetwork {
                device R1 router { coordinates 5 5 power on interface FastEthernet0 { ip 192.168.0.1 bandwidth 1000 } }
                device PC1 pc { coordinates 1.5 2 interface FastEthernet0 { ip dhcp bandwidth 100 } }
                link R1.GigabitEthernet0/0 -> PC1.FastEthernet0 { speed 1000 }
            }",
        )
        .unwrap()
        .into_value();

    let xml = converter.encode_xml(&network).unwrap().into_value();
    let decoded = converter.decode_xml(xml.as_bytes()).unwrap();
    assert!(decoded.warnings().is_empty());
    assert_eq!(decoded.value(), &network);

    let dsl = converter.emit_dsl(decoded.value());
    let reparsed = converter.parse_dsl(&dsl).unwrap().into_value();
    assert_eq!(reparsed, network);
}

#[test]
fn test_graph_json_document() {
    let converter = Converter::default();
    let network = converter.parse_dsl(CANONICAL).unwrap().into_value();
    let json = converter.graph_json(&network).unwrap().into_value();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["nodes"][0]["data"]["src"], "/images/pc.png");
    assert_eq!(value["nodes"][0]["data"]["interface"]["bandwidth"], 100);
    assert_eq!(value["edges"], serde_json::json!([]));
}

#[test]
fn test_configuration_flows_through() {
    let converter = Converter::new(AppConfig {
        decode: DecodeConfig::new("Campus", "Gi0"),
        ..AppConfig::default()
    });
    let network = converter
        .decode_xml(b"<NETWORK><DEVICES><DEVICE><ENGINE><NAME>A</NAME><TYPE model=\"PC-PT\"/></ENGINE></DEVICE></DEVICES></NETWORK>")
        .unwrap()
        .into_value();
    assert_eq!(network.name(), "Campus");
    assert_eq!(network.devices()[0].interfaces[0].name, "Gi0");
}

#[test]
fn test_converter_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Converter>();
}

// ============================================================================
// Round-trip properties
// ============================================================================

fn address() -> impl Strategy<Value = Address> {
    prop_oneof![
        any::<[u8; 4]>().prop_map(|octets| Address::Ipv4(Ipv4Addr::from(octets))),
        Just(Address::Dhcp),
    ]
}

fn coordinates() -> impl Strategy<Value = Coordinates> {
    (-1.0e6..1.0e6f64, -1.0e6..1.0e6f64).prop_map(|(x, y)| Coordinates::new(x, y))
}

fn known_kind() -> impl Strategy<Value = DeviceKind> {
    prop::sample::select(DeviceKind::KNOWN.to_vec())
}

fn any_kind() -> impl Strategy<Value = DeviceKind> {
    prop_oneof![
        known_kind(),
        "\\PC{0,10}"
            .prop_filter("known kinds resolve to their variant", |name| {
                DeviceKind::from_name(name).is_other()
            })
            .prop_map(DeviceKind::Other),
    ]
}

/// One device, one interface, and an optional link with properties.
fn minimal_network() -> impl Strategy<Value = Network> {
    (
        "\\PC{0,12}",
        "\\PC{0,12}",
        any_kind(),
        coordinates(),
        any::<bool>(),
        "\\PC{0,12}",
        address(),
        any::<u64>(),
        prop::option::of((
            "\\PC{0,8}",
            "\\PC{0,8}",
            "\\PC{0,8}",
            "\\PC{0,8}",
            prop::collection::vec(("\\PC{0,8}", "\\PC{0,8}"), 0..3),
        )),
    )
        .prop_map(
            |(network_name, device_name, kind, coordinates, power, interface_name, address, mbps, link)| {
                let mut network = Network::new(network_name);
                let device = Device::new(device_name, kind)
                    .with_coordinates(coordinates)
                    .with_power(power)
                    .with_interface(
                        Interface::new(interface_name)
                            .with_address(address)
                            .with_bandwidth(Bandwidth::from_mbps(mbps)),
                    );
                network
                    .add_device(device)
                    .expect("a single device cannot be a duplicate");

                if let Some((from, from_port, to, to_port, properties)) = link {
                    let link = properties.into_iter().fold(
                        Link::new(Endpoint::new(from, from_port), Endpoint::new(to, to_port)),
                        |link, (key, value)| link.with_property(key, value),
                    );
                    network.add_link(link);
                }
                network
            },
        )
}

/// Devices with the fields PT XML carries, all cables resolving.
fn xml_network() -> impl Strategy<Value = Network> {
    (
        prop::collection::vec(
            (
                "[A-Za-z][A-Za-z0-9_]{0,8}",
                known_kind(),
                coordinates(),
                any::<bool>(),
                address(),
                0..=(u64::MAX / 1000),
            ),
            1..5,
        ),
        prop::collection::vec(
            (any::<prop::sample::Index>(), any::<prop::sample::Index>(), "[A-Za-z][A-Za-z0-9/]{0,8}"),
            0..4,
        ),
    )
        .prop_map(|(devices, cables)| {
            let mut network = Network::new("MyNetwork");
            for (index, (name, kind, coordinates, power, address, mbps)) in
                devices.into_iter().enumerate()
            {
                let device = Device::new(format!("{name}{index}"), kind)
                    .with_coordinates(coordinates)
                    .with_power(power)
                    .with_interface(
                        Interface::new("FastEthernet0")
                            .with_address(address)
                            .with_bandwidth(Bandwidth::from_mbps(mbps)),
                    );
                network
                    .add_device(device)
                    .expect("index suffix keeps names unique");
            }

            let names: Vec<String> = network.devices().iter().map(|d| d.name.clone()).collect();
            for (from, to, port) in cables {
                let speed = if port.contains("Gigabit") { "1000" } else { "100" };
                network.add_link(
                    Link::new(
                        Endpoint::new(from.get(&names).as_str(), port.as_str()),
                        Endpoint::new(to.get(&names).as_str(), port.as_str()),
                    )
                    .with_property("speed", speed),
                );
            }
            network
        })
}

proptest! {
    #[test]
    fn prop_emit_then_parse_is_identity(network in minimal_network()) {
        let converter = Converter::default();
        let source = converter.emit_dsl(&network);
        let parsed = converter
            .parse_dsl(&source)
            .map_err(|err| TestCaseError::fail(format!("{err}\n{source}")))?
            .into_value();
        prop_assert_eq!(parsed, network);
    }

    #[test]
    fn prop_decode_encode_is_identity(network in xml_network()) {
        let converter = Converter::default();
        let xml = converter.encode_xml(&network).unwrap();
        prop_assert!(xml.warnings().is_empty());

        let decoded = converter.decode_xml(xml.value().as_bytes()).unwrap();
        prop_assert!(decoded.warnings().is_empty());
        prop_assert_eq!(decoded.into_value(), network);
    }

    #[test]
    fn prop_encode_is_deterministic(network in xml_network()) {
        let converter = Converter::default();
        let first = converter.encode_xml(&network).unwrap().into_value();
        let second = converter.encode_xml(&network).unwrap().into_value();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_edges_match_resolved_links(network in minimal_network()) {
        let resolved = network
            .links()
            .iter()
            .filter(|link| network.device(&link.from.device).is_some()
                && network.device(&link.to.device).is_some())
            .count();
        let graph = Converter::default().project_graph(&network).into_value();
        prop_assert_eq!(graph.edges.len(), resolved);
        prop_assert_eq!(graph.nodes.len(), network.devices().len());
    }
}
