use std::{borrow::Cow, collections::HashMap, str::FromStr};

use log::{debug, info, trace};
use roxmltree::{Document, Node};

use netar_core::{
    Address, Bandwidth, Coordinates, Device, DeviceKind, Endpoint, Interface, Link, Network,
    Outcome, Warning, Warnings,
};

use super::{
    SchemaError,
    models::{UNKNOWN_KIND, kind_for_model},
};
use crate::config::DecodeConfig;

/// Device name PT gives the power strip it adds to every workspace.
const POWER_DISTRIBUTION_DEVICE: &str = "Power Distribution Device0";

/// Device name used for cable ends whose save-ref id matches no device,
/// suffixed when a decoded device already has it.
const UNKNOWN_DEVICE: &str = "UNKNOWN";

/// Raw bandwidth assumed for a port without a `BANDWIDTH` element.
const DEFAULT_RAW_BANDWIDTH: u64 = 100_000;

/// Decode a PT XML document into a network.
///
/// Invalid UTF-8 is replaced and control characters other than whitespace
/// are stripped before parsing.
///
/// # Errors
///
/// Returns a [`SchemaError`] if the document is not well-formed XML, has no
/// `NETWORK` or `DEVICES` element, has a device without a name, or names two
/// devices the same.
pub fn decode(bytes: &[u8], config: &DecodeConfig) -> Result<Outcome<Network>, SchemaError> {
    let text = sanitize(bytes);
    let document = Document::parse(&text)?;
    let network = network_element(&document)?;
    let devices = child(network, "DEVICES").ok_or(SchemaError::MissingDevices)?;

    let mut decoder = Decoder::new(config);
    let mut output = Network::new(config.network_name());

    for (index, element) in devices
        .children()
        .filter(|node| node.has_tag_name("DEVICE"))
        .enumerate()
    {
        if let Some(device) = decoder.device(index, element)? {
            output.add_device(device)?;
        }
    }

    if let Some(links) = child(network, "LINKS") {
        decoder.placeholder = placeholder_name(&output);
        for (index, element) in links
            .children()
            .filter(|node| node.has_tag_name("LINK"))
            .enumerate()
        {
            if let Some(link) = decoder.link(index, output.links().len(), element) {
                output.add_link(link);
            }
        }
    }

    info!(
        devices = output.devices().len(),
        links = output.links().len();
        "XML decoded"
    );
    Ok(decoder.warnings.finish(output))
}

struct Decoder<'c> {
    config: &'c DecodeConfig,
    warnings: Warnings,
    /// Save-ref id to device name.
    refs: HashMap<String, String>,
    /// Name given to cable ends that resolve to no device.
    placeholder: String,
}

impl<'c> Decoder<'c> {
    fn new(config: &'c DecodeConfig) -> Self {
        Self {
            config,
            warnings: Warnings::new(),
            refs: HashMap::new(),
            placeholder: UNKNOWN_DEVICE.to_string(),
        }
    }

    fn device(&mut self, index: usize, element: Node<'_, '_>) -> Result<Option<Device>, SchemaError> {
        let Some(engine) = child(element, "ENGINE") else {
            self.warnings.emit(Warning::SkippedDevice {
                index,
                missing: "ENGINE",
            });
            return Ok(None);
        };

        let name = child_text(engine, "NAME").ok_or(SchemaError::MissingDeviceName { index })?;
        if name == POWER_DISTRIBUTION_DEVICE {
            debug!(index = index; "Dropping power distribution device");
            return Ok(None);
        }

        let model = child(engine, "TYPE")
            .and_then(|node| node.attribute("model"))
            .unwrap_or_default();
        let kind = kind_for_model(model).unwrap_or_else(|| {
            self.warnings.emit(Warning::UnsupportedModel {
                device: name.to_string(),
                model: model.to_string(),
            });
            DeviceKind::Other(UNKNOWN_KIND.to_string())
        });
        trace!(device = name, model = model; "Decoding device");

        if let Some(save_ref) = child_text(engine, "SAVE_REF_ID").filter(|id| !id.is_empty()) {
            self.refs.insert(save_ref.to_string(), name.to_string());
        }

        let coordinates = self.coordinates(name, element, engine);
        let power = child_text(engine, "POWER").is_some_and(is_truthy);
        let interface = self.interface(name, element);

        Ok(Some(
            Device::new(name, kind)
                .with_coordinates(coordinates)
                .with_power(power)
                .with_interface(interface),
        ))
    }

    /// Logical workspace position, falling back to the older engine layout.
    fn coordinates(&mut self, device: &str, element: Node<'_, '_>, engine: Node<'_, '_>) -> Coordinates {
        let (x, y) = match path(element, &["WORKSPACE", "LOGICAL"]) {
            Some(logical) => (child_text(logical, "X"), child_text(logical, "Y")),
            None => match child(engine, "COORD_SETTINGS") {
                Some(settings) => (
                    child_text(settings, "X_COORD"),
                    child_text(settings, "Y_COORD"),
                ),
                None => (None, None),
            },
        };

        Coordinates::new(
            self.coordinate(device, "x", x),
            self.coordinate(device, "y", y),
        )
    }

    fn coordinate(&mut self, device: &str, field: &'static str, text: Option<&str>) -> f64 {
        let Some(text) = text else {
            return 0.0;
        };
        match f64::from_str(text) {
            Ok(value) if value.is_finite() => value,
            _ => {
                self.invalid_value(device, field, text);
                0.0
            }
        }
    }

    /// The single interface PT files describe per device.
    ///
    /// Bandwidth comes from the first port. The address comes from the last
    /// port that has one, a DHCP-enabled port counting as `<DHCP>`.
    fn interface(&mut self, device: &str, element: Node<'_, '_>) -> Interface {
        let ports: Vec<Node<'_, '_>> = element
            .descendants()
            .filter(|node| node.has_tag_name("PORT"))
            .collect();

        let bandwidth = match ports.first() {
            Some(port) => self.bandwidth(device, *port),
            None => Bandwidth::default(),
        };

        let mut address = Address::default();
        for port in &ports {
            if child_text(*port, "PORT_DHCP_ENABLE").is_some_and(is_truthy) {
                address = Address::Dhcp;
                continue;
            }
            if let Some(ip) = child_text(*port, "IP").filter(|ip| !ip.is_empty()) {
                match Address::from_str(ip) {
                    Ok(parsed) => address = parsed,
                    Err(_) => self.invalid_value(device, "ip", ip),
                }
            }
        }

        Interface::new(self.config.interface_name())
            .with_address(address)
            .with_bandwidth(bandwidth)
    }

    fn bandwidth(&mut self, device: &str, port: Node<'_, '_>) -> Bandwidth {
        let Some(element) = child(port, "BANDWIDTH") else {
            return Bandwidth::from_raw(DEFAULT_RAW_BANDWIDTH);
        };

        // An empty element is present but has no value.
        let text = element.text().map_or("", str::trim);
        match u64::from_str(text) {
            Ok(raw) => Bandwidth::from_raw(raw),
            Err(_) => {
                self.invalid_value(device, "bandwidth", text);
                Bandwidth::default()
            }
        }
    }

    /// `index` counts every `LINK` element; `position` is where the link
    /// lands in the output network.
    fn link(&mut self, index: usize, position: usize, element: Node<'_, '_>) -> Option<Link> {
        let Some(cable) = child(element, "CABLE") else {
            self.warnings.emit(Warning::IncompleteCable {
                link: index,
                ports: 0,
            });
            return None;
        };

        let ports: Vec<&str> = cable
            .children()
            .filter(|node| node.has_tag_name("PORT"))
            .map(|node| node.text().map_or("", str::trim))
            .collect();
        let [from_port, to_port, ..] = ports.as_slice() else {
            self.warnings.emit(Warning::IncompleteCable {
                link: index,
                ports: ports.len(),
            });
            return None;
        };

        let from = self.resolve(position, child_text(cable, "FROM").unwrap_or_default());
        let to = self.resolve(position, child_text(cable, "TO").unwrap_or_default());
        let speed = if from_port.contains("Gigabit") { "1000" } else { "100" };

        Some(
            Link::new(Endpoint::new(from, *from_port), Endpoint::new(to, *to_port))
                .with_property("speed", speed),
        )
    }

    fn resolve(&mut self, position: usize, save_ref: &str) -> String {
        match self.refs.get(save_ref) {
            Some(name) => name.clone(),
            None => {
                self.warnings.emit(Warning::UnresolvedReference {
                    link: position,
                    device: save_ref.to_string(),
                });
                self.placeholder.clone()
            }
        }
    }

    fn invalid_value(&mut self, device: &str, field: &'static str, value: &str) {
        self.warnings.emit(Warning::InvalidValue {
            device: device.to_string(),
            field,
            value: value.to_string(),
        });
    }
}

/// [`UNKNOWN_DEVICE`], or the first `UNKNOWN_<n>` that names no device.
fn placeholder_name(network: &Network) -> String {
    let mut name = UNKNOWN_DEVICE.to_string();
    let mut suffix = 1;
    while network.device(&name).is_some() {
        name = format!("{UNKNOWN_DEVICE}_{suffix}");
        suffix += 1;
    }
    name
}

/// Lossy UTF-8 with non-whitespace control characters removed.
fn sanitize(bytes: &[u8]) -> Cow<'_, str> {
    let text = String::from_utf8_lossy(bytes);
    if text.chars().any(is_stripped) {
        Cow::Owned(text.chars().filter(|c| !is_stripped(*c)).collect())
    } else {
        text
    }
}

fn is_stripped(c: char) -> bool {
    c.is_control() && !matches!(c, '\t' | '\n' | '\r')
}

/// A wrapper root whose child is `NETWORK`, or a bare `NETWORK` root.
fn network_element<'a, 'input>(document: &'a Document<'input>) -> Result<Node<'a, 'input>, SchemaError> {
    let root = document.root_element();
    child(root, "NETWORK")
        .or_else(|| root.has_tag_name("NETWORK").then_some(root))
        .ok_or(SchemaError::MissingNetwork)
}

fn is_truthy(text: &str) -> bool {
    ["true", "1", "yes", "on"]
        .iter()
        .any(|word| text.eq_ignore_ascii_case(word))
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(tag))
}

fn path<'a, 'input>(node: Node<'a, 'input>, tags: &[&str]) -> Option<Node<'a, 'input>> {
    tags.iter().try_fold(node, |node, tag| child(node, tag))
}

/// Trimmed text of a child element.
fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    child(node, tag).and_then(|child| child.text()).map(str::trim)
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::config::GraphConfig;

    fn decode_str(xml: &str) -> Outcome<Network> {
        decode(xml.as_bytes(), &DecodeConfig::default()).expect("document should decode")
    }

    const PT_FILE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PACKETTRACER5>
  <VERSION>8.2.1</VERSION>
  <NETWORK>
    <DEVICES>
      <DEVICE>
        <ENGINE>
          <TYPE model="ISR4331" customModel="">Router</TYPE>
          <NAME translate="true">Router0</NAME>
          <POWER>true</POWER>
          <SAVE_REF_ID>save-ref-id:1</SAVE_REF_ID>
          <MODULE>
            <SLOT>
              <MODULE>
                <PORT>
                  <TYPE>eGigabitEthernet</TYPE>
                  <BANDWIDTH>1000000</BANDWIDTH>
                  <IP>192.168.1.1</IP>
                </PORT>
              </MODULE>
            </SLOT>
          </MODULE>
        </ENGINE>
        <WORKSPACE>
          <LOGICAL>
            <X>300.5</X>
            <Y>120</Y>
          </LOGICAL>
        </WORKSPACE>
      </DEVICE>
      <DEVICE>
        <ENGINE>
          <TYPE model="PC-PT">Pc</TYPE>
          <NAME>PC0</NAME>
          <POWER>false</POWER>
          <SAVE_REF_ID>save-ref-id:2</SAVE_REF_ID>
          <PORT>
            <BANDWIDTH>100000</BANDWIDTH>
            <IP></IP>
            <PORT_DHCP_ENABLE>true</PORT_DHCP_ENABLE>
          </PORT>
        </ENGINE>
        <WORKSPACE>
          <LOGICAL>
            <X>100</X>
            <Y>300</Y>
          </LOGICAL>
        </WORKSPACE>
      </DEVICE>
      <DEVICE>
        <ENGINE>
          <TYPE model="Power Distribution Device">Power Distribution Device</TYPE>
          <NAME>Power Distribution Device0</NAME>
        </ENGINE>
      </DEVICE>
    </DEVICES>
    <LINKS>
      <LINK>
        <CABLE>
          <FROM>save-ref-id:1</FROM>
          <PORT>GigabitEthernet0/0/0</PORT>
          <TO>save-ref-id:2</TO>
          <PORT>FastEthernet0</PORT>
          <TYPE>eStraightThrough</TYPE>
        </CABLE>
      </LINK>
    </LINKS>
  </NETWORK>
</PACKETTRACER5>
"#;

    #[test]
    fn test_decode_pt_file() {
        let outcome = decode_str(PT_FILE);
        assert!(outcome.warnings().is_empty(), "{:?}", outcome.warnings());

        let network = outcome.value();
        assert_eq!(network.name(), "MyNetwork");
        assert_eq!(network.devices().len(), 2);

        let router = network.device("Router0").unwrap();
        assert_eq!(router.kind, DeviceKind::Router);
        assert_eq!(router.coordinates, Coordinates::new(300.5, 120.0));
        assert!(router.power);
        let interface = router.primary_interface().unwrap();
        assert_eq!(interface.name, "FastEthernet0");
        assert_eq!(interface.address, Address::Ipv4(Ipv4Addr::new(192, 168, 1, 1)));
        assert_eq!(interface.bandwidth.mbps(), 1000);

        let pc = network.device("PC0").unwrap();
        assert_eq!(pc.kind, DeviceKind::Pc);
        assert!(!pc.power);
        assert!(pc.interfaces[0].address.is_dhcp());
        assert_eq!(pc.interfaces[0].bandwidth.mbps(), 100);

        let link = &network.links()[0];
        assert_eq!(link.from, Endpoint::new("Router0", "GigabitEthernet0/0/0"));
        assert_eq!(link.to, Endpoint::new("PC0", "FastEthernet0"));
        assert_eq!(link.property("speed"), Some("1000"));
    }

    #[test]
    fn test_bare_network_root() {
        let outcome = decode_str(
            "<NETWORK><DEVICES><DEVICE><ENGINE><NAME>A</NAME><TYPE model=\"Server-PT\"/></ENGINE></DEVICE></DEVICES></NETWORK>",
        );
        let device = &outcome.value().devices()[0];
        assert_eq!(device.kind, DeviceKind::Server);
        assert_eq!(device.coordinates, Coordinates::default());
        // No ports at all.
        assert_eq!(device.interfaces[0].bandwidth.mbps(), 0);
        assert_eq!(device.interfaces[0].address, Address::default());
    }

    #[test]
    fn test_schema_errors() {
        let config = DecodeConfig::default();
        assert!(matches!(
            decode(b"<ROOT><OTHER/></ROOT>", &config),
            Err(SchemaError::MissingNetwork)
        ));
        assert!(matches!(
            decode(b"<NETWORK><LINKS/></NETWORK>", &config),
            Err(SchemaError::MissingDevices)
        ));
        assert!(matches!(
            decode(b"<NETWORK><DEVICES>", &config),
            Err(SchemaError::Malformed(_))
        ));
        assert!(matches!(
            decode(b"<NETWORK><DEVICES><DEVICE><ENGINE/></DEVICE></DEVICES></NETWORK>", &config),
            Err(SchemaError::MissingDeviceName { index: 0 })
        ));
    }

    #[test]
    fn test_duplicate_names_are_schema_errors() {
        let xml = "<NETWORK><DEVICES>\
                   <DEVICE><ENGINE><NAME>A</NAME></ENGINE></DEVICE>\
                   <DEVICE><ENGINE><NAME>A</NAME></ENGINE></DEVICE>\
                   </DEVICES></NETWORK>";
        assert!(matches!(
            decode(xml.as_bytes(), &DecodeConfig::default()),
            Err(SchemaError::Model(_))
        ));
    }

    #[test]
    fn test_recoverable_anomalies_warn() {
        let xml = r#"<NETWORK><DEVICES>
            <DEVICE><WORKSPACE/></DEVICE>
            <DEVICE><ENGINE><NAME>X</NAME><TYPE model="Cloud-PT"/>
                <PORT><BANDWIDTH>fast</BANDWIDTH><IP>10.0.0.999</IP></PORT>
            </ENGINE></DEVICE>
        </DEVICES><LINKS>
            <LINK><CABLE><FROM>1</FROM><PORT>Fa0</PORT><TO>2</TO></CABLE></LINK>
        </LINKS></NETWORK>"#;
        let outcome = decode_str(xml);

        let codes: Vec<_> = outcome.warnings().iter().map(Warning::code).collect();
        assert_eq!(
            codes,
            [
                "skipped-device",
                "unsupported-model",
                "invalid-value",
                "invalid-value",
                "incomplete-cable"
            ]
        );

        let device = &outcome.value().devices()[0];
        assert_eq!(device.kind, DeviceKind::Other("unknown".to_string()));
        assert_eq!(device.interfaces[0].bandwidth.mbps(), 0);
        assert_eq!(device.interfaces[0].address, Address::default());
        assert!(outcome.value().links().is_empty());
    }

    #[test]
    fn test_unresolved_cable_end() {
        let xml = "<NETWORK><DEVICES>\
                   <DEVICE><ENGINE><NAME>A</NAME><TYPE model=\"PC-PT\"/><SAVE_REF_ID>7</SAVE_REF_ID></ENGINE></DEVICE>\
                   </DEVICES><LINKS>\
                   <LINK><CABLE><FROM>7</FROM><PORT>Fa0</PORT><TO>9</TO><PORT>Fa1</PORT></CABLE></LINK>\
                   </LINKS></NETWORK>";
        let outcome = decode_str(xml);

        let link = &outcome.value().links()[0];
        assert_eq!(link.to.device, "UNKNOWN");
        assert_eq!(link.property("speed"), Some("100"));
        assert_eq!(
            outcome.warnings(),
            [Warning::UnresolvedReference {
                link: 0,
                device: "9".to_string()
            }]
        );
    }

    #[test]
    fn test_unresolved_cable_end_avoids_device_names() {
        let xml = "<NETWORK><DEVICES>\
                   <DEVICE><ENGINE><NAME>UNKNOWN</NAME><TYPE model=\"PC-PT\"/><SAVE_REF_ID>1</SAVE_REF_ID></ENGINE></DEVICE>\
                   <DEVICE><ENGINE><NAME>UNKNOWN_1</NAME><TYPE model=\"PC-PT\"/><SAVE_REF_ID>3</SAVE_REF_ID></ENGINE></DEVICE>\
                   <DEVICE><ENGINE><NAME>B</NAME><TYPE model=\"PC-PT\"/><SAVE_REF_ID>2</SAVE_REF_ID></ENGINE></DEVICE>\
                   </DEVICES><LINKS>\
                   <LINK><CABLE><FROM>2</FROM><PORT>Fa0</PORT><TO>99</TO><PORT>Fa1</PORT></CABLE></LINK>\
                   </LINKS></NETWORK>";
        let outcome = decode_str(xml);

        let link = &outcome.value().links()[0];
        assert_eq!(link.from.device, "B");
        assert_eq!(link.to.device, "UNKNOWN_2");
        assert_eq!(
            outcome.warnings(),
            [Warning::UnresolvedReference {
                link: 0,
                device: "99".to_string()
            }]
        );

        let graph = crate::graph::project(outcome.value(), &GraphConfig::default());
        assert!(graph.value().edges.is_empty());
    }

    #[test]
    fn test_empty_bandwidth_is_zero() {
        let xml = "<NETWORK><DEVICES>\
                   <DEVICE><ENGINE><NAME>A</NAME><TYPE model=\"PC-PT\"/><PORT><BANDWIDTH/></PORT></ENGINE></DEVICE>\
                   <DEVICE><ENGINE><NAME>B</NAME><TYPE model=\"PC-PT\"/><PORT><IP>10.0.0.2</IP></PORT></ENGINE></DEVICE>\
                   </DEVICES></NETWORK>";
        let outcome = decode_str(xml);

        let [a, b] = outcome.value().devices() else {
            panic!("expected two devices");
        };
        assert_eq!(a.interfaces[0].bandwidth.mbps(), 0);
        assert_eq!(b.interfaces[0].bandwidth.mbps(), 100);
        assert_eq!(
            outcome.warnings(),
            [Warning::InvalidValue {
                device: "A".to_string(),
                field: "bandwidth",
                value: String::new()
            }]
        );
    }

    #[test]
    fn test_legacy_coordinates_and_power_words() {
        let xml = "<NETWORK><DEVICES><DEVICE><ENGINE><NAME>A</NAME><TYPE model=\"PC-PT\"/>\
                   <POWER>Yes</POWER>\
                   <COORD_SETTINGS><X_COORD>-40</X_COORD><Y_COORD>12.25</Y_COORD></COORD_SETTINGS>\
                   </ENGINE></DEVICE></DEVICES></NETWORK>";
        let network = decode_str(xml).into_value();
        let device = &network.devices()[0];
        assert!(device.power);
        assert_eq!(device.coordinates, Coordinates::new(-40.0, 12.25));
    }

    #[test]
    fn test_control_characters_are_stripped() {
        let mut bytes = b"<NETWORK><VERSION>".to_vec();
        bytes.push(0xff);
        bytes.extend_from_slice(b"</VERSION><DEVICES><DEVICE><ENGINE><NAME>A\x01B</NAME>");
        bytes.extend_from_slice(b"<TYPE model=\"PC-PT\"/></ENGINE></DEVICE></DEVICES></NETWORK>");

        let outcome = decode(&bytes, &DecodeConfig::default()).unwrap();
        assert_eq!(outcome.value().devices()[0].name, "AB");
    }

    #[test]
    fn test_configured_names() {
        let config = DecodeConfig::new("Campus", "eth0");
        let outcome = decode(
            b"<NETWORK><DEVICES><DEVICE><ENGINE><NAME>A</NAME><TYPE model=\"PC-PT\"/></ENGINE></DEVICE></DEVICES></NETWORK>",
            &config,
        )
        .unwrap();
        assert_eq!(outcome.value().name(), "Campus");
        assert_eq!(outcome.value().devices()[0].interfaces[0].name, "eth0");
    }
}
