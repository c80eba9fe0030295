use std::collections::HashMap;

use log::{debug, info};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use netar_core::{Address, Device, Endpoint, Link, Network, Outcome, Warning, Warnings};

use super::{EncodeError, models::model_for_kind};
use crate::config::EncodeConfig;

/// Cable type written when a link has no `cable` property.
const DEFAULT_CABLE_TYPE: &str = "eStraightThrough";

/// Encode a network as a bare `NETWORK` document.
///
/// The output is a pure function of the network and configuration: the same
/// input always yields the same bytes.
///
/// # Errors
///
/// Returns an [`EncodeError`] if a bandwidth or save-ref id does not fit the
/// PT fields.
pub fn encode(network: &Network, config: &EncodeConfig) -> Result<Outcome<String>, EncodeError> {
    let refs = assign_refs(network, config.ref_id_base())?;
    let mut warnings = Warnings::new();
    let mut out = XmlWriter::new();

    out.declaration()?;
    out.start("NETWORK")?;

    out.start("DEVICES")?;
    for device in network.devices() {
        let save_ref = refs.get(device.name.as_str()).copied().unwrap_or_default();
        out.device(device, save_ref)?;
    }
    out.end("DEVICES")?;

    out.start("LINKS")?;
    for (index, link) in network.links().iter().enumerate() {
        let from = cable_end(&refs, index, &link.from, &mut warnings);
        let to = cable_end(&refs, index, &link.to, &mut warnings);
        out.cable(link, &from, &to)?;
    }
    out.end("LINKS")?;

    out.end("NETWORK")?;
    let xml = out.finish()?;

    info!(
        devices = network.devices().len(),
        links = network.links().len(),
        bytes = xml.len();
        "XML encoded"
    );
    Ok(warnings.finish(xml))
}

/// Consecutive save-ref ids from `base`, in device order.
fn assign_refs(network: &Network, base: u64) -> Result<HashMap<&str, u64>, EncodeError> {
    let mut refs = HashMap::with_capacity(network.devices().len());
    let mut next = Some(base);
    for device in network.devices() {
        let id = next.ok_or_else(|| EncodeError::RefIdOverflow {
            device: device.name.clone(),
        })?;
        refs.insert(device.name.as_str(), id);
        next = id.checked_add(1);
    }
    Ok(refs)
}

/// Save-ref id of a cable end, or an empty string when the endpoint names no
/// device. An empty id never matches a device on decode.
fn cable_end(
    refs: &HashMap<&str, u64>,
    index: usize,
    endpoint: &Endpoint,
    warnings: &mut Warnings,
) -> String {
    match refs.get(endpoint.device.as_str()) {
        Some(id) => id.to_string(),
        None => {
            warnings.emit(Warning::UnresolvedReference {
                link: index,
                device: endpoint.device.clone(),
            });
            String::new()
        }
    }
}

/// PT cable type for a `cable` property value: `crossOver` → `eCrossOver`.
fn cable_type(link: &Link) -> String {
    let Some(value) = link.property("cable").filter(|value| !value.is_empty()) else {
        return DEFAULT_CABLE_TYPE.to_string();
    };

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some('e'), Some(second)) if second.is_ascii_uppercase() => value.to_string(),
        (Some(first), _) => format!("e{}{}", first.to_ascii_uppercase(), &value[first.len_utf8()..]),
        (None, _) => DEFAULT_CABLE_TYPE.to_string(),
    }
}

/// Indenting XML writer with errors mapped to [`EncodeError::Write`].
struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), EncodeError> {
        self.writer
            .write_event(event)
            .map_err(|err| EncodeError::Write(err.to_string()))
    }

    fn declaration(&mut self) -> Result<(), EncodeError> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    fn start(&mut self, tag: &str) -> Result<(), EncodeError> {
        self.write(Event::Start(BytesStart::new(tag)))
    }

    fn end(&mut self, tag: &str) -> Result<(), EncodeError> {
        self.write(Event::End(BytesEnd::new(tag)))
    }

    /// `<tag>text</tag>` with `text` escaped, or `<tag/>` when empty.
    fn leaf(&mut self, tag: &str, text: &str) -> Result<(), EncodeError> {
        if text.is_empty() {
            return self.write(Event::Empty(BytesStart::new(tag)));
        }
        self.start(tag)?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.end(tag)
    }

    fn device(&mut self, device: &Device, save_ref: u64) -> Result<(), EncodeError> {
        debug!(device = device.name.as_str(), save_ref = save_ref; "Encoding device");
        self.start("DEVICE")?;

        self.start("ENGINE")?;
        self.leaf("NAME", &device.name)?;
        self.write(Event::Empty(
            BytesStart::new("TYPE").with_attributes([("model", model_for_kind(&device.kind))]),
        ))?;
        self.leaf("POWER", if device.power { "true" } else { "false" })?;
        self.leaf("SAVE_REF_ID", &save_ref.to_string())?;
        self.end("ENGINE")?;

        self.start("WORKSPACE")?;
        self.start("LOGICAL")?;
        self.leaf("X", &device.coordinates.x.to_string())?;
        self.leaf("Y", &device.coordinates.y.to_string())?;
        self.end("LOGICAL")?;
        self.end("WORKSPACE")?;

        for interface in &device.interfaces {
            let raw = interface
                .bandwidth
                .to_raw()
                .ok_or_else(|| EncodeError::BandwidthOverflow {
                    device: device.name.clone(),
                    mbps: interface.bandwidth.mbps(),
                })?;

            self.start("PORT")?;
            match interface.address {
                Address::Ipv4(addr) => self.leaf("IP", &addr.to_string())?,
                Address::Dhcp => self.leaf("IP", "")?,
            }
            self.leaf("BANDWIDTH", &raw.to_string())?;
            if interface.address.is_dhcp() {
                self.leaf("PORT_DHCP_ENABLE", "true")?;
            }
            self.end("PORT")?;
        }

        self.end("DEVICE")
    }

    fn cable(&mut self, link: &Link, from: &str, to: &str) -> Result<(), EncodeError> {
        self.start("LINK")?;
        self.start("CABLE")?;
        self.leaf("FROM", from)?;
        self.leaf("PORT", &link.from.port)?;
        self.leaf("TO", to)?;
        self.leaf("PORT", &link.to.port)?;
        self.leaf("TYPE", &cable_type(link))?;
        self.leaf("FUNCTIONAL", "true")?;
        self.end("CABLE")?;
        self.end("LINK")
    }

    fn finish(self) -> Result<String, EncodeError> {
        let mut xml = String::from_utf8(self.writer.into_inner())
            .map_err(|err| EncodeError::Write(err.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }
}
