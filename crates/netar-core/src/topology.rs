//! Topology model types.
//!
//! These types form the single source of truth during a conversion. The DSL
//! parser and the XML decoder build a [`Network`]; the DSL emitter, the XML
//! encoder and the graph projector read it.
//!
//! # Pipeline Position
//!
//! ```text
//! DSL text ──lex+parse──┐                ┌──emit────▶ DSL text
//!                       ├──▶ Network ──▶─┼──encode──▶ XML
//! XML ────────decode────┘                └──project─▶ graph JSON
//! ```

use std::{collections::HashMap, fmt};

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::{address::Address, bandwidth::Bandwidth, error::ModelError};

/// Ordered key/value properties attached to a [`Link`].
///
/// Re-inserting an existing key replaces its value and keeps its position.
pub type Properties = IndexMap<String, String>;

/// The kind of a device.
///
/// Types outside the fixed set are carried verbatim in [`DeviceKind::Other`]
/// so newer descriptions are never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Pc,
    Laptop,
    Router,
    Switch,
    Firewall,
    Server,
    /// An unrecognized type, kept as written.
    Other(String),
}

impl DeviceKind {
    /// Every recognized device kind, in keyword order.
    pub const KNOWN: [DeviceKind; 6] = [
        DeviceKind::Pc,
        DeviceKind::Laptop,
        DeviceKind::Router,
        DeviceKind::Switch,
        DeviceKind::Firewall,
        DeviceKind::Server,
    ];

    /// Resolve a type name, falling back to [`DeviceKind::Other`].
    pub fn from_name(name: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .unwrap_or_else(|| DeviceKind::Other(name.to_string()))
    }

    /// Returns the type name as written in the DSL.
    pub fn as_str(&self) -> &str {
        match self {
            DeviceKind::Pc => "pc",
            DeviceKind::Laptop => "laptop",
            DeviceKind::Router => "router",
            DeviceKind::Switch => "switch",
            DeviceKind::Firewall => "firewall",
            DeviceKind::Server => "server",
            DeviceKind::Other(name) => name,
        }
    }

    /// Returns `true` for kinds outside the fixed set.
    pub fn is_other(&self) -> bool {
        matches!(self, DeviceKind::Other(_))
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DeviceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Logical workspace position of a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A network interface on a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub address: Address,
    pub bandwidth: Bandwidth,
}

impl Interface {
    /// Create an interface with the default address and zero bandwidth.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: Address::default(),
            bandwidth: Bandwidth::default(),
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    pub fn with_bandwidth(mut self, bandwidth: Bandwidth) -> Self {
        self.bandwidth = bandwidth;
        self
    }
}

/// A device in the topology.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub name: String,
    pub kind: DeviceKind,
    pub coordinates: Coordinates,
    pub power: bool,
    pub interfaces: Vec<Interface>,
}

impl Device {
    /// Create a powered-off device at the origin with no interfaces.
    pub fn new(name: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            coordinates: Coordinates::default(),
            power: false,
            interfaces: Vec::new(),
        }
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = coordinates;
        self
    }

    pub fn with_power(mut self, power: bool) -> Self {
        self.power = power;
        self
    }

    pub fn with_interface(mut self, interface: Interface) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Returns the first interface, which codecs with a single-port view use.
    pub fn primary_interface(&self) -> Option<&Interface> {
        self.interfaces.first()
    }
}

/// One side of a [`Link`]: a device name and a port on it.
///
/// Neither part is required to resolve against the network's devices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub device: String,
    pub port: String,
}

impl Endpoint {
    pub fn new(device: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            port: port.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.device, self.port)
    }
}

/// A cable between two endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub from: Endpoint,
    pub to: Endpoint,
    pub properties: Properties,
}

impl Link {
    pub fn new(from: Endpoint, to: Endpoint) -> Self {
        Self {
            from,
            to,
            properties: Properties::new(),
        }
    }

    /// Set a property, replacing any earlier value for the same key.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// A named topology: ordered devices and ordered links.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    name: String,
    devices: Vec<Device>,
    links: Vec<Link>,
    /// Device name to position in `devices`.
    index: HashMap<String, usize>,
}

impl Network {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            devices: Vec::new(),
            links: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Devices in insertion order.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Links in insertion order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Look up a device by name.
    pub fn device(&self, name: &str) -> Option<&Device> {
        self.device_index(name).map(|index| &self.devices[index])
    }

    /// Position of a device in the device list.
    pub fn device_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Append a device.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateDevice`] if a device with the same name
    /// already exists; the network is left unchanged.
    pub fn add_device(&mut self, device: Device) -> Result<(), ModelError> {
        if self.index.contains_key(&device.name) {
            return Err(ModelError::DuplicateDevice(device.name));
        }
        self.index.insert(device.name.clone(), self.devices.len());
        self.devices.push(device);
        Ok(())
    }

    /// Append a link. Endpoints are not checked.
    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Link endpoints that name no device, as `(link index, device name)`.
    pub fn unresolved_endpoints(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.links.iter().enumerate().flat_map(move |(index, link)| {
            [&link.from, &link.to]
                .into_iter()
                .filter(|endpoint| !self.index.contains_key(&endpoint.device))
                .map(move |endpoint| (index, endpoint.device.as_str()))
        })
    }
}
