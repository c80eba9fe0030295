//! Graph projection for node/edge editors.
//!
//! A one-way view of a [`Network`]: one node per device, one edge per link
//! whose ends both name a device. Serializes to the JSON shape React Flow
//! style editors load.

use std::collections::HashMap;

use log::{debug, info};
use serde::Serialize;

use netar_core::{Address, Coordinates, Device, DeviceKind, Network, Outcome, Warning, Warnings};

use crate::config::GraphConfig;

/// Node type every projected device gets.
const NODE_TYPE: &str = "custom";

/// Edge type every projected link gets.
const EDGE_TYPE: &str = "straight";

/// Icon name for device kinds without an icon of their own.
const UNKNOWN_ICON: &str = "unknown";

/// Device kinds that have an icon named after them.
const ICON_KINDS: [DeviceKind; 5] = [
    DeviceKind::Pc,
    DeviceKind::Laptop,
    DeviceKind::Switch,
    DeviceKind::Router,
    DeviceKind::Server,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// 1-based device position, as a string.
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: &'static str,
    pub data: NodeData,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeData {
    pub label: String,
    /// Icon URL.
    pub src: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    /// `"x y"`
    pub coordinates: String,
    pub power_on: bool,
    pub interface: InterfaceData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceData {
    pub name: String,
    pub ip: Address,
    pub bandwidth: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    /// `e` followed by the 0-based link index.
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: &'static str,
    pub animated: bool,
}

/// Project a network into nodes and edges.
///
/// A link with an end that names no device has no edge; each such end is
/// reported as an [`Warning::UnresolvedReference`].
pub fn project(network: &Network, config: &GraphConfig) -> Outcome<Graph> {
    let mut warnings = Warnings::new();

    let nodes: Vec<Node> = network
        .devices()
        .iter()
        .enumerate()
        .map(|(index, device)| node(index + 1, device, config))
        .collect();

    let ids: HashMap<&str, &str> = network
        .devices()
        .iter()
        .zip(&nodes)
        .map(|(device, node)| (device.name.as_str(), node.id.as_str()))
        .collect();

    let mut edges = Vec::with_capacity(network.links().len());
    for (index, link) in network.links().iter().enumerate() {
        let source = ids.get(link.from.device.as_str());
        let target = ids.get(link.to.device.as_str());

        for (endpoint, id) in [(&link.from, source), (&link.to, target)] {
            if id.is_none() {
                warnings.emit(Warning::UnresolvedReference {
                    link: index,
                    device: endpoint.device.clone(),
                });
            }
        }

        if let (Some(source), Some(target)) = (source, target) {
            edges.push(Edge {
                id: format!("e{index}"),
                source: (*source).to_string(),
                target: (*target).to_string(),
                edge_type: EDGE_TYPE,
                animated: true,
            });
        } else {
            debug!(link = index; "Dropping edge with unresolved endpoint");
        }
    }

    info!(nodes = nodes.len(), edges = edges.len(); "Graph projected");
    warnings.finish(Graph { nodes, edges })
}

fn node(id: usize, device: &Device, config: &GraphConfig) -> Node {
    let icon = if ICON_KINDS.contains(&device.kind) {
        device.kind.as_str()
    } else {
        UNKNOWN_ICON
    };

    let interface = match device.primary_interface() {
        Some(interface) => InterfaceData {
            name: interface.name.clone(),
            ip: interface.address,
            bandwidth: interface.bandwidth.mbps(),
        },
        None => InterfaceData {
            name: String::new(),
            ip: Address::default(),
            bandwidth: 0,
        },
    };

    let Coordinates { x, y } = device.coordinates;
    Node {
        id: id.to_string(),
        node_type: NODE_TYPE,
        data: NodeData {
            label: device.name.clone(),
            src: format!("{}/{icon}.png", config.icon_base()),
            kind: device.kind.clone(),
            coordinates: format!("{x:?} {y:?}"),
            power_on: device.power,
            interface,
        },
        position: Position { x, y },
    }
}
