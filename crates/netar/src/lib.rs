//! NETAR - Network topology translator
//!
//! This library converts a network topology among three representations: the
//! NETAR text DSL, Packet Tracer compatible XML, and node/edge graph JSON for
//! visual editors. Every conversion goes through the [`Network`] IR:
//!
//! ```text
//! XML  ──decode──┐             ┌──emit────▶ DSL
//!                ├─▶ Network ──┼──encode──▶ XML
//! DSL  ──parse───┘             └──project─▶ graph JSON
//! ```
//!
//! Recoverable anomalies (unknown models, dangling link ends) never fail a
//! conversion; they come back as [`Warning`]s inside an [`Outcome`].

pub mod config;
pub mod dsl;
pub mod graph;
pub mod xml;

mod error;

pub use netar_core::{
    Address, Bandwidth, Coordinates, Device, DeviceKind, Endpoint, Interface, Link, Network,
    Outcome, Warning,
};
pub use netar_parser::Grammar;

pub use error::NetarError;

use log::{debug, info};

use config::AppConfig;
use graph::Graph;

/// Converter between the topology representations.
///
/// Holds the configuration and the DSL grammar tables. Both are immutable, so
/// one converter can serve any number of conversions, from any thread.
///
/// # Examples
///
/// ```rust
/// use netar::{Converter, config::AppConfig};
///
/// let source = "network Lab { device R1 router { } device S1 switch { } \
///               link R1.Gi0/0 -> S1.Gi0/1 { } }";
///
/// let converter = Converter::new(AppConfig::default());
///
/// // Parse source to the IR
/// let network = converter.parse_dsl(source)
///     .expect("Failed to parse")
///     .into_value();
///
/// // Encode as Packet Tracer XML
/// let xml = converter.encode_xml(&network)
///     .expect("Failed to encode")
///     .into_value();
/// assert!(xml.contains("<SAVE_REF_ID>1000</SAVE_REF_ID>"));
///
/// // Project to graph JSON
/// let json = converter.graph_json(&network)
///     .expect("Failed to serialize")
///     .into_value();
/// assert!(json.contains("\"edges\""));
/// ```
#[derive(Debug, Default)]
pub struct Converter {
    config: AppConfig,
    grammar: Grammar,
}

impl Converter {
    /// Create a converter with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            grammar: Grammar::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse DSL source into a network.
    ///
    /// # Errors
    ///
    /// Returns `NetarError::Parse` carrying the diagnostics and the source.
    pub fn parse_dsl(&self, source: &str) -> Result<Outcome<Network>, NetarError> {
        info!("Parsing topology source");
        let outcome = netar_parser::parse(source, &self.grammar)
            .map_err(|err| NetarError::new_parse_error(err, source))?;
        debug!(devices = outcome.value().devices().len(); "Topology source parsed");
        Ok(outcome)
    }

    /// Render a network as DSL source.
    pub fn emit_dsl(&self, network: &Network) -> String {
        info!(network = network.name(); "Emitting topology source");
        dsl::emit(network)
    }

    /// Decode PT XML bytes into a network.
    ///
    /// # Errors
    ///
    /// Returns `NetarError::Schema` if the bytes are not a PT network document.
    pub fn decode_xml(&self, bytes: &[u8]) -> Result<Outcome<Network>, NetarError> {
        info!(bytes = bytes.len(); "Decoding XML");
        Ok(xml::decode(bytes, &self.config.decode)?)
    }

    /// Encode a network as PT XML.
    ///
    /// # Errors
    ///
    /// Returns `NetarError::Encode` if a value does not fit the PT schema.
    pub fn encode_xml(&self, network: &Network) -> Result<Outcome<String>, NetarError> {
        info!(network = network.name(); "Encoding XML");
        Ok(xml::encode(network, &self.config.encode)?)
    }

    /// Project a network into graph nodes and edges.
    pub fn project_graph(&self, network: &Network) -> Outcome<Graph> {
        info!(network = network.name(); "Projecting graph");
        graph::project(network, &self.config.graph)
    }

    /// Project a network and serialize the graph as JSON.
    ///
    /// # Errors
    ///
    /// Returns `NetarError::Json` if serialization fails.
    pub fn graph_json(&self, network: &Network) -> Result<Outcome<String>, NetarError> {
        Ok(self
            .project_graph(network)
            .try_map(|graph| serde_json::to_string(&graph))?)
    }
}
