use serde::Deserialize;

/// Application configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// XML decode section
    #[serde(default)]
    pub decode: DecodeConfig,

    /// XML encode section
    #[serde(default)]
    pub encode: EncodeConfig,

    /// Graph projection section
    #[serde(default)]
    pub graph: GraphConfig,
}

/// XML decode configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct DecodeConfig {
    /// Name given to decoded networks; PT files carry none
    #[serde(default = "default_network_name")]
    network_name: String,

    /// Name of the single interface synthesized per decoded device
    #[serde(default = "default_interface_name")]
    interface_name: String,
}

impl DecodeConfig {
    pub fn new(network_name: impl Into<String>, interface_name: impl Into<String>) -> Self {
        Self {
            network_name: network_name.into(),
            interface_name: interface_name.into(),
        }
    }

    pub fn network_name(&self) -> &str {
        &self.network_name
    }

    pub fn interface_name(&self) -> &str {
        &self.interface_name
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self::new(default_network_name(), default_interface_name())
    }
}

/// XML encode configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct EncodeConfig {
    /// First save-ref id handed out; later devices count up from here
    #[serde(default = "default_ref_id_base")]
    ref_id_base: u64,
}

impl EncodeConfig {
    pub fn new(ref_id_base: u64) -> Self {
        Self { ref_id_base }
    }

    pub fn ref_id_base(&self) -> u64 {
        self.ref_id_base
    }
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self::new(default_ref_id_base())
    }
}

/// Graph projection configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    /// URL prefix of the device icons
    #[serde(default = "default_icon_base")]
    icon_base: String,
}

impl GraphConfig {
    pub fn new(icon_base: impl Into<String>) -> Self {
        Self {
            icon_base: icon_base.into(),
        }
    }

    /// Icon base with any trailing `/` removed.
    pub fn icon_base(&self) -> &str {
        self.icon_base.trim_end_matches('/')
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::new(default_icon_base())
    }
}

fn default_network_name() -> String {
    "MyNetwork".to_string()
}

fn default_interface_name() -> String {
    "FastEthernet0".to_string()
}

fn default_ref_id_base() -> u64 {
    1000
}

fn default_icon_base() -> String {
    "/images".to_string()
}
