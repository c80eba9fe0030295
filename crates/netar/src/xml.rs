//! Packet Tracer compatible XML codec.
//!
//! [`decode`] reads a PT save file (or the bare `NETWORK` document that
//! [`encode`] writes) into the [`Network`] IR. The decode direction is
//! canonical: everything it reads survives `decode(encode(network))`. Cable
//! `TYPE` and `FUNCTIONAL` are written on encode for PT's sake and ignored
//! on decode.
//!
//! ```text
//! NETWORK
//! ├── DEVICES/DEVICE
//! │   ├── ENGINE/{NAME, TYPE@model, POWER, SAVE_REF_ID}
//! │   ├── WORKSPACE/LOGICAL/{X, Y}
//! │   └── PORT/{IP, BANDWIDTH, PORT_DHCP_ENABLE}
//! └── LINKS/LINK/CABLE/{FROM, PORT, TO, PORT, TYPE, FUNCTIONAL}
//! ```
//!
//! [`Network`]: netar_core::Network

mod decode;
mod encode;
mod models;

pub use decode::decode;
pub use encode::encode;

use thiserror::Error;

/// The document cannot be read as a PT network.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed XML: {0}")]
    Malformed(#[from] roxmltree::Error),

    #[error("no <NETWORK> element at the root or directly below it")]
    MissingNetwork,

    #[error("<NETWORK> has no <DEVICES> section")]
    MissingDevices,

    #[error("device #{index} has no <ENGINE>/<NAME>")]
    MissingDeviceName { index: usize },

    #[error(transparent)]
    Model(#[from] netar_core::ModelError),
}

/// The network cannot be written as PT XML.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("bandwidth of {mbps} Mbps on `{device}` overflows the PT field")]
    BandwidthOverflow { device: String, mbps: u64 },

    #[error("save-ref id overflow after device `{device}`")]
    RefIdOverflow { device: String },

    #[error("XML write failed: {0}")]
    Write(String),
}
