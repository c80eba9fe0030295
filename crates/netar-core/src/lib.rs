//! NETAR Core Types
//!
//! This crate provides the canonical intermediate representation shared by
//! every NETAR codec. It includes:
//!
//! - **Topology**: [`Network`], [`Device`], [`Interface`] and [`Link`] ([`topology`] module)
//! - **Addresses**: IPv4 literals and the DHCP sentinel ([`address::Address`])
//! - **Bandwidth**: Mbps values and the raw-unit conversion law ([`bandwidth::Bandwidth`])
//! - **Warnings**: Recoverable anomalies reported alongside results ([`warning`] module)
//!
//! A [`Network`] is built fresh by whichever decoder reads the input and is
//! dropped once the encoder has produced its output.

pub mod address;
pub mod bandwidth;
pub mod topology;
pub mod warning;

mod error;

pub use address::Address;
pub use bandwidth::Bandwidth;
pub use error::ModelError;
pub use topology::{
    Coordinates, Device, DeviceKind, Endpoint, Interface, Link, Network, Properties,
};
pub use warning::{Outcome, Warning, Warnings};
