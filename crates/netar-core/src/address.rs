//! Interface address values.
//!
//! An interface carries either a concrete IPv4 address or the DHCP sentinel.
//! Unknown addresses default to `0.0.0.0`.

use std::{fmt, net::Ipv4Addr, str::FromStr};

use serde::{Serialize, Serializer};

/// Textual form of the DHCP sentinel as it appears in XML and graph output.
pub const DHCP_SENTINEL: &str = "<DHCP>";

/// The address assigned to an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    /// A statically assigned IPv4 address.
    Ipv4(Ipv4Addr),
    /// The address is leased through DHCP.
    Dhcp,
}

impl Address {
    /// Returns `true` if this is the DHCP sentinel.
    pub fn is_dhcp(&self) -> bool {
        matches!(self, Address::Dhcp)
    }

    /// Returns the IPv4 address, if one is statically assigned.
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        match self {
            Address::Ipv4(addr) => Some(*addr),
            Address::Dhcp => None,
        }
    }
}

impl Default for Address {
    fn default() -> Self {
        Address::Ipv4(Ipv4Addr::UNSPECIFIED)
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Self {
        Address::Ipv4(addr)
    }
}

impl FromStr for Address {
    type Err = std::net::AddrParseError;

    /// Parses a dotted-quad literal or the `<DHCP>` sentinel.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == DHCP_SENTINEL {
            return Ok(Address::Dhcp);
        }
        s.parse::<Ipv4Addr>().map(Address::Ipv4)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Ipv4(addr) => write!(f, "{addr}"),
            Address::Dhcp => f.write_str(DHCP_SENTINEL),
        }
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unspecified() {
        assert_eq!(Address::default().to_string(), "0.0.0.0");
    }

    #[test]
    fn test_parse_ipv4() {
        let addr: Address = "192.168.1.10".parse().unwrap();
        assert_eq!(addr.ipv4(), Some(Ipv4Addr::new(192, 168, 1, 10)));
        assert!(!addr.is_dhcp());
    }

    #[test]
    fn test_parse_dhcp_sentinel() {
        let addr: Address = "<DHCP>".parse().unwrap();
        assert!(addr.is_dhcp());
        assert_eq!(addr.to_string(), "<DHCP>");
    }

    #[test]
    fn test_rejects_out_of_range_octet() {
        assert!("256.1.1.1".parse::<Address>().is_err());
        assert!("10.0.0".parse::<Address>().is_err());
        assert!("dhcp".parse::<Address>().is_err());
    }
}
