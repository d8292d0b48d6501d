//! Host network address (XNADDR)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::DomainError;

/// 6-byte Ethernet address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for MacAddress {
    type Err = DomainError;

    /// Accepts bare hex (`001122aabbcc`) or colon/dash separated octets.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s.chars().filter(|c| *c != ':' && *c != '-').collect();
        let mut bytes = [0u8; 6];
        hex::decode_to_slice(&digits, &mut bytes)
            .map_err(|e| DomainError::parse(format!("Invalid MAC address '{}': {}", s, e)))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> String {
        mac.to_string()
    }
}

/// Network address of a session host as the console describes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostAddress {
    /// LAN address
    pub ina: Ipv4Addr,
    /// Address as seen by the online service
    pub ina_online: Ipv4Addr,
    /// Port as seen by the online service
    pub port_online: u16,
    pub mac: MacAddress,
    /// Opaque online identification bytes
    #[serde(skip)]
    pub online_id: [u8; 20],
}

impl HostAddress {
    pub fn new(ina: Ipv4Addr, port_online: u16, mac: MacAddress) -> Self {
        Self {
            ina,
            ina_online: ina,
            port_online,
            mac,
            online_id: [0u8; 20],
        }
    }

    pub fn is_unset(&self) -> bool {
        self.ina.is_unspecified() && self.ina_online.is_unspecified()
    }
}

impl Default for HostAddress {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED, 0, MacAddress::default())
    }
}
