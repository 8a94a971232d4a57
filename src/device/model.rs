// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Decoded gateway configuration and its lookup tables

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Serialize, Serializer};

use super::layout;

/// Serial baud rates, indexed by `rate code - 1`.
pub const BAUD_RATES: [u32; 8] = [2400, 4800, 9600, 19200, 38400, 57600, 115200, 230400];

/// Value of an enumerated register after classification.
///
/// Codes outside the known table are kept as-is so newer firmware values
/// stay visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classified<T> {
    Known(T),
    Unknown(u16),
}

impl<T> Classified<T> {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Classified::Unknown(_))
    }
}

/// Serial port parity, indexed directly by its register code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl Parity {
    pub const TABLE: [Parity; 3] = [Parity::None, Parity::Odd, Parity::Even];

    pub fn name(&self) -> &'static str {
        match self {
            Parity::None => "NONE",
            Parity::Odd => "ODD",
            Parity::Even => "EVEN",
        }
    }
}

/// Role of the gateway on the network side, indexed directly by its register code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkMode {
    TcpServer,
    TcpClient,
    UdpServer,
    UdpClient,
}

impl NetworkMode {
    pub const TABLE: [NetworkMode; 4] = [
        NetworkMode::TcpServer,
        NetworkMode::TcpClient,
        NetworkMode::UdpServer,
        NetworkMode::UdpClient,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NetworkMode::TcpServer => "TCP server",
            NetworkMode::TcpClient => "TCP client",
            NetworkMode::UdpServer => "UDP server",
            NetworkMode::UdpClient => "UDP client",
        }
    }
}

/// Modbus framing used on the network side. Only code 1 means TCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProtocolType {
    Tcp,
    Rtu,
}

impl ProtocolType {
    pub fn name(&self) -> &'static str {
        match self {
            ProtocolType::Tcp => "TCP",
            ProtocolType::Rtu => "RTU",
        }
    }
}

/// Hardware address of the gateway's Ethernet interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress(pub [u8; 6]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fixed-size, zero-padded ASCII buffer holding the destination host name.
#[derive(Clone, PartialEq, Eq)]
pub struct DomainName(pub [u8; layout::DESTINATION_DOMAIN_NAME.len]);

impl DomainName {
    /// Bytes up to the first NUL.
    pub fn as_bytes(&self) -> &[u8] {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(self.0.len());
        &self.0[..end]
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }
}

impl fmt::Debug for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DomainName")
            .field(&self.to_string_lossy())
            .finish()
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl Serialize for DomainName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_lossy())
    }
}

/// One decoded snapshot of the gateway configuration block.
///
/// A snapshot is never updated in place: writes go to the device register
/// by register and a fresh read is needed to observe them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceConfig {
    /// Serial baud rate in bit/s.
    pub baud_rate: Classified<u32>,
    pub parity: Classified<Parity>,
    pub network_mode: Classified<NetworkMode>,
    pub dhcp_enabled: bool,
    pub mac_address: MacAddress,
    pub address: Ipv4Addr,
    pub subnet_mask: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub dns: Ipv4Addr,
    pub reserved: [u8; 4],
    pub port: u16,
    pub destination_domain_name: DomainName,
    pub destination_port: u16,
    pub protocol_type: ProtocolType,
    pub address_negotiation_write_register: u16,
    pub address_negotiation_register: u16,
    pub negotiation_status: u16,
    pub exception_code: u16,
}

impl Default for DeviceConfig {
    /// Factory settings of a fresh gateway.
    fn default() -> Self {
        Self {
            baud_rate: Classified::Known(9600),
            parity: Classified::Known(Parity::None),
            network_mode: Classified::Known(NetworkMode::TcpServer),
            dhcp_enabled: false,
            mac_address: MacAddress([0x00, 0x1A, 0x2B, 0x00, 0x00, 0x01]),
            address: Ipv4Addr::new(192, 168, 3, 7),
            subnet_mask: Ipv4Addr::new(255, 255, 255, 0),
            gateway: Ipv4Addr::new(192, 168, 3, 1),
            dns: Ipv4Addr::new(192, 168, 3, 1),
            reserved: [0; 4],
            port: 502,
            destination_domain_name: DomainName([0; layout::DESTINATION_DOMAIN_NAME.len]),
            destination_port: 0,
            protocol_type: ProtocolType::Tcp,
            address_negotiation_write_register: 0,
            address_negotiation_register: 0,
            negotiation_status: 0,
            exception_code: 0,
        }
    }
}

/// Configuration fields that can be changed with single-register writes.
///
/// Each one is an IPv4 address spread over two consecutive registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WritableField {
    DeviceAddress,
    SubnetMask,
    Gateway,
    Dns,
}

impl WritableField {
    pub const ALL: [WritableField; 4] = [
        WritableField::DeviceAddress,
        WritableField::SubnetMask,
        WritableField::Gateway,
        WritableField::Dns,
    ];

    /// Register receiving the two high octets; the low octets go to the next one.
    pub const fn base_register(&self) -> u16 {
        match self {
            WritableField::DeviceAddress => layout::ADDRESS.register(),
            WritableField::SubnetMask => layout::SUBNET_MASK.register(),
            WritableField::Gateway => layout::GATEWAY.register(),
            WritableField::Dns => layout::DNS.register(),
        }
    }

    /// Both registers of the field, in write order.
    pub const fn registers(&self) -> [u16; 2] {
        let base = self.base_register();
        [base, base + 1]
    }

    /// Current value of this field in a decoded snapshot.
    pub fn current(&self, config: &DeviceConfig) -> Ipv4Addr {
        match self {
            WritableField::DeviceAddress => config.address,
            WritableField::SubnetMask => config.subnet_mask,
            WritableField::Gateway => config.gateway,
            WritableField::Dns => config.dns,
        }
    }
}

impl fmt::Display for WritableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WritableField::DeviceAddress => "device address",
            WritableField::SubnetMask => "subnet mask",
            WritableField::Gateway => "gateway",
            WritableField::Dns => "DNS",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writable_field_registers() {
        assert_eq!(WritableField::DeviceAddress.registers(), [30007, 30008]);
        assert_eq!(WritableField::SubnetMask.registers(), [30009, 30010]);
        assert_eq!(WritableField::Gateway.registers(), [30011, 30012]);
        assert_eq!(WritableField::Dns.registers(), [30013, 30014]);
    }

    #[test]
    fn writable_field_reads_its_own_value() {
        let config = DeviceConfig {
            address: Ipv4Addr::new(10, 0, 0, 5),
            subnet_mask: Ipv4Addr::new(255, 0, 0, 0),
            gateway: Ipv4Addr::new(10, 0, 0, 1),
            dns: Ipv4Addr::new(9, 9, 9, 9),
            ..DeviceConfig::default()
        };
        let values: Vec<Ipv4Addr> = WritableField::ALL
            .iter()
            .map(|field| field.current(&config))
            .collect();
        assert_eq!(
            values,
            [config.address, config.subnet_mask, config.gateway, config.dns]
        );
    }

    #[test]
    fn mac_address_is_colon_separated_hex() {
        let mac = MacAddress([0xAA, 0xBB, 0xCC, 0x0D, 0xEE, 0x01]);
        assert_eq!(mac.to_string(), "AA:BB:CC:0D:EE:01");
    }

    #[test]
    fn domain_name_stops_at_first_nul() {
        let mut raw = [0u8; 128];
        raw[..11].copy_from_slice(b"example.org");
        raw[12] = b'x';
        let name = DomainName(raw);
        assert_eq!(name.to_string(), "example.org");
        assert!(!name.is_empty());
        assert!(DomainName([0; 128]).is_empty());
    }

    #[test]
    fn classified_serializes_with_tag() {
        let known = serde_json::to_value(Classified::Known(NetworkMode::UdpClient)).unwrap();
        assert_eq!(known, serde_json::json!({ "known": "udp_client" }));
        let unknown = serde_json::to_value(Classified::<NetworkMode>::Unknown(9)).unwrap();
        assert_eq!(unknown, serde_json::json!({ "unknown": 9 }));
    }
}
