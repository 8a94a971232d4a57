// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Gateway connection configuration
//!
//! This module defines the settings used to reach the gateway over
//! Modbus TCP.

use serde::{Deserialize, Serialize};

/// Configuration for the Modbus TCP connection to the gateway.
///
/// # Fields
///
/// * `address` - Current network address (IP or host name) of the gateway
/// * `port` - TCP port of the gateway's Modbus server (default: 502)
/// * `slave_id` - Modbus unit identifier of the gateway (default: 1)
/// * `timeout_ms` - Connect and request timeout in milliseconds (default: 5000)
///
/// # Example
///
/// ```
/// use m31_config::config::ConnectionConfig;
///
/// let connection = ConnectionConfig {
///     address: "192.168.3.7".to_string(),
///     port: 502,
///     slave_id: 1,
///     timeout_ms: 2000,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// The network address of the gateway.
    ///
    /// Can be an IPv4/IPv6 address or a host name.
    pub address: String,

    /// The TCP port of the gateway's Modbus server.
    ///
    /// Valid range is 1-65535. Default value is 502, the standard Modbus TCP port.
    pub port: u16,

    /// Modbus unit (slave) identifier the requests are addressed to.
    pub slave_id: u8,

    /// Timeout applied to connecting and to every request, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 502,
            slave_id: 1,
            timeout_ms: 5000,
        }
    }
}
