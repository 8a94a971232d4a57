// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Modbus communication module
//!
//! The configuration core talks to the gateway only through the
//! [`RegisterSpace`] trait: read a run of holding registers, write a single
//! holding register. This module provides that trait, a Modbus TCP client
//! implementing it, and a simulated gateway answering the same requests.
//!
//! ## Key Components
//!
//! - `RegisterSpace`: the register access capability needed by the codec
//!   and the updater.
//! - `TcpRegisterSpace`: `RegisterSpace` over a tokio-modbus TCP client.
//! - `GatewaySimulator`: tokio-modbus server service holding an in-memory
//!   copy of the configuration block, used by tests and the
//!   `gateway_simulator` binary.
//!
//! ## Register Map
//!
//! ### Holding Registers
//!
//! - Registers 30000-30088: configuration block (read)
//! - Registers 30007-30008: device address (write)
//! - Registers 30009-30010: subnet mask (write)
//! - Registers 30011-30012: gateway (write)
//! - Registers 30013-30014: DNS (write)

pub mod simulator;
pub mod tcp_client;

use async_trait::async_trait;

use crate::error::TransportError;

pub use simulator::GatewaySimulator;
pub use tcp_client::TcpRegisterSpace;

/// Register-level access to a device.
///
/// Implementations own the transport: connection handling, timeouts and
/// error mapping all happen behind this trait. Calls are issued one at a
/// time by the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegisterSpace: Send {
    /// Read `count` holding registers starting at `address`.
    ///
    /// Returns the register contents as big-endian bytes, two per register.
    async fn read_registers(&mut self, address: u16, count: u16)
        -> Result<Vec<u8>, TransportError>;

    /// Write one holding register.
    async fn write_register(&mut self, address: u16, value: u16) -> Result<(), TransportError>;
}
