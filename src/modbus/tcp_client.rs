// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Modbus TCP client for the gateway
//!
//! Wraps a tokio-modbus client context addressed to one unit id. Every
//! request is bounded by the configured timeout; nothing is retried.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::time::timeout;
use tokio_modbus::client::Context;
use tokio_modbus::prelude::*;

use super::RegisterSpace;
use crate::config::ConnectionConfig;
use crate::device::codec;
use crate::error::TransportError;

/// [`RegisterSpace`] backed by a Modbus TCP connection.
pub struct TcpRegisterSpace {
    ctx: Context,
    peer: SocketAddr,
    timeout: Duration,
}

impl TcpRegisterSpace {
    /// Resolve the configured host and open a session to the configured unit.
    pub async fn connect(settings: &ConnectionConfig) -> Result<Self, TransportError> {
        let target = format!("{}:{}", settings.address, settings.port);
        let request_timeout = Duration::from_millis(settings.timeout_ms);

        let peer = tokio::net::lookup_host(&target)
            .await
            .map_err(|source| TransportError::Connect {
                addr: target.clone(),
                source,
            })?
            .next()
            .ok_or_else(|| TransportError::Resolve(target.clone()))?;

        info!(
            "Connecting to gateway at {} (unit {})",
            peer, settings.slave_id
        );
        let ctx = timeout(
            request_timeout,
            tcp::connect_slave(peer, Slave(settings.slave_id)),
        )
        .await
        .map_err(|_| TransportError::Timeout {
            addr: peer,
            timeout: request_timeout,
        })?
        .map_err(|source| TransportError::Connect {
            addr: target,
            source,
        })?;

        Ok(Self {
            ctx,
            peer,
            timeout: request_timeout,
        })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Close the session.
    pub async fn disconnect(mut self) -> Result<(), TransportError> {
        debug!("Disconnecting from {}", self.peer);
        self.ctx.disconnect().await?;
        Ok(())
    }

    fn timed_out(&self) -> TransportError {
        TransportError::Timeout {
            addr: self.peer,
            timeout: self.timeout,
        }
    }
}

#[async_trait]
impl RegisterSpace for TcpRegisterSpace {
    async fn read_registers(
        &mut self,
        address: u16,
        count: u16,
    ) -> Result<Vec<u8>, TransportError> {
        debug!("Reading {} holding registers at {}", count, address);
        let words = timeout(self.timeout, self.ctx.read_holding_registers(address, count))
            .await
            .map_err(|_| self.timed_out())??
            .map_err(TransportError::Exception)?;

        if words.len() != usize::from(count) {
            warn!(
                "Requested {} registers at {}, device returned {}",
                count,
                address,
                words.len()
            );
        }

        Ok(codec::registers_to_bytes(&words))
    }

    async fn write_register(&mut self, address: u16, value: u16) -> Result<(), TransportError> {
        debug!("Writing {:#06x} to holding register {}", value, address);
        timeout(self.timeout, self.ctx.write_single_register(address, value))
            .await
            .map_err(|_| self.timed_out())??
            .map_err(TransportError::Exception)?;
        Ok(())
    }
}
