// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Simulated M31 gateway
//!
//! For avoiding confusion with the Modbus master/slave terminology, this module uses
//! the terms "server" and "client" instead. The simulator is the server, it plays the
//! part of the gateway; the configuration tool is the client.
//!
//! The simulator keeps the 89-register configuration block in memory. Reads may cover
//! any part of the block, single-register writes are only accepted for the registers
//! of the network identity fields (30007-30014), like on the real device.

use std::{
    collections::HashMap,
    future, io,
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard},
};

use log::{debug, error, info};
use tokio::net::{TcpListener, TcpStream};
use tokio_modbus::{
    prelude::*,
    server::tcp::{accept_tcp_connection, Server},
};

use crate::device::{codec, layout, DeviceConfig, WritableField};

/// In-memory gateway answering holding-register requests.
///
/// Clones share the same register map, so a test can keep one handle and
/// inspect what the client wrote.
#[derive(Debug, Clone)]
pub struct GatewaySimulator {
    holding_registers: Arc<Mutex<HashMap<u16, u16>>>,
}

impl tokio_modbus::server::Service for GatewaySimulator {
    type Request = Request<'static>;
    type Response = Response;
    type Exception = ExceptionCode;
    type Future = future::Ready<Result<Self::Response, Self::Exception>>;

    fn call(&self, req: Self::Request) -> Self::Future {
        let res = match req {
            Request::ReadHoldingRegisters(addr, cnt) => {
                register_read(&self.registers(), addr, cnt).map(Response::ReadHoldingRegisters)
            }
            Request::WriteSingleRegister(addr, value) => {
                register_write(&mut self.registers(), addr, value)
                    .map(|_| Response::WriteSingleRegister(addr, value))
            }
            _ => {
                error!("SERVER: Exception::IllegalFunction - Unimplemented function code in request: {req:?}");
                Err(ExceptionCode::IllegalFunction)
            }
        };
        future::ready(res)
    }
}

impl GatewaySimulator {
    /// Create a simulator exposing `config` as its configuration block.
    pub fn new(config: &DeviceConfig) -> Self {
        Self::from_registers(&codec::encode_registers(config))
    }

    /// Create a simulator exposing `words` from register 30000 on.
    ///
    /// A run shorter than the 89-register block behaves like older firmware:
    /// full block reads are refused while the registers present stay writable.
    pub fn from_registers(words: &[u16]) -> Self {
        let holding_registers = words
            .iter()
            .copied()
            .zip(layout::CONFIG_BASE_REGISTER..)
            .map(|(value, addr)| (addr, value))
            .collect();
        Self {
            holding_registers: Arc::new(Mutex::new(holding_registers)),
        }
    }

    /// Current value of one register, if it exists.
    pub fn register(&self, addr: u16) -> Option<u16> {
        self.registers().get(&addr).copied()
    }

    /// Decode the current register contents.
    pub fn snapshot(&self) -> crate::error::Result<DeviceConfig> {
        let registers = self.registers();
        let words: Vec<u16> = (0..layout::CONFIG_REGISTER_COUNT)
            .map(|i| {
                registers
                    .get(&(layout::CONFIG_BASE_REGISTER + i))
                    .copied()
                    .unwrap_or_default()
            })
            .collect();
        codec::decode_registers(&words)
    }

    fn registers(&self) -> MutexGuard<'_, HashMap<u16, u16>> {
        self.holding_registers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Accept Modbus TCP connections on `listener` until the listener fails.
pub async fn serve(listener: TcpListener, simulator: GatewaySimulator) -> io::Result<()> {
    info!("Gateway simulator listening on {}", listener.local_addr()?);
    let server = Server::new(listener);
    let new_service = move |socket_addr: SocketAddr| -> io::Result<Option<GatewaySimulator>> {
        debug!("SERVER: connection from {}", socket_addr);
        Ok(Some(simulator.clone()))
    };
    let on_connected = move |stream: TcpStream, socket_addr: SocketAddr| {
        let new_service = new_service.clone();
        async move { accept_tcp_connection(stream, socket_addr, new_service) }
    };
    let on_process_error = |err: io::Error| {
        error!("SERVER: {}", err);
    };
    server.serve(&on_connected, on_process_error).await
}

/// Helper function implementing reading registers from a HashMap.
fn register_read(
    registers: &HashMap<u16, u16>,
    addr: u16,
    cnt: u16,
) -> Result<Vec<u16>, ExceptionCode> {
    let mut response_values = vec![0; cnt.into()];
    for i in 0..cnt {
        let reg_addr = addr.checked_add(i).ok_or(ExceptionCode::IllegalDataAddress)?;
        if let Some(r) = registers.get(&reg_addr) {
            response_values[i as usize] = *r;
        } else {
            error!("SERVER: Exception::IllegalDataAddress - read of register {reg_addr}");
            return Err(ExceptionCode::IllegalDataAddress);
        }
    }

    Ok(response_values)
}

/// Write one holding register, if it belongs to a writable field.
fn register_write(
    registers: &mut HashMap<u16, u16>,
    addr: u16,
    value: u16,
) -> Result<(), ExceptionCode> {
    let writable = WritableField::ALL
        .iter()
        .any(|field| field.registers().contains(&addr));
    match registers.get_mut(&addr) {
        Some(r) if writable => {
            debug!("SERVER: register {} <- {:#06x}", addr, value);
            *r = value;
            Ok(())
        }
        _ => {
            error!("SERVER: Exception::IllegalDataAddress - write to register {addr}");
            Err(ExceptionCode::IllegalDataAddress)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn reads_cover_the_block_only() {
        let sim = GatewaySimulator::new(&DeviceConfig::default());
        let regs = sim.registers();
        assert_eq!(register_read(&regs, 30000, 89).unwrap().len(), 89);
        assert_eq!(register_read(&regs, 30007, 2).unwrap(), vec![0xC0A8, 0x0307]);
        assert_eq!(
            register_read(&regs, 30080, 10),
            Err(ExceptionCode::IllegalDataAddress)
        );
        assert_eq!(
            register_read(&regs, 29999, 1),
            Err(ExceptionCode::IllegalDataAddress)
        );
    }

    #[test]
    fn writes_limited_to_network_identity() {
        let sim = GatewaySimulator::new(&DeviceConfig::default());
        {
            let mut regs = sim.registers();
            assert!(register_write(&mut regs, 30013, 0x0808).is_ok());
            assert!(register_write(&mut regs, 30014, 0x0404).is_ok());
            assert_eq!(
                register_write(&mut regs, 30000, 1),
                Err(ExceptionCode::IllegalDataAddress)
            );
            assert_eq!(
                register_write(&mut regs, 30015, 1),
                Err(ExceptionCode::IllegalDataAddress)
            );
        }
        assert_eq!(sim.snapshot().unwrap().dns, Ipv4Addr::new(8, 8, 4, 4));
    }

    #[test]
    fn truncated_block_refuses_full_reads() {
        let words = codec::encode_registers(&DeviceConfig::default());
        let sim = GatewaySimulator::from_registers(&words[..20]);
        let mut regs = sim.registers();
        assert_eq!(
            register_read(&regs, 30000, 89),
            Err(ExceptionCode::IllegalDataAddress)
        );
        assert!(register_write(&mut regs, 30007, 0x0A00).is_ok());
        assert_eq!(regs.get(&30007), Some(&0x0A00));
    }
}
