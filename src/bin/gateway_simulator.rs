// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tokio::net::TcpListener;

use m31_config::device::{ipv4, DeviceConfig};
use m31_config::modbus::{simulator, GatewaySimulator};

/// Simulated M31 gateway answering configuration reads and writes over Modbus TCP
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Address to listen on
    #[clap(long, default_value = "127.0.0.1")]
    address: String,

    /// Port to listen on
    #[clap(long, default_value = "5020")]
    port: u16,

    /// Device address reported in the configuration block
    #[clap(long, default_value = "192.168.3.7")]
    device_address: String,

    /// Device port reported in the configuration block
    #[clap(long, default_value = "502")]
    device_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let args = Args::parse();

    let device_address: Ipv4Addr = ipv4::parse(&args.device_address)?;
    let device = DeviceConfig {
        address: device_address,
        port: args.device_port,
        ..DeviceConfig::default()
    };

    let socket_addr: SocketAddr = format!("{}:{}", args.address, args.port)
        .parse()
        .context("Invalid listen address")?;
    let listener = TcpListener::bind(socket_addr)
        .await
        .with_context(|| format!("Failed to bind {}", socket_addr))?;

    info!(
        "Simulating gateway {} (port {}) on {}",
        device.address, device.port, socket_addr
    );
    simulator::serve(listener, GatewaySimulator::new(&device)).await?;
    Ok(())
}
