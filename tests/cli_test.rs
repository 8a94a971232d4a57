// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Tests running the `m31_config` binary against a simulated gateway

use std::net::SocketAddr;
use std::process::Output;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::process::Command;
use tokio::time;

use m31_config::device::{codec, DeviceConfig};
use m31_config::modbus::{simulator, GatewaySimulator};

async fn start_simulator(sim: GatewaySimulator) -> Result<SocketAddr, Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let socket_addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = simulator::serve(listener, sim).await {
            eprintln!("Server error: {}", e);
        }
    });
    time::sleep(Duration::from_millis(50)).await;
    Ok(socket_addr)
}

async fn run_cli(socket_addr: SocketAddr, extra: &[&str]) -> std::io::Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_m31_config"))
        .arg("-a")
        .arg(socket_addr.ip().to_string())
        .arg("-p")
        .arg(socket_addr.port().to_string())
        .args(["--timeout-ms", "2000"])
        .args(extra)
        .output()
        .await
}

#[tokio::test]
async fn test_show_and_update() -> Result<(), Box<dyn std::error::Error>> {
    let sim = GatewaySimulator::new(&DeviceConfig::default());
    let socket_addr = start_simulator(sim.clone()).await?;

    let output = run_cli(socket_addr, &["--ip", "10.0.0.5"]).await?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("IP  : 192.168.3.7 → 10.0.0.5\n"));
    assert!(stdout.contains("IP  : 10.0.0.5\n"));
    assert_eq!(sim.register(30007), Some(0x0A00));
    assert_eq!(sim.register(30008), Some(0x0005));
    Ok(())
}

#[tokio::test]
async fn test_unreadable_block_still_applies_updates() -> Result<(), Box<dyn std::error::Error>>
{
    // Only the first 20 registers exist: the 89-register read is refused
    let words = codec::encode_registers(&DeviceConfig::default());
    let sim = GatewaySimulator::from_registers(&words[..20]);
    let socket_addr = start_simulator(sim.clone()).await?;

    let output = run_cli(socket_addr, &["--ip", "10.0.0.5", "--dns", "8.8.8.8"]).await?;
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Error reading data").count(), 2);
    assert_eq!(sim.register(30007), Some(0x0A00));
    assert_eq!(sim.register(30008), Some(0x0005));
    assert_eq!(sim.register(30013), Some(0x0808));
    assert_eq!(sim.register(30014), Some(0x0808));
    Ok(())
}

#[tokio::test]
async fn test_failed_update_does_not_stop_the_others() -> Result<(), Box<dyn std::error::Error>> {
    let sim = GatewaySimulator::new(&DeviceConfig::default());
    let socket_addr = start_simulator(sim.clone()).await?;

    let output = run_cli(socket_addr, &["--dns", "300.1.1.1", "--gw", "192.168.3.254"]).await?;
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error setting DNS"));
    assert_eq!(sim.register(30013), Some(0xC0A8));
    assert_eq!(sim.register(30014), Some(0x0301));
    assert_eq!(sim.register(30012), Some(0x03FE));
    Ok(())
}
