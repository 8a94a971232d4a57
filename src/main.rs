// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the M31 gateway configuration tool
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use m31_config::config::{output_config_schema, validate_specific_rules, Config};
use m31_config::device::{read_device_config, ConfigurationUpdater, FieldUpdate, WritableField};
use m31_config::modbus::TcpRegisterSpace;
use m31_config::presenter;

/// Show and change the network configuration of an M31 Modbus gateway
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Current network address of the device
    #[arg(short = 'a', long)]
    address: Option<String>,

    /// Current network port of the device
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Device slave identifier
    #[arg(short = 's', long)]
    slave_id: Option<u8>,

    /// Connect and request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Show debug info
    #[arg(short = 'd', long)]
    debug: bool,

    /// Settings file (YAML), created with default values if missing
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Set new DNS address
    #[arg(long)]
    dns: Option<String>,

    /// Set new device network address
    #[arg(long)]
    ip: Option<String>,

    /// Set default gateway address
    #[arg(long)]
    gw: Option<String>,

    /// Set subnet mask
    #[arg(short = 'm', long)]
    mask: Option<String>,

    /// Print the configuration as JSON
    #[arg(long)]
    json: bool,

    /// Print the JSON schema of the settings file and exit
    #[arg(long)]
    show_config_schema: bool,
}

impl Args {
    /// Requested updates, in the order they are applied.
    fn updates(&self) -> Vec<FieldUpdate> {
        [
            (WritableField::Dns, &self.dns),
            (WritableField::Gateway, &self.gw),
            (WritableField::DeviceAddress, &self.ip),
            (WritableField::SubnetMask, &self.mask),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .as_ref()
                .map(|value| FieldUpdate::new(field, value.clone()))
        })
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::init_from_env(env_logger::Env::default().filter_or(
        env_logger::DEFAULT_FILTER_ENV,
        if args.debug { "debug" } else { "info" },
    ));

    if args.show_config_schema {
        return output_config_schema();
    }

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.apply_args(
        args.address.clone(),
        args.port,
        args.slave_id,
        args.timeout_ms,
    );
    validate_specific_rules(&config)?;

    let updates = args.updates();
    let mut space = TcpRegisterSpace::connect(&config.connection)
        .await
        .context("Error creating modbus tcp connection")?;

    debug!("Connected to {}", space.peer());

    if let Err(err) = show_configuration(&mut space, &updates, args.json).await {
        eprintln!("Error reading data: {:#}", err);
    }

    if !updates.is_empty() {
        let outcomes = ConfigurationUpdater::new(&mut space).apply(&updates).await;
        for (field, outcome) in outcomes {
            match outcome {
                Ok(()) => info!("{} updated", field),
                Err(err) => eprintln!("Error setting {}: {}", field, err),
            }
        }

        if let Err(err) = show_configuration(&mut space, &[], args.json).await {
            eprintln!("Error reading data: {:#}", err);
        }
    }

    if let Err(err) = space.disconnect().await {
        debug!("Disconnect failed: {}", err);
    }
    Ok(())
}

/// Read the configuration block and print it.
async fn show_configuration(
    space: &mut TcpRegisterSpace,
    pending: &[FieldUpdate],
    json: bool,
) -> Result<()> {
    let config = read_device_config(space).await?;
    if json {
        println!("{}", presenter::render_json(&config)?);
    } else {
        println!("{}", presenter::render(&config, pending));
    }
    Ok(())
}
