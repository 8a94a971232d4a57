// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Gateway configuration block
//!
//! This module knows the layout of the gateway's configuration registers and
//! turns them into a typed [`DeviceConfig`], and turns new network settings
//! into register writes.
//!
//! ## Key Components
//!
//! - `layout`: byte offsets, widths and registers of every field
//! - `model`: `DeviceConfig`, lookup tables, `WritableField`
//! - `codec`: raw block <-> `DeviceConfig`
//! - `ipv4`: IPv4 address <-> register pair
//! - `updater`: `ConfigurationUpdater`, writes through a `RegisterSpace`

pub mod codec;
pub mod ipv4;
pub mod layout;
pub mod model;
pub mod updater;

use log::debug;

pub use model::{
    Classified, DeviceConfig, DomainName, MacAddress, NetworkMode, Parity, ProtocolType,
    WritableField, BAUD_RATES,
};
pub use updater::{ConfigurationUpdater, FieldUpdate};

use crate::error::Result;
use crate::modbus::RegisterSpace;

/// Read and decode the configuration block.
pub async fn read_device_config<S: RegisterSpace + ?Sized>(space: &mut S) -> Result<DeviceConfig> {
    let payload = space
        .read_registers(layout::CONFIG_BASE_REGISTER, layout::CONFIG_REGISTER_COUNT)
        .await?;
    debug!("Reading data: {:?}", payload);

    let config = codec::decode(&payload)?;
    debug!("Config: {:?}", config);
    Ok(config)
}
