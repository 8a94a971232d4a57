// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! This module provides utility functions for working with configuration
//! settings, including validation and schema management.

use anyhow::{Context, Result};
use log::debug;

use super::Config;

/// Upper bound for the request timeout, in milliseconds.
pub const MAX_TIMEOUT_MS: u64 = 60_000;

/// Output the embedded JSON schema to the console.
///
/// This function is called when the `--show-config-schema` flag is provided
/// on the command line. It outputs the full JSON schema for the configuration
/// to stdout, formatted for readability.
///
/// # Example
///
/// ```bash
/// ./m31_config --show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    let schema: serde_json::Value =
        serde_json::from_str(super::CONFIG_SCHEMA).context("Failed to parse JSON schema")?;

    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;

    println!("{}", formatted_schema);

    Ok(())
}

/// Check if a string can be used as a gateway address
///
/// Accepts IPv4 and IPv6 addresses, and host names made of ASCII letters,
/// digits, `-` and `.` separated labels.
///
/// # Arguments
///
/// * `addr` - The address string to validate
///
/// # Returns
///
/// `true` if the address is usable, `false` otherwise
pub fn is_valid_host(addr: &str) -> bool {
    if addr.parse::<std::net::IpAddr>().is_ok() {
        return true;
    }

    !addr.is_empty()
        && addr.len() <= 253
        && addr.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Validates the configuration against additional rules that aren't covered by the JSON schema.
///
/// # Arguments
///
/// * `config` - The configuration object to validate
///
/// # Returns
///
/// * `Ok(())` if all validations pass
/// * `Err(anyhow::Error)` with descriptive message if any validation fails
///
/// # Validation Rules
///
/// - **Address**: must be an IP address or a host name
/// - **Port Range**: the gateway port must be within 1-65535
/// - **Timeout**: must be within 1-60000 ms
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");
    let connection = &config.connection;

    if !is_valid_host(&connection.address) {
        anyhow::bail!("Invalid gateway address: {}", connection.address);
    }

    if connection.port == 0 {
        anyhow::bail!("Invalid port number: {}", connection.port);
    }

    if connection.timeout_ms == 0 || connection.timeout_ms > MAX_TIMEOUT_MS {
        anyhow::bail!(
            "Invalid timeout: {} ms (expected 1-{} ms)",
            connection.timeout_ms,
            MAX_TIMEOUT_MS
        );
    }

    Ok(())
}
