// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the gateway configuration tool
//!
//! This module provides functionality for loading, validating, and applying
//! the settings of the tool itself (how to reach the gateway), as opposed to
//! the gateway's own configuration handled by [`crate::device`]. The settings
//! are backed by an optional YAML file validated against a JSON schema, then
//! overridden by command line flags.
//!
//! ## Configuration Structure
//!
//! - `connection`: address, port, unit id and timeout of the gateway
//!
//! `config.example.yaml` at the repository root is a complete sample file.
//!
//! ## Usage
//!
//! ```no_run
//! use m31_config::config::Config;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("m31.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(
//!     Some("192.168.3.7".to_string()), // Gateway address
//!     Some(502),                       // Gateway port
//!     None,                            // Unit id
//!     None,                            // Timeout
//! );
//!
//! println!("Gateway: {}:{}", config.connection.address, config.connection.port);
//! ```

pub mod connection;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

pub use connection::ConnectionConfig;
pub use utils::{is_valid_host, output_config_schema, validate_specific_rules};

/// JSON schema the YAML configuration is validated against.
pub const CONFIG_SCHEMA: &str = include_str!("../../resources/config.schema.json");

/// Root configuration structure of the tool.
///
/// # Default Values
///
/// Each section uses default values when not explicitly specified in the configuration
/// file, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// How to reach the gateway.
    ///
    /// If not specified in the configuration file, default values are used.
    #[serde(default)]
    pub connection: ConnectionConfig,
}

impl Config {
    /// Helper method to create a sample config file when validation fails
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let sample_path = path.with_extension("sample.yaml");
        debug!("Original path: {:?}, Sample path: {:?}", path, sample_path);

        if let Some(parent) = sample_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// A missing file is created with default values. A file that fails schema
    /// validation, deserialization or the specific rules is left untouched, a
    /// `<name>.sample.yaml` with default values is written next to it and an
    /// error is returned.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        // An empty document deserializes to null; treat it as an empty mapping
        let yaml_value: serde_yml::Value = match serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?
        {
            serde_yml::Value::Null => serde_yml::Value::Mapping(Default::default()),
            value => value,
        };

        let json_value = serde_json::to_value(&yaml_value).with_context(|| {
            format!("Failed to convert YAML to JSON for validation: {:?}", path)
        })?;

        let schema: serde_json::Value =
            serde_json::from_str(CONFIG_SCHEMA).context("Failed to parse JSON schema")?;
        let validator = jsonschema::draft202012::options()
            .should_validate_formats(true)
            .build(&schema)?;

        debug!("Validating {} configuration against schema", path.display());
        if let Err(error) = validator.validate(&json_value) {
            error!("Configuration validation error before deserialization");
            Self::create_sample_config(path)?;
            anyhow::bail!("Configuration validation failed: {}", error);
        }

        debug!("Schema validation passed, deserializing into Config structure");
        let config: Config = match serde_json::from_value(json_value) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration deserialization error: {}", err);
                if let Err(e) = Self::create_sample_config(path) {
                    error!("Failed to create sample config: {}", e);
                }
                return Err(anyhow::anyhow!(
                    "Failed to deserialize configuration from {}: {}",
                    path.display(),
                    err
                ));
            }
        };

        if let Err(err) = utils::validate_specific_rules(&config) {
            error!("Configuration specific validation error: {}", err);
            Self::create_sample_config(path)?;
            return Err(err);
        }

        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Apply command line arguments to override configuration values.
    ///
    /// Only values that are explicitly provided override the existing configuration.
    ///
    /// # Parameters
    ///
    /// * `address` - Current network address of the gateway
    /// * `port` - Modbus TCP port of the gateway
    /// * `slave_id` - Modbus unit identifier
    /// * `timeout_ms` - Connect and request timeout in milliseconds
    pub fn apply_args(
        &mut self,
        address: Option<String>,
        port: Option<u16>,
        slave_id: Option<u8>,
        timeout_ms: Option<u64>,
    ) {
        if let Some(address) = address {
            debug!("Overriding gateway address from command line: {}", address);
            self.connection.address = address;
        }
        if let Some(port) = port {
            debug!("Overriding gateway port from command line: {}", port);
            self.connection.port = port;
        }
        if let Some(slave_id) = slave_id {
            debug!("Overriding unit id from command line: {}", slave_id);
            self.connection.slave_id = slave_id;
        }
        if let Some(timeout_ms) = timeout_ms {
            debug!("Overriding timeout from command line: {} ms", timeout_ms);
            self.connection.timeout_ms = timeout_ms;
        }
    }
}
