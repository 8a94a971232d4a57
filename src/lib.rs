//! M31 gateway configuration library
//!
//! Reads the network and serial configuration block of an M31 Modbus
//! gateway, decodes it into a typed [`device::DeviceConfig`], and changes
//! the gateway's network identity (address, subnet mask, gateway, DNS)
//! through single-register writes.
//!
//! ```no_run
//! use m31_config::config::ConnectionConfig;
//! use m31_config::device::{read_device_config, ConfigurationUpdater, WritableField};
//! use m31_config::modbus::TcpRegisterSpace;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut space = TcpRegisterSpace::connect(&ConnectionConfig::default()).await?;
//! let config = read_device_config(&mut space).await?;
//! println!("{}", m31_config::presenter::render(&config, &[]));
//!
//! ConfigurationUpdater::new(&mut space)
//!     .set_field(WritableField::Dns, "192.168.3.1")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod modbus;
pub mod presenter;

pub use error::{Error, Result, TransportError};
