// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Network identity updates
//!
//! A writable field is changed with two single-register writes: the high
//! octets to the base register, then the low octets to the next register.
//! The pair is not atomic on the device; a concurrent reader may see the new
//! high half with the old low half until the second write lands.

use std::net::Ipv4Addr;

use log::info;

use super::ipv4;
use super::model::WritableField;
use crate::error::{Error, Result};
use crate::modbus::RegisterSpace;

/// A requested change, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub field: WritableField,
    pub value: String,
}

impl FieldUpdate {
    pub fn new(field: WritableField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Issues field writes through a [`RegisterSpace`].
///
/// Nothing is read back; re-read the configuration to observe the change.
pub struct ConfigurationUpdater<'a, S: RegisterSpace + ?Sized> {
    space: &'a mut S,
}

impl<'a, S: RegisterSpace + ?Sized> ConfigurationUpdater<'a, S> {
    pub fn new(space: &'a mut S) -> Self {
        Self { space }
    }

    /// Validate `new_address` and write it to `field`.
    ///
    /// Nothing is written when the address is invalid. If the first register
    /// write fails the second is not attempted.
    pub async fn set_field(&mut self, field: WritableField, new_address: &str) -> Result<()> {
        let addr = ipv4::parse(new_address)?;
        self.set_address(field, addr).await
    }

    /// Write an already parsed address to `field`.
    pub async fn set_address(&mut self, field: WritableField, addr: Ipv4Addr) -> Result<()> {
        let (high, low) = ipv4::encode(addr);
        let [first, second] = field.registers();

        info!("Setting {} to {}", field, addr);
        for (register, value) in [(first, high), (second, low)] {
            self.space
                .write_register(register, value)
                .await
                .map_err(|cause| Error::WriteFailed {
                    field,
                    register,
                    cause,
                })?;
        }
        Ok(())
    }

    /// Apply each update in order, continuing past failures.
    pub async fn apply(&mut self, updates: &[FieldUpdate]) -> Vec<(WritableField, Result<()>)> {
        let mut outcomes = Vec::with_capacity(updates.len());
        for update in updates {
            let outcome = self.set_field(update.field, &update.value).await;
            outcomes.push((update.field, outcome));
        }
        outcomes
    }
}
