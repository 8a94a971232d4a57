// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Error types for the gateway configuration library
//!
//! Two layers are distinguished: [`TransportError`] covers everything that
//! can go wrong while talking to the device, [`Error`] covers local
//! validation, payload decoding and write-phase failures. Out-of-range
//! enumerated codes are data, not errors, and never show up here.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio_modbus::ExceptionCode;

use crate::device::WritableField;

/// Failures reported by a [`RegisterSpace`](crate::modbus::RegisterSpace) implementation.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not resolve {0} to a socket address")]
    Resolve(String),

    #[error("Request to {addr} timed out after {timeout:?}")]
    Timeout { addr: SocketAddr, timeout: Duration },

    #[error(transparent)]
    Modbus(#[from] tokio_modbus::Error),

    #[error("Device rejected the request with exception {0:?}")]
    Exception(ExceptionCode),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised by the configuration codec and updater.
#[derive(Error, Debug)]
pub enum Error {
    #[error("'{input}' is not a usable address: {reason}")]
    InvalidAddress { input: String, reason: &'static str },

    #[error("Configuration payload too short: expected {expected} bytes, got {actual}")]
    ShortPayload { expected: usize, actual: usize },

    #[error("Cannot decode field '{field}' at byte offset {offset}")]
    MalformedPayload { field: &'static str, offset: usize },

    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to write {field} register {register}: {cause}")]
    WriteFailed {
        field: WritableField,
        register: u16,
        #[source]
        cause: TransportError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
