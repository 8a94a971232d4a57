// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Conversion between the raw configuration block and [`DeviceConfig`]
//!
//! Every field is read at the offset and width declared in
//! [`layout`](super::layout); nothing depends on in-memory struct layout.
//! Enumerated registers are classified here, once, so callers get either a
//! resolved value or the raw code tagged as unknown.

use std::net::Ipv4Addr;

use log::warn;

use super::layout::{self, FieldKind, FieldSpec, CONFIG_BLOCK_LEN};
use super::model::{
    Classified, DeviceConfig, DomainName, MacAddress, NetworkMode, Parity, ProtocolType,
    BAUD_RATES,
};
use crate::error::{Error, Result};

/// Decode a configuration block read from the device.
///
/// Fails with [`Error::ShortPayload`] when fewer than 178 bytes are given.
/// Out-of-range enumerated codes are not errors.
pub fn decode(raw: &[u8]) -> Result<DeviceConfig> {
    if raw.len() < CONFIG_BLOCK_LEN {
        return Err(Error::ShortPayload {
            expected: CONFIG_BLOCK_LEN,
            actual: raw.len(),
        });
    }

    let config = DeviceConfig {
        baud_rate: classify_baud_rate(word(raw, &layout::SERIAL_PORT_RATE_CODE)?),
        parity: classify(&Parity::TABLE, word(raw, &layout::SERIAL_PORT_PARITY_CHECK)?),
        network_mode: classify(&NetworkMode::TABLE, word(raw, &layout::NETWORK_MODE)?),
        dhcp_enabled: word(raw, &layout::DHCP)? == 1,
        mac_address: MacAddress(array(raw, &layout::MAC_ADDRESS)?),
        address: Ipv4Addr::from(array::<4>(raw, &layout::ADDRESS)?),
        subnet_mask: Ipv4Addr::from(array::<4>(raw, &layout::SUBNET_MASK)?),
        gateway: Ipv4Addr::from(array::<4>(raw, &layout::GATEWAY)?),
        dns: Ipv4Addr::from(array::<4>(raw, &layout::DNS)?),
        reserved: array(raw, &layout::RESERVED)?,
        port: word(raw, &layout::PORT)?,
        destination_domain_name: DomainName(array(raw, &layout::DESTINATION_DOMAIN_NAME)?),
        destination_port: word(raw, &layout::DESTINATION_PORT)?,
        protocol_type: if word(raw, &layout::PROTOCOL_TYPE)? == 1 {
            ProtocolType::Tcp
        } else {
            ProtocolType::Rtu
        },
        address_negotiation_write_register: word(raw, &layout::ADDRESS_NEGOTIATION_WRITE_REGISTER)?,
        address_negotiation_register: word(raw, &layout::ADDRESS_NEGOTIATION_REGISTER)?,
        negotiation_status: word(raw, &layout::NEGOTIATION_STATUS)?,
        exception_code: word(raw, &layout::EXCEPTION_CODE)?,
    };

    if let Classified::Unknown(code) = config.baud_rate {
        warn!("Unknown serial port rate code {}", code);
    }
    if let Classified::Unknown(code) = config.parity {
        warn!("Unknown serial port parity code {}", code);
    }
    if let Classified::Unknown(code) = config.network_mode {
        warn!("Unknown network mode code {}", code);
    }

    Ok(config)
}

/// Decode a block given as register words, as returned by a Modbus read.
pub fn decode_registers(words: &[u16]) -> Result<DeviceConfig> {
    decode(&registers_to_bytes(words))
}

/// Build the raw block for a configuration.
///
/// Unknown codes are written back unchanged, so `decode(&encode(c)) == c`.
/// The trailing spare register is zero.
pub fn encode(config: &DeviceConfig) -> Vec<u8> {
    let mut raw = vec![0u8; CONFIG_BLOCK_LEN];

    let rate_code = match config.baud_rate {
        Classified::Known(rate) => BAUD_RATES
            .iter()
            .position(|&r| r == rate)
            .map_or(0, |index| index as u16 + 1),
        Classified::Unknown(code) => code,
    };
    put_word(&mut raw, &layout::SERIAL_PORT_RATE_CODE, rate_code);
    put_word(
        &mut raw,
        &layout::SERIAL_PORT_PARITY_CHECK,
        table_code(&Parity::TABLE, config.parity),
    );
    put_word(
        &mut raw,
        &layout::NETWORK_MODE,
        table_code(&NetworkMode::TABLE, config.network_mode),
    );
    put_word(&mut raw, &layout::DHCP, u16::from(config.dhcp_enabled));
    put_bytes(&mut raw, &layout::MAC_ADDRESS, &config.mac_address.0);
    put_bytes(&mut raw, &layout::ADDRESS, &config.address.octets());
    put_bytes(&mut raw, &layout::SUBNET_MASK, &config.subnet_mask.octets());
    put_bytes(&mut raw, &layout::GATEWAY, &config.gateway.octets());
    put_bytes(&mut raw, &layout::DNS, &config.dns.octets());
    put_bytes(&mut raw, &layout::RESERVED, &config.reserved);
    put_word(&mut raw, &layout::PORT, config.port);
    put_bytes(
        &mut raw,
        &layout::DESTINATION_DOMAIN_NAME,
        &config.destination_domain_name.0,
    );
    put_word(&mut raw, &layout::DESTINATION_PORT, config.destination_port);
    put_word(
        &mut raw,
        &layout::PROTOCOL_TYPE,
        match config.protocol_type {
            ProtocolType::Tcp => 1,
            ProtocolType::Rtu => 0,
        },
    );
    put_word(
        &mut raw,
        &layout::ADDRESS_NEGOTIATION_WRITE_REGISTER,
        config.address_negotiation_write_register,
    );
    put_word(
        &mut raw,
        &layout::ADDRESS_NEGOTIATION_REGISTER,
        config.address_negotiation_register,
    );
    put_word(&mut raw, &layout::NEGOTIATION_STATUS, config.negotiation_status);
    put_word(&mut raw, &layout::EXCEPTION_CODE, config.exception_code);

    raw
}

/// Register words of [`encode`]'s output.
pub fn encode_registers(config: &DeviceConfig) -> Vec<u16> {
    encode(config)
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect()
}

/// Flatten register words into big-endian bytes.
pub fn registers_to_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

/// Rate codes are 1-based; 0 is never a valid rate.
fn classify_baud_rate(code: u16) -> Classified<u32> {
    match code.checked_sub(1).and_then(|i| BAUD_RATES.get(usize::from(i))) {
        Some(&rate) => Classified::Known(rate),
        None => Classified::Unknown(code),
    }
}

fn classify<T: Copy>(table: &[T], code: u16) -> Classified<T> {
    match table.get(usize::from(code)) {
        Some(&value) => Classified::Known(value),
        None => Classified::Unknown(code),
    }
}

fn table_code<T: PartialEq>(table: &[T], value: Classified<T>) -> u16 {
    match value {
        Classified::Known(value) => table
            .iter()
            .position(|entry| *entry == value)
            .map_or(0, |index| index as u16),
        Classified::Unknown(code) => code,
    }
}

fn malformed(field: &FieldSpec) -> Error {
    Error::MalformedPayload {
        field: field.name,
        offset: field.offset,
    }
}

fn slice<'a>(raw: &'a [u8], field: &FieldSpec) -> Result<&'a [u8]> {
    raw.get(field.offset..field.end())
        .ok_or_else(|| malformed(field))
}

/// Read a [`FieldKind::Word`] field.
fn word(raw: &[u8], field: &FieldSpec) -> Result<u16> {
    if field.kind != FieldKind::Word {
        return Err(malformed(field));
    }
    let [high, low]: [u8; 2] = slice(raw, field)?
        .try_into()
        .map_err(|_| malformed(field))?;
    Ok(u16::from_be_bytes([high, low]))
}

/// Read a [`FieldKind::Bytes`] or [`FieldKind::Ascii`] field of exactly `N` bytes.
fn array<const N: usize>(raw: &[u8], field: &FieldSpec) -> Result<[u8; N]> {
    if field.kind == FieldKind::Word {
        return Err(malformed(field));
    }
    slice(raw, field)?
        .try_into()
        .map_err(|_| malformed(field))
}

fn put_word(raw: &mut [u8], field: &FieldSpec, value: u16) {
    put_bytes(raw, field, &value.to_be_bytes());
}

fn put_bytes(raw: &mut [u8], field: &FieldSpec, bytes: &[u8]) {
    raw[field.offset..field.end()].copy_from_slice(bytes);
}
