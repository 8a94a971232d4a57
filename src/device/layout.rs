// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Static layout of the gateway configuration block
//!
//! The device exposes its configuration as 89 contiguous holding registers
//! starting at register 30000. Read as bytes (two per register, big-endian)
//! the block is 178 bytes long and holds the fields below, in this order and
//! without padding.
//!
//! | Byte offset | Register | Field | Width |
//! |------------:|---------:|-------|------:|
//! | 0   | 30000 | serial port rate code | 2 |
//! | 2   | 30001 | serial port parity check | 2 |
//! | 4   | 30002 | network mode | 2 |
//! | 6   | 30003 | DHCP flag | 2 |
//! | 8   | 30004 | MAC address | 6 |
//! | 14  | 30007 | device address | 4 |
//! | 18  | 30009 | subnet mask | 4 |
//! | 22  | 30011 | gateway | 4 |
//! | 26  | 30013 | DNS | 4 |
//! | 30  | 30015 | reserved | 4 |
//! | 34  | 30017 | port | 2 |
//! | 36  | 30018 | destination domain name | 128 |
//! | 164 | 30082 | destination port | 2 |
//! | 166 | 30083 | protocol type | 2 |
//! | 168 | 30084 | address negotiation write register | 2 |
//! | 170 | 30085 | address negotiation register | 2 |
//! | 172 | 30086 | negotiation status | 2 |
//! | 174 | 30087 | exception code | 2 |
//!
//! The table ends at byte 176; the 89th register (30088) is read along with
//! the rest of the block but carries no field.

/// First register of the configuration block.
pub const CONFIG_BASE_REGISTER: u16 = 30000;

/// Number of registers read for one configuration snapshot.
pub const CONFIG_REGISTER_COUNT: u16 = 89;

/// Size in bytes of one configuration snapshot.
pub const CONFIG_BLOCK_LEN: usize = CONFIG_REGISTER_COUNT as usize * 2;

/// How the bytes of a field are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// One big-endian 16-bit register.
    Word,
    /// Raw octets, kept in wire order.
    Bytes,
    /// Zero-padded ASCII text.
    Ascii,
}

/// Position and type of one field inside the configuration block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Byte offset from the start of the block.
    pub offset: usize,
    /// Width in bytes.
    pub len: usize,
    /// Selects the codec reader; a mismatch is a malformed payload.
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn word(name: &'static str, offset: usize) -> Self {
        Self {
            name,
            offset,
            len: 2,
            kind: FieldKind::Word,
        }
    }

    const fn bytes(name: &'static str, offset: usize, len: usize) -> Self {
        Self {
            name,
            offset,
            len,
            kind: FieldKind::Bytes,
        }
    }

    /// Byte offset one past the end of the field.
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Device register holding the first byte of the field.
    pub const fn register(&self) -> u16 {
        CONFIG_BASE_REGISTER + (self.offset / 2) as u16
    }
}

pub const SERIAL_PORT_RATE_CODE: FieldSpec = FieldSpec::word("serial_port_rate_code", 0);
pub const SERIAL_PORT_PARITY_CHECK: FieldSpec = FieldSpec::word("serial_port_parity_check", 2);
pub const NETWORK_MODE: FieldSpec = FieldSpec::word("network_mode", 4);
pub const DHCP: FieldSpec = FieldSpec::word("dhcp", 6);
pub const MAC_ADDRESS: FieldSpec = FieldSpec::bytes("mac_address", 8, 6);
pub const ADDRESS: FieldSpec = FieldSpec::bytes("address", 14, 4);
pub const SUBNET_MASK: FieldSpec = FieldSpec::bytes("subnet_mask", 18, 4);
pub const GATEWAY: FieldSpec = FieldSpec::bytes("gateway", 22, 4);
pub const DNS: FieldSpec = FieldSpec::bytes("dns", 26, 4);
pub const RESERVED: FieldSpec = FieldSpec::bytes("reserved", 30, 4);
pub const PORT: FieldSpec = FieldSpec::word("port", 34);
pub const DESTINATION_DOMAIN_NAME: FieldSpec = FieldSpec {
    name: "destination_domain_name",
    offset: 36,
    len: 128,
    kind: FieldKind::Ascii,
};
pub const DESTINATION_PORT: FieldSpec = FieldSpec::word("destination_port", 164);
pub const PROTOCOL_TYPE: FieldSpec = FieldSpec::word("protocol_type", 166);
pub const ADDRESS_NEGOTIATION_WRITE_REGISTER: FieldSpec =
    FieldSpec::word("address_negotiation_write_register", 168);
pub const ADDRESS_NEGOTIATION_REGISTER: FieldSpec =
    FieldSpec::word("address_negotiation_register", 170);
pub const NEGOTIATION_STATUS: FieldSpec = FieldSpec::word("negotiation_status", 172);
pub const EXCEPTION_CODE: FieldSpec = FieldSpec::word("exception_code", 174);

/// Every field of the block, in wire order.
pub const FIELDS: [FieldSpec; 18] = [
    SERIAL_PORT_RATE_CODE,
    SERIAL_PORT_PARITY_CHECK,
    NETWORK_MODE,
    DHCP,
    MAC_ADDRESS,
    ADDRESS,
    SUBNET_MASK,
    GATEWAY,
    DNS,
    RESERVED,
    PORT,
    DESTINATION_DOMAIN_NAME,
    DESTINATION_PORT,
    PROTOCOL_TYPE,
    ADDRESS_NEGOTIATION_WRITE_REGISTER,
    ADDRESS_NEGOTIATION_REGISTER,
    NEGOTIATION_STATUS,
    EXCEPTION_CODE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_contiguous_and_register_aligned() {
        let mut cursor = 0;
        for field in FIELDS.iter() {
            assert_eq!(field.offset, cursor, "gap or overlap before {}", field.name);
            assert_eq!(field.offset % 2, 0, "{} is not register aligned", field.name);
            if field.kind == FieldKind::Word {
                assert_eq!(field.len, 2);
            }
            cursor = field.end();
        }
        assert!(cursor <= CONFIG_BLOCK_LEN);
        assert_eq!(CONFIG_BLOCK_LEN - cursor, 2);
    }

    #[test]
    fn block_is_89_registers() {
        assert_eq!(CONFIG_BLOCK_LEN, 178);
        assert_eq!(CONFIG_REGISTER_COUNT, 89);
    }

    #[test]
    fn network_identity_registers() {
        assert_eq!(ADDRESS.register(), 30007);
        assert_eq!(SUBNET_MASK.register(), 30009);
        assert_eq!(GATEWAY.register(), 30011);
        assert_eq!(DNS.register(), 30013);
        assert_eq!(PORT.register(), 30017);
    }
}
