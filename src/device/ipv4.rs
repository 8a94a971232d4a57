// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! IPv4 addresses stored across two 16-bit registers
//!
//! The first register holds octets 0 and 1, the second octets 2 and 3, each
//! register big-endian: `10.0.0.5` becomes `(0x0A00, 0x0005)`.

use std::net::{IpAddr, Ipv4Addr};

use crate::error::{Error, Result};

/// Parse a textual IPv4 address, rejecting anything else.
///
/// The input is taken as given: surrounding whitespace makes it invalid.
pub fn parse(input: &str) -> Result<Ipv4Addr> {
    match input.parse::<IpAddr>() {
        Ok(IpAddr::V4(addr)) => Ok(addr),
        Ok(IpAddr::V6(_)) => Err(Error::InvalidAddress {
            input: input.to_string(),
            reason: "IP address is not v4",
        }),
        Err(_) => Err(Error::InvalidAddress {
            input: input.to_string(),
            reason: "IP address is not valid",
        }),
    }
}

/// Split an address into its (high, low) register pair.
pub fn encode(addr: Ipv4Addr) -> (u16, u16) {
    let [o0, o1, o2, o3] = addr.octets();
    (u16::from_be_bytes([o0, o1]), u16::from_be_bytes([o2, o3]))
}

/// Validate `input` and split it into its register pair.
pub fn encode_str(input: &str) -> Result<(u16, u16)> {
    parse(input).map(encode)
}

/// Join a register pair back into an address. Any pair is accepted.
pub fn decode(high: u16, low: u16) -> Ipv4Addr {
    let [o0, o1] = high.to_be_bytes();
    let [o2, o3] = low.to_be_bytes();
    Ipv4Addr::new(o0, o1, o2, o3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_high_octets_first() {
        assert_eq!(encode(Ipv4Addr::new(10, 0, 0, 5)), (0x0A00, 0x0005));
        assert_eq!(encode(Ipv4Addr::new(192, 168, 3, 7)), (0xC0A8, 0x0307));
        assert_eq!(encode(Ipv4Addr::BROADCAST), (0xFFFF, 0xFFFF));
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(octets in any::<[u8; 4]>()) {
            let addr = Ipv4Addr::from(octets);
            let (high, low) = encode(addr);
            prop_assert_eq!(decode(high, low), addr);
        }

        #[test]
        fn encode_inverts_decode(high in any::<u16>(), low in any::<u16>()) {
            prop_assert_eq!(encode(decode(high, low)), (high, low));
        }

        #[test]
        fn dotted_quad_survives_the_register_pair(bits in any::<u32>()) {
            let text = Ipv4Addr::from(bits).to_string();
            let (high, low) = encode_str(&text).unwrap();
            prop_assert_eq!(decode(high, low).to_string(), text);
        }
    }

    #[test]
    fn decode_accepts_any_pair() {
        assert_eq!(decode(0x0102, 0x0304), Ipv4Addr::new(1, 2, 3, 4));
        assert_eq!(decode(0, 0), Ipv4Addr::UNSPECIFIED);
    }

    #[test]
    fn rejects_out_of_range_octet() {
        match encode_str("300.1.1.1") {
            Err(Error::InvalidAddress { input, .. }) => assert_eq!(input, "300.1.1.1"),
            other => panic!("expected InvalidAddress, got {other:?}"),
        }
    }

    #[test]
    fn rejects_ipv6_and_garbage() {
        for input in ["::1", "fe80::1", "", "10.0.0", "gateway.local"] {
            assert!(
                matches!(parse(input), Err(Error::InvalidAddress { .. })),
                "{input} should be rejected"
            );
        }
        assert!(matches!(
            parse("::1"),
            Err(Error::InvalidAddress {
                reason: "IP address is not v4",
                ..
            })
        ));
    }

    #[test]
    fn rejects_surrounding_whitespace() {
        for input in [" 10.0.0.5", "10.0.0.5\n", "\t10.0.0.5 "] {
            assert!(
                matches!(
                    parse(input),
                    Err(Error::InvalidAddress {
                        reason: "IP address is not valid",
                        ..
                    })
                ),
                "{input:?} should be rejected"
            );
        }
        assert_eq!(encode_str("10.0.0.5").unwrap(), (0x0A00, 0x0005));
    }
}
