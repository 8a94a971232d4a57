// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the m31-config project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Terminal rendering of a decoded configuration

use anyhow::{Context, Result};

use crate::device::{Classified, DeviceConfig, FieldUpdate, WritableField};

/// Render the configuration report.
///
/// Fields with a pending update in `pending` are annotated with the new value.
pub fn render(config: &DeviceConfig, pending: &[FieldUpdate]) -> String {
    let address_line = |label: &str, field: WritableField| {
        let annotation = pending
            .iter()
            .rev()
            .find(|update| update.field == field)
            .map(|update| format!(" → {}", update.value))
            .unwrap_or_default();
        format!("{}: {}{}", label, field.current(config), annotation)
    };

    let mut lines = vec![
        format!("MAC : {}", config.mac_address),
        format!(
            "DHCP: {}",
            if config.dhcp_enabled { "enabled" } else { "disabled" }
        ),
        format!("Protocol Type: {}", config.protocol_type.name()),
        match config.network_mode {
            Classified::Known(mode) => format!("Network Mode: {}", mode.name()),
            Classified::Unknown(code) => format!("Network Mode unknown: {}", code),
        },
        address_line("IP  ", WritableField::DeviceAddress),
        format!("Port: {}", config.port),
        address_line("Mask", WritableField::SubnetMask),
        address_line("GW  ", WritableField::Gateway),
        address_line("DNS ", WritableField::Dns),
    ];
    if !config.destination_domain_name.is_empty() {
        lines.push(format!(
            "Destination: {}:{}",
            config.destination_domain_name, config.destination_port
        ));
    }
    lines.push(String::new());
    lines.push(match config.baud_rate {
        Classified::Known(rate) => format!("Baud rate: {}", rate),
        Classified::Unknown(code) => format!("Baud rate code unknown: {}", code),
    });
    lines.push(match config.parity {
        Classified::Known(parity) => format!("Parity check: {}", parity.name()),
        Classified::Unknown(code) => format!("Parity check code unknown: {}", code),
    });

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

/// Serialize the configuration as pretty JSON.
pub fn render_json(config: &DeviceConfig) -> Result<String> {
    serde_json::to_string_pretty(config).context("Failed to serialize device configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DomainName, NetworkMode};

    #[test]
    fn renders_factory_defaults() {
        let report = render(&DeviceConfig::default(), &[]);
        let expected = "\
MAC : 00:1A:2B:00:00:01
DHCP: disabled
Protocol Type: TCP
Network Mode: TCP server
IP  : 192.168.3.7
Port: 502
Mask: 255.255.255.0
GW  : 192.168.3.1
DNS : 192.168.3.1

Baud rate: 9600
Parity check: NONE
";
        assert_eq!(report, expected);
    }

    #[test]
    fn pending_values_are_annotated() {
        let pending = [
            FieldUpdate::new(WritableField::DeviceAddress, "10.0.0.5"),
            FieldUpdate::new(WritableField::Dns, "1.1.1.1"),
        ];
        let report = render(&DeviceConfig::default(), &pending);
        assert!(report.contains("IP  : 192.168.3.7 → 10.0.0.5\n"));
        assert!(report.contains("DNS : 192.168.3.1 → 1.1.1.1\n"));
        assert!(report.contains("Mask: 255.255.255.0\n"));
    }

    #[test]
    fn unknown_codes_still_render_everything() {
        let config = DeviceConfig {
            baud_rate: Classified::Unknown(0),
            parity: Classified::Unknown(7),
            network_mode: Classified::Unknown(4),
            ..DeviceConfig::default()
        };
        let report = render(&config, &[]);
        assert!(report.contains("Network Mode unknown: 4\n"));
        assert!(report.contains("Baud rate code unknown: 0\n"));
        assert!(report.contains("Parity check code unknown: 7\n"));
        assert!(report.contains("GW  : 192.168.3.1\n"));
    }

    #[test]
    fn destination_shown_when_set() {
        let mut name = [0u8; 128];
        name[..9].copy_from_slice(b"scada.lan");
        let config = DeviceConfig {
            network_mode: Classified::Known(NetworkMode::TcpClient),
            destination_domain_name: DomainName(name),
            destination_port: 1502,
            ..DeviceConfig::default()
        };
        assert!(render(&config, &[]).contains("Destination: scada.lan:1502\n"));
    }

    #[test]
    fn json_keeps_raw_unknown_codes() {
        let config = DeviceConfig {
            network_mode: Classified::Unknown(4),
            ..DeviceConfig::default()
        };
        let json: serde_json::Value = serde_json::from_str(&render_json(&config).unwrap()).unwrap();
        assert_eq!(json["network_mode"], serde_json::json!({ "unknown": 4 }));
        assert_eq!(json["address"], "192.168.3.7");
        assert_eq!(json["mac_address"], "00:1A:2B:00:00:01");
        assert_eq!(json["protocol_type"], "TCP");
    }
}
