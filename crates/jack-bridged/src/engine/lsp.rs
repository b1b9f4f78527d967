//! Parsers for `jack_lsp` and `jack_bufsize` output.
//!
//! `jack_lsp` prints one unindented line per port. Detail lines follow it:
//! connected peers are indented by three spaces, while type and property
//! lines are indented by a tab.

use super::{Connection, Port, PortDirection, PortKind};

#[derive(Debug, Default)]
struct PortRecord<'a> {
    name: &'a str,
    properties: Option<&'a str>,
    type_name: Option<&'a str>,
    peers: Vec<&'a str>,
}

impl PortRecord<'_> {
    fn direction(&self) -> PortDirection {
        match self.properties {
            Some(properties) if properties.contains("output") => PortDirection::Output,
            _ => PortDirection::Input,
        }
    }

    fn kind(&self) -> PortKind {
        match self.type_name {
            Some(type_name) if type_name.contains("midi") => PortKind::Midi,
            _ => PortKind::Audio,
        }
    }
}

fn records(output: &str) -> Vec<PortRecord<'_>> {
    let mut records: Vec<PortRecord<'_>> = Vec::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(peer) = line.strip_prefix("   ") {
            if let Some(current) = records.last_mut() {
                current.peers.push(peer.trim());
            }
        } else if let Some(detail) = line.strip_prefix('\t') {
            let Some(current) = records.last_mut() else {
                continue;
            };
            match detail.trim().strip_prefix("properties:") {
                Some(properties) => current.properties = Some(properties.trim()),
                None => current.type_name = Some(detail.trim()),
            }
        } else {
            records.push(PortRecord {
                name: line.trim_end(),
                ..PortRecord::default()
            });
        }
    }
    records
}

/// Parses `jack_lsp -p -t` output into ports.
pub(super) fn parse_ports(output: &str) -> Vec<Port> {
    records(output)
        .into_iter()
        .map(|record| Port::new(record.name, record.direction(), record.kind()))
        .collect()
}

/// Parses `jack_lsp -c -p` output into edges.
///
/// `jack_lsp` lists every edge under both of its ports; only the output side
/// is kept so each edge appears once.
pub(super) fn parse_connections(output: &str) -> Vec<Connection> {
    records(output)
        .into_iter()
        .filter(|record| record.direction() == PortDirection::Output)
        .flat_map(|record| {
            let from = record.name;
            record
                .peers
                .into_iter()
                .map(move |peer| Connection::new(from, peer))
        })
        .collect()
}

/// Extracts the first unsigned integer following `label`, or anywhere in
/// the output when the label is absent.
pub(super) fn parse_number_after(output: &str, label: &str) -> Option<u32> {
    let tail = output
        .find(label)
        .and_then(|index| output.get(index + label.len()..))
        .unwrap_or(output);
    let digits: String = tail
        .chars()
        .skip_while(|ch| !ch.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
