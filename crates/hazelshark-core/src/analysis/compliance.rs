use std::collections::BTreeMap;

use crate::protocols::hazel::error::DecodeError;
use crate::protocols::hazel::record::{FieldValue, PacketRecord};
use crate::{ComplianceSummary, MessageTagCount, PacketTypeCount, Violation};

const MAX_EXAMPLES: usize = 3;

const SEVERITY_ERROR: &str = "error";
const SEVERITY_WARNING: &str = "warning";

#[derive(Debug)]
struct ViolationStats {
    severity: &'static str,
    message: &'static str,
    count: u64,
    examples: Vec<String>,
}

/// Report-side bookkeeping over decoded datagrams: per-type and per-tag
/// counts plus compliance violations.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    datagrams: u64,
    clean: u64,
    packet_types: BTreeMap<String, u64>,
    message_tags: BTreeMap<String, u64>,
    violations: BTreeMap<&'static str, ViolationStats>,
}

impl Tally {
    pub fn add(&mut self, record: &PacketRecord<'_>, error: Option<&DecodeError>, example: &str) {
        self.datagrams += 1;

        let type_label = record
            .packet_type
            .map(|packet_type| packet_type.to_string())
            .unwrap_or_else(|| "Empty".to_string());
        *self.packet_types.entry(type_label).or_default() += 1;
        for message in &record.messages {
            *self.message_tags.entry(message.tag.to_string()).or_default() += 1;
        }

        let issues = issues_for(record, error);
        if issues.is_empty() {
            self.clean += 1;
        }
        for (id, severity, message) in issues {
            let entry = self.violations.entry(id).or_insert(ViolationStats {
                severity,
                message,
                count: 0,
                examples: Vec::new(),
            });
            entry.count += 1;
            if entry.examples.len() < MAX_EXAMPLES {
                entry.examples.push(example.to_string());
            }
        }
    }

    pub fn datagrams(&self) -> u64 {
        self.datagrams
    }

    pub fn packet_type_counts(&self) -> Vec<PacketTypeCount> {
        self.packet_types
            .iter()
            .map(|(label, count)| PacketTypeCount {
                packet_type: label.clone(),
                count: *count,
            })
            .collect()
    }

    pub fn message_tag_counts(&self) -> Vec<MessageTagCount> {
        self.message_tags
            .iter()
            .map(|(label, count)| MessageTagCount {
                tag: label.clone(),
                count: *count,
            })
            .collect()
    }

    /// One `hazel` entry, or nothing when no datagram was decoded.
    pub fn compliance(&self) -> Vec<ComplianceSummary> {
        if self.datagrams == 0 {
            return Vec::new();
        }
        let mut violations: Vec<Violation> = self
            .violations
            .iter()
            .map(|(id, stats)| Violation {
                id: id.to_string(),
                severity: stats.severity.to_string(),
                message: stats.message.to_string(),
                count: stats.count,
                examples: stats.examples.clone(),
            })
            .collect();
        violations.sort_by(|a, b| {
            severity_rank(&a.severity)
                .cmp(&severity_rank(&b.severity))
                .then_with(|| a.id.cmp(&b.id))
        });

        vec![ComplianceSummary {
            protocol: "hazel".to_string(),
            compliance_percentage: self.clean as f64 / self.datagrams as f64 * 100.0,
            violations,
        }]
    }
}

fn severity_rank(severity: &str) -> u8 {
    if severity == SEVERITY_ERROR { 0 } else { 1 }
}

type Issue = (&'static str, &'static str, &'static str);

fn issues_for(record: &PacketRecord<'_>, error: Option<&DecodeError>) -> Vec<Issue> {
    let mut issues: Vec<Issue> = Vec::new();
    if let Some(err) = error {
        let message = match err {
            DecodeError::OutOfBounds { .. } => "Datagram ended before a field was complete",
            DecodeError::LengthMismatch { .. } => "Message length exceeds the remaining datagram",
            DecodeError::MalformedVarInt { .. } => "Packed integer has no terminator within 5 bytes",
        };
        issues.push((err.violation_id(), SEVERITY_ERROR, message));
    }

    for field in &record.fields {
        let issue = match &field.value {
            FieldValue::PacketType(value) if value.is_unknown() => Some((
                "HZ-UNKNOWN-PACKET-TYPE",
                "Packet type outside the known table",
            )),
            FieldValue::Language(value) if value.is_unknown() => {
                Some(("HZ-UNKNOWN-LANGUAGE", "Language outside the known table"))
            }
            FieldValue::ChatMode(value) if value.is_unknown() => {
                Some(("HZ-UNKNOWN-CHAT-MODE", "Chat mode outside the known table"))
            }
            FieldValue::Name(text) if text.lossy => {
                Some(("HZ-LOSSY-NAME", "Player name is not valid UTF-8"))
            }
            _ => None,
        };
        if let Some((id, message)) = issue {
            issues.push((id, SEVERITY_WARNING, message));
        }
    }

    if record.messages.iter().any(|message| message.tag.is_unknown()) {
        issues.push((
            "HZ-UNKNOWN-MESSAGE-TAG",
            SEVERITY_WARNING,
            "Message tag outside the known table",
        ));
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::Tally;
    use crate::protocols::hazel::decode_packet;

    fn add(tally: &mut Tally, data: &[u8], example: &str) {
        let (record, error) = decode_packet(data);
        tally.add(&record, error.as_ref(), example);
    }

    #[test]
    fn no_datagrams_means_no_compliance_entry() {
        assert!(Tally::default().compliance().is_empty());
    }

    #[test]
    fn clean_datagrams_are_fully_compliant() {
        let mut tally = Tally::default();
        add(&mut tally, &[0x0C, 0x00, 0x01], "a");
        add(&mut tally, &[0x0A, 0x00, 0x01, 0xFF], "b");
        let compliance = tally.compliance();
        assert_eq!(compliance[0].compliance_percentage, 100.0);
        assert!(compliance[0].violations.is_empty());
        assert_eq!(tally.datagrams(), 2);
    }

    #[test]
    fn errors_sort_before_warnings() {
        let mut tally = Tally::default();
        add(&mut tally, &[0x63], "unknown type");
        add(&mut tally, &[0x01, 0x00, 0x01, 0x05, 0x00, 0x05], "short");
        add(&mut tally, &[0x00, 0x00, 0x00, 0x09], "unknown tag");
        add(&mut tally, &[0x0C], "truncated nonce");

        let compliance = tally.compliance();
        let ids: Vec<&str> = compliance[0]
            .violations
            .iter()
            .map(|violation| violation.id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                "HZ-LENGTH-MISMATCH",
                "HZ-OUT-OF-BOUNDS",
                "HZ-UNKNOWN-MESSAGE-TAG",
                "HZ-UNKNOWN-PACKET-TYPE",
            ]
        );
        assert_eq!(compliance[0].compliance_percentage, 0.0);
        assert_eq!(compliance[0].violations[1].examples, vec!["truncated nonce"]);
    }

    #[test]
    fn examples_are_capped() {
        let mut tally = Tally::default();
        for idx in 0..5 {
            add(&mut tally, &[], &format!("empty {idx}"));
        }
        let violation = &tally.compliance()[0].violations[0];
        assert_eq!(violation.count, 5);
        assert_eq!(violation.examples.len(), 3);
        assert_eq!(tally.packet_type_counts()[0].packet_type, "Empty");
    }

    #[test]
    fn counts_are_sorted_by_label() {
        let mut tally = Tally::default();
        add(&mut tally, &[0x01, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x00, 0x01], "a");
        add(&mut tally, &[0x00, 0x00, 0x00, 0x05], "b");
        add(&mut tally, &[0x0C, 0x00, 0x02], "c");

        let types = tally.packet_type_counts();
        let labels: Vec<&str> = types.iter().map(|c| c.packet_type.as_str()).collect();
        assert_eq!(labels, vec!["Ping", "Reliable", "Unreliable"]);

        let tags = tally.message_tag_counts();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].tag, "GameData");
        assert_eq!(tags[0].count, 2);
        assert_eq!(tags[1].tag, "JoinGame");
    }
}
