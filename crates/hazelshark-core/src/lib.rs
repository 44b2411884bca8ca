//! hazelshark core library: Hazel game-protocol dissection for captured
//! traffic.
//!
//! The crate has two layers. `protocols::hazel` is the decoder: it turns one
//! UDP datagram into a [`PacketRecord`] (packet type, typed fields, framed
//! messages) and never keeps state between datagrams. The analysis layer is
//! the host around it: packet sources read PCAP/PCAPNG files, UDP datagrams on
//! the configured ports are handed to the decoder, and the results are
//! aggregated into a deterministic JSON report.
//!
//! Invariants:
//! - Decoding never panics on malformed input; truncated datagrams yield a
//!   partial record plus a [`DecodeError`].
//! - Unknown packet types, message tags, languages and chat modes are kept as
//!   `Unknown(raw)` values and never abort decoding.
//! - Report outputs are deterministic and stable across runs.
//!
//! # Examples
//! ```
//! use hazelshark_core::{PacketType, decode_packet};
//!
//! let (record, error) = decode_packet(&[0x0A, 0x00, 0x01, 0xFF]);
//! assert!(error.is_none());
//! assert_eq!(record.packet_type, Some(PacketType::Acknowledgement));
//! ```
//!
//! ```no_run
//! use std::path::Path;
//!
//! use hazelshark_core::{AnalysisConfig, analyze_pcap_file};
//!
//! let report = analyze_pcap_file(Path::new("capture.pcapng"), &AnalysisConfig::default())?;
//! println!("hazel datagrams: {}", report.packet_types.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
pub mod protocols;
mod source;

pub use analysis::{
    AnalysisConfig, AnalysisError, DatagramContext, Direction, analyze_pcap_file, analyze_source,
};
pub use protocols::hazel::codecs::{GameVersion, missing_packets};
pub use protocols::hazel::error::DecodeError;
pub use protocols::hazel::framer::frame_messages;
pub use protocols::hazel::layout::DEFAULT_PORT;
pub use protocols::hazel::reader::{ByteCursor, ByteRange, Spanned};
pub use protocols::hazel::record::{DecodedField, FieldValue, Message, PacketRecord, Text};
pub use protocols::hazel::sink::{FieldSink, RecordingSink, SinkEvent};
pub use protocols::hazel::types::{Language, MessageTag, PacketType, QuickChatMode};
pub use protocols::hazel::{decode_packet, decode_packet_with_sink};
pub use source::{PacketEvent, PacketSource, PcapFileSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Aggregated analysis report with deterministic ordering.
///
/// # Examples
/// ```
/// use hazelshark_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert_eq!(report.report_version, hazelshark_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input capture metadata.
    pub input: InputInfo,

    /// Optional capture summary (may be empty when unavailable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Datagram counts per packet type, ordered by label.
    pub packet_types: Vec<PacketTypeCount>,
    /// Framed message counts per tag, ordered by label.
    pub message_tags: Vec<MessageTagCount>,
    /// Hazel flow summaries in stable order.
    pub flows: Vec<FlowSummary>,
    /// Protocol compliance summaries in stable order.
    pub compliance: Vec<ComplianceSummary>,
    /// Per-datagram decode results in capture order (omitted in summary mode).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packets: Vec<PacketEntry>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "hazelshark").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input capture metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Basic capture summary (timestamps may be absent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    /// Total packet count observed in the capture.
    pub packets_total: u64,
    /// UDP datagrams on the configured Hazel ports.
    pub hazel_datagrams: u64,
    /// RFC3339 timestamp of the first packet (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the last packet (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketTypeCount {
    /// Packet type label (e.g., "Reliable", "Unknown (42)").
    pub packet_type: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTagCount {
    /// Message tag label (e.g., "GameData").
    pub tag: String,
    pub count: u64,
}

/// Flow-level summary for a Hazel endpoint pair.
///
/// # Examples
/// ```
/// use hazelshark_core::FlowSummary;
///
/// let flow = FlowSummary {
///     app_proto: "hazel".to_string(),
///     src: "192.168.0.10:50000".to_string(),
///     dst: "203.0.113.5:22023".to_string(),
///     packets: 2,
///     bytes: 12,
///     pps: None,
///     bps: None,
/// };
/// assert_eq!(flow.app_proto, "hazel");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSummary {
    /// Application protocol name ("hazel").
    pub app_proto: String,
    /// Source endpoint in `ip:port` form.
    pub src: String,
    /// Destination endpoint in `ip:port` form.
    pub dst: String,
    /// Datagrams observed on this flow.
    pub packets: u64,
    /// UDP payload bytes observed on this flow.
    pub bytes: u64,
    /// Packets per second over the capture duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pps: Option<f64>,
    /// Bytes per second over the capture duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bps: Option<f64>,
}

/// Compliance summary for a protocol.
///
/// # Examples
/// ```
/// use hazelshark_core::{ComplianceSummary, Violation};
///
/// let summary = ComplianceSummary {
///     protocol: "hazel".to_string(),
///     compliance_percentage: 50.0,
///     violations: vec![Violation {
///         id: "HZ-OUT-OF-BOUNDS".to_string(),
///         severity: "error".to_string(),
///         message: "Datagram ended before a field was complete".to_string(),
///         count: 1,
///         examples: Vec::new(),
///     }],
/// };
/// assert_eq!(summary.violations.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceSummary {
    /// Protocol name ("hazel").
    pub protocol: String,
    /// Share of datagrams decoded without any violation (0.0 to 100.0).
    pub compliance_percentage: f64,
    /// Violations sorted by severity and ID.
    pub violations: Vec<Violation>,
}

/// Single compliance violation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Stable violation identifier (e.g., `HZ-LENGTH-MISMATCH`).
    pub id: String,
    /// Severity label (`error` or `warning`).
    pub severity: String,
    /// Human-readable message explaining the violation.
    pub message: String,
    /// Number of datagrams affected.
    pub count: u64,
    /// At most three example contexts, formatted as `src -> dst @ ts`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Decode result for one captured datagram, flattened for the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacketEntry {
    /// 1-based index of the frame in the capture.
    pub frame: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    pub src: String,
    pub dst: String,
    pub direction: Direction,
    /// Packet type label, absent for empty datagrams.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet_type: Option<String>,
    /// Classification line (e.g., `Reliable [GameData]`).
    pub summary: String,
    /// Rendered field labels in decode order.
    pub fields: Vec<String>,
    pub messages: Vec<MessageEntry>,
    /// Decode error, when the datagram could not be fully decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub tag: String,
    /// Offset of the message header inside the datagram.
    pub offset: usize,
    /// Payload length as declared by the header.
    pub len: usize,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use hazelshark_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert_eq!(report.report_version, hazelshark_core::REPORT_VERSION);
/// assert!(report.packets.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "hazelshark".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        capture_summary: None,
        packet_types: vec![],
        message_tags: vec![],
        flows: vec![],
        compliance: vec![],
        packets: vec![],
    }
}
