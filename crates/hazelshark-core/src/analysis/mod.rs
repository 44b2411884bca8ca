use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::protocols::hazel::decode_packet;
use crate::source::{PacketEvent, PacketSource, PcapFileSource, SourceError};
use crate::{CaptureSummary, DEFAULT_GENERATED_AT, Report, make_stub_report};

mod compliance;
mod config;
mod flows;
mod packets;
pub mod udp;

pub use config::AnalysisConfig;
pub use packets::{DatagramContext, Direction};

use compliance::Tally;
use flows::FlowTable;
use packets::build_packet_entry;
use udp::parse_udp_packet;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

pub fn analyze_pcap_file(path: &Path, config: &AnalysisConfig) -> Result<Report, AnalysisError> {
    let source = PcapFileSource::open(path)?;
    analyze_source(path, source, config)
}

/// Decode every Hazel datagram the source yields and aggregate the report.
///
/// Frames that are not UDP, or UDP on other ports, only count towards
/// `packets_total`.
pub fn analyze_source<S: PacketSource>(
    path: &Path,
    mut source: S,
    config: &AnalysisConfig,
) -> Result<Report, AnalysisError> {
    let mut packets_total = 0u64;
    let mut first_ts = None;
    let mut last_ts = None;
    let mut flows = FlowTable::default();
    let mut tally = Tally::default();
    let mut entries = Vec::new();

    while let Some(PacketEvent { ts, linktype, data }) = source.next_packet()? {
        packets_total += 1;
        update_ts_bounds(&mut first_ts, &mut last_ts, ts);

        let udp = match parse_udp_packet(linktype, &data) {
            Ok(Some(udp)) => udp,
            Ok(None) => continue,
            Err(err) => {
                tracing::debug!(frame = packets_total, error = %err, "skipping undecodable frame");
                continue;
            }
        };
        if !udp.touches_any_port(&config.ports) {
            continue;
        }

        let context = DatagramContext {
            frame: packets_total,
            ts,
            src: udp.src,
            dst: udp.dst,
        };
        let (record, error) = decode_packet(udp.payload);
        let ts_label = ts_to_rfc3339(ts);

        flows.add(udp.src, udp.dst, udp.payload.len());
        tally.add(
            &record,
            error.as_ref(),
            &context.describe(ts_label.as_deref()),
        );
        if config.include_packets {
            entries.push(build_packet_entry(
                &context,
                ts_label,
                context.direction(config),
                &record,
                error.as_ref(),
            ));
        }
    }

    tracing::debug!(
        packets_total,
        hazel_datagrams = tally.datagrams(),
        "capture analysis finished"
    );

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.capture_summary = Some(CaptureSummary {
        packets_total,
        hazel_datagrams: tally.datagrams(),
        time_start: ts_to_rfc3339(first_ts),
        time_end: ts_to_rfc3339(last_ts),
    });
    report.generated_at = report
        .capture_summary
        .as_ref()
        .and_then(|summary| summary.time_end.clone().or(summary.time_start.clone()))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());

    let duration_s = match (first_ts, last_ts) {
        (Some(start), Some(end)) if end > start => Some(end - start),
        _ => None,
    };

    report.packet_types = tally.packet_type_counts();
    report.message_tags = tally.message_tag_counts();
    report.compliance = tally.compliance();
    report.flows = flows.into_summaries(duration_s);
    report.packets = entries;
    Ok(report)
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let Some(ts) = ts else {
        return;
    };
    if first.is_none_or(|existing| ts < existing) {
        *first = Some(ts);
    }
    if last.is_none_or(|existing| ts > existing) {
        *last = Some(ts);
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
