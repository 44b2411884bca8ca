use std::collections::HashMap;
use std::net::SocketAddr;

use crate::FlowSummary;

#[derive(Debug, Hash, PartialEq, Eq)]
pub(crate) struct FlowKey {
    pub src: SocketAddr,
    pub dst: SocketAddr,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct FlowStats {
    pub packets: u64,
    pub bytes: u64,
}

#[derive(Debug, Default)]
pub(crate) struct FlowTable {
    stats: HashMap<FlowKey, FlowStats>,
}

impl FlowTable {
    pub fn add(&mut self, src: SocketAddr, dst: SocketAddr, payload_len: usize) {
        let entry = self.stats.entry(FlowKey { src, dst }).or_default();
        entry.packets += 1;
        entry.bytes += payload_len as u64;
    }

    /// Summaries sorted by source then destination; rates only when the
    /// capture spans a positive duration.
    pub fn into_summaries(self, duration_s: Option<f64>) -> Vec<FlowSummary> {
        let mut flows: Vec<FlowSummary> = self
            .stats
            .into_iter()
            .map(|(key, stats)| {
                let (pps, bps) = duration_s
                    .map(|d| (stats.packets as f64 / d, stats.bytes as f64 / d))
                    .map(|(pps, bps)| (Some(pps), Some(bps)))
                    .unwrap_or((None, None));

                FlowSummary {
                    app_proto: "hazel".to_string(),
                    src: key.src.to_string(),
                    dst: key.dst.to_string(),
                    packets: stats.packets,
                    bytes: stats.bytes,
                    pps,
                    bps,
                }
            })
            .collect();

        flows.sort_by(|a, b| a.src.cmp(&b.src).then_with(|| a.dst.cmp(&b.dst)));
        flows
    }
}
