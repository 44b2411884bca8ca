use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::protocols::hazel::error::DecodeError;
use crate::protocols::hazel::layout::MESSAGE_HEADER_LEN;
use crate::protocols::hazel::record::PacketRecord;
use crate::{MessageEntry, PacketEntry};

use super::config::AnalysisConfig;

/// Transport metadata carried next to a decoded datagram.
///
/// The decoder never looks at it; it only labels report entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatagramContext {
    pub frame: u64,
    pub ts: Option<f64>,
    pub src: SocketAddr,
    pub dst: SocketAddr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    ToServer,
    ToClient,
}

impl DatagramContext {
    /// Datagrams addressed to a configured port go to the server.
    pub fn direction(&self, config: &AnalysisConfig) -> Direction {
        if config.is_server_port(self.dst.port()) {
            Direction::ToServer
        } else {
            Direction::ToClient
        }
    }

    /// `src -> dst @ ts` label used in violation examples.
    pub fn describe(&self, ts: Option<&str>) -> String {
        format!("{} -> {} @ {}", self.src, self.dst, ts.unwrap_or("unknown"))
    }
}

pub(crate) fn build_packet_entry(
    context: &DatagramContext,
    ts: Option<String>,
    direction: Direction,
    record: &PacketRecord<'_>,
    error: Option<&DecodeError>,
) -> PacketEntry {
    PacketEntry {
        frame: context.frame,
        ts,
        src: context.src.to_string(),
        dst: context.dst.to_string(),
        direction,
        packet_type: record.packet_type.map(|packet_type| packet_type.to_string()),
        summary: record.summary(),
        fields: record.fields.iter().map(|field| field.to_string()).collect(),
        messages: record
            .messages
            .iter()
            .map(|message| MessageEntry {
                tag: message.tag.to_string(),
                offset: message.range.start,
                len: message.range.len - MESSAGE_HEADER_LEN,
            })
            .collect(),
        error: error.map(|err| err.to_string()),
    }
}
