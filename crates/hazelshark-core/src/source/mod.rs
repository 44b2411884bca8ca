mod pcap;

pub use pcap::PcapFileSource;

use pcap_parser::Linktype;
use thiserror::Error;

/// One captured frame as read from a source.
#[derive(Debug, Clone)]
pub struct PacketEvent {
    /// Capture time in seconds since the Unix epoch, when recorded.
    pub ts: Option<f64>,
    pub linktype: Linktype,
    pub data: Vec<u8>,
}

/// Yields captured frames in capture order; `Ok(None)` when exhausted.
pub trait PacketSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PCAP parse error: {0}")]
    Pcap(String),
}

impl From<pcap::error::PcapSourceError> for SourceError {
    fn from(value: pcap::error::PcapSourceError) -> Self {
        match value {
            pcap::error::PcapSourceError::Io(err) => SourceError::Io(err),
            pcap::error::PcapSourceError::Pcap {
                format,
                stage,
                message,
            } => SourceError::Pcap(format!("{format} {stage}: {message}")),
        }
    }
}
