use std::io::{Read, Seek, SeekFrom};

use pcap_parser::Linktype;

use super::error::PcapSourceError;
use super::layout;

/// Container format of a capture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    Pcap,
    PcapNg,
}

impl CaptureFormat {
    /// Sniff the format from the first four bytes, leaving the reader at the
    /// start of the file. Anything that is not PCAPNG is handed to the
    /// legacy reader, which rejects unknown magics itself.
    pub fn detect<R: Read + Seek>(reader: &mut R) -> Result<Self, PcapSourceError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(if magic == layout::PCAPNG_MAGIC {
            Self::PcapNg
        } else {
            Self::Pcap
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pcap => "pcap",
            Self::PcapNg => "pcapng",
        }
    }
}

/// Per-interface state from a PCAPNG Interface Description Block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interface {
    pub linktype: Linktype,
    /// Timestamp ticks per second, from `if_tsresol`.
    pub ticks_per_second: f64,
    /// Seconds added to every timestamp, from `if_tsoffset`.
    pub offset_seconds: i64,
}

impl Interface {
    pub fn new(linktype: Linktype, if_tsresol: u8, if_tsoffset: i64) -> Self {
        Self {
            linktype,
            ticks_per_second: ticks_per_second(if_tsresol),
            offset_seconds: if_tsoffset,
        }
    }

    /// Interface `if_id`, or Ethernet with microsecond stamps when undeclared.
    pub fn lookup(interfaces: &[Interface], if_id: u32) -> Interface {
        usize::try_from(if_id)
            .ok()
            .and_then(|idx| interfaces.get(idx))
            .copied()
            .unwrap_or_else(|| {
                Interface::new(Linktype::ETHERNET, layout::DEFAULT_TSRESOL, 0)
            })
    }

    /// PCAPNG timestamps are a 64-bit tick count split across two words.
    pub fn ts_to_seconds(&self, ts_high: u32, ts_low: u32) -> f64 {
        let ticks = (u64::from(ts_high) << 32) | u64::from(ts_low);
        self.offset_seconds as f64 + ticks as f64 / self.ticks_per_second
    }
}

/// Decode `if_tsresol`: high bit clear means a power of ten, set means a
/// power of two.
pub fn ticks_per_second(if_tsresol: u8) -> f64 {
    let exponent = i32::from(if_tsresol & layout::TSRESOL_EXPONENT_MASK);
    if if_tsresol & layout::TSRESOL_BINARY_FLAG == 0 {
        10f64.powi(exponent)
    } else {
        2f64.powi(exponent)
    }
}

pub fn legacy_ts_to_seconds(ts_sec: u32, ts_usec: u32) -> f64 {
    f64::from(ts_sec) + f64::from(ts_usec) / ticks_per_second(layout::DEFAULT_TSRESOL)
}
