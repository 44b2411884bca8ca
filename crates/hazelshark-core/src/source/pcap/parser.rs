use std::fs::File;
use std::path::Path;

use pcap_parser::{
    Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader,
    traits::{PcapNGPacketBlock, PcapReaderIterator},
};

use crate::source::{PacketEvent, PacketSource, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{CaptureFormat, Interface, legacy_ts_to_seconds};

/// Packet source reading a PCAP or PCAPNG file, detected by its magic.
pub struct PcapFileSource {
    inner: PcapReader,
}

enum PcapReader {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Option<Linktype>,
    },
    Ng {
        reader: PcapNGReader<File>,
        interfaces: Vec<Interface>,
    },
}

impl PcapFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        let (format, inner) = create_reader(file)?;
        tracing::debug!(path = %path.display(), format = format.label(), "opened capture");
        Ok(Self { inner })
    }
}

impl PacketSource for PcapFileSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        let event = match &mut self.inner {
            PcapReader::Legacy { reader, linktype } => {
                next_event(reader, CaptureFormat::Pcap, |block| match block {
                    PcapBlockOwned::LegacyHeader(header) => {
                        *linktype = Some(header.network);
                        None
                    }
                    PcapBlockOwned::Legacy(packet) => Some(PacketEvent {
                        ts: Some(legacy_ts_to_seconds(packet.ts_sec, packet.ts_usec)),
                        linktype: linktype.unwrap_or(Linktype::ETHERNET),
                        data: packet.data.to_vec(),
                    }),
                    _ => None,
                })
            }
            PcapReader::Ng { reader, interfaces } => {
                next_event(reader, CaptureFormat::PcapNg, |block| match block {
                    PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                        interfaces.push(Interface::new(
                            intf.linktype,
                            intf.if_tsresol,
                            intf.if_tsoffset,
                        ));
                        None
                    }
                    PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => {
                        let interface = Interface::lookup(interfaces, packet.if_id);
                        Some(PacketEvent {
                            ts: Some(interface.ts_to_seconds(packet.ts_high, packet.ts_low)),
                            linktype: interface.linktype,
                            // Block data is padded to 32 bits; keep the captured bytes only.
                            data: packet.packet_data().to_vec(),
                        })
                    }
                    _ => None,
                })
            }
        };
        event.map_err(SourceError::from)
    }
}

fn create_reader(mut file: File) -> Result<(CaptureFormat, PcapReader), PcapSourceError> {
    let format = CaptureFormat::detect(&mut file)?;
    let reader = match format {
        CaptureFormat::PcapNg => PcapReader::Ng {
            reader: PcapNGReader::new(layout::PCAP_READER_BUFFER_SIZE, file)
                .map_err(|e| pcap_error(format, "reader init", e))?,
            interfaces: Vec::new(),
        },
        CaptureFormat::Pcap => PcapReader::Legacy {
            reader: LegacyPcapReader::new(layout::PCAP_READER_BUFFER_SIZE, file)
                .map_err(|e| pcap_error(format, "reader init", e))?,
            linktype: None,
        },
    };
    Ok((format, reader))
}

/// Pull blocks until `handle` turns one into an event, refilling the buffer
/// as needed. `Ok(None)` at end of file.
fn next_event<R, F>(
    reader: &mut R,
    format: CaptureFormat,
    mut handle: F,
) -> Result<Option<PacketEvent>, PcapSourceError>
where
    R: PcapReaderIterator,
    F: FnMut(PcapBlockOwned<'_>) -> Option<PacketEvent>,
{
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let event = handle(block);
                reader.consume(offset);
                if event.is_some() {
                    return Ok(event);
                }
            }
            Err(PcapError::Eof) => return Ok(None),
            Err(PcapError::Incomplete(_)) => {
                reader
                    .refill()
                    .map_err(|e| pcap_error(format, "refill", e))?;
            }
            Err(e) => return Err(pcap_error(format, "next block", e)),
        }
    }
}

fn pcap_error(
    format: CaptureFormat,
    stage: &'static str,
    err: impl std::fmt::Display,
) -> PcapSourceError {
    PcapSourceError::Pcap {
        format: format.label(),
        stage,
        message: err.to_string(),
    }
}
