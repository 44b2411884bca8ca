//! PCAP/PCAPNG source implementation.
//!
//! Provides a `PacketSource` backed by PCAP or PCAPNG files. File I/O and
//! block parsing stay here; the analysis layer only sees raw frames with
//! their link type and timestamp.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;
