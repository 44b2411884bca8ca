pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];

/// Initial buffer size for the pcap-parser readers; refilled on demand.
pub const PCAP_READER_BUFFER_SIZE: usize = 65536;

/// `if_tsresol` when the option is absent: microseconds.
pub const DEFAULT_TSRESOL: u8 = 6;
pub const TSRESOL_BINARY_FLAG: u8 = 0x80;
pub const TSRESOL_EXPONENT_MASK: u8 = 0x7F;
