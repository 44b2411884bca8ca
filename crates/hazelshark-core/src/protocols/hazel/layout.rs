/// Conventional UDP port of Hazel game servers.
pub const DEFAULT_PORT: u16 = 22023;

pub const HELLO_LAST_NONCE_LEN: usize = 4;

pub const MESSAGE_LENGTH_LEN: usize = 2;
pub const MESSAGE_TAG_LEN: usize = 1;
pub const MESSAGE_HEADER_LEN: usize = MESSAGE_LENGTH_LEN + MESSAGE_TAG_LEN;

/// Longest packed integer accepted; five groups of seven bits cover 32 bits.
pub const PACKED_MAX_LEN: usize = 5;
pub const PACKED_CONTINUATION: u8 = 0x80;
pub const PACKED_DATA_MASK: u8 = 0x7F;

pub const VERSION_YEAR_DIVISOR: u32 = 25_000;
pub const VERSION_MONTH_DIVISOR: u32 = 1_800;
pub const VERSION_DAY_DIVISOR: u32 = 50;

/// Number of recent packets covered by an acknowledgement mask.
pub const ACK_WINDOW: u8 = 8;
