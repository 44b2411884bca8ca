pub const UDP_HEADER_LEN: usize = 8;
