use super::error::UdpError;
use super::layout;

/// Strips the UDP header from an IP payload.
pub struct UdpReader<'a> {
    segment: &'a [u8],
}

impl<'a> UdpReader<'a> {
    pub fn new(segment: &'a [u8]) -> Self {
        Self { segment }
    }

    pub fn datagram(&self) -> Result<&'a [u8], UdpError> {
        self.segment
            .get(layout::UDP_HEADER_LEN..)
            .ok_or(UdpError::TooShort {
                needed: layout::UDP_HEADER_LEN,
                actual: self.segment.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::UdpReader;
    use crate::analysis::udp::error::UdpError;

    #[test]
    fn datagram_skips_header() {
        let segment = [0u8, 1, 2, 3, 4, 5, 6, 7, 0x0A, 0x00, 0x01];
        let datagram = UdpReader::new(&segment).datagram().unwrap();
        assert_eq!(datagram, &[0x0A, 0x00, 0x01]);
    }

    #[test]
    fn header_only_yields_empty_datagram() {
        let segment = [0u8; 8];
        assert!(UdpReader::new(&segment).datagram().unwrap().is_empty());
    }

    #[test]
    fn truncated_header() {
        let segment = [0u8; 7];
        let err = UdpReader::new(&segment).datagram().unwrap_err();
        assert!(matches!(err, UdpError::TooShort { needed: 8, actual: 7 }));
    }
}
