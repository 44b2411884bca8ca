use std::net::{IpAddr, SocketAddr};

use etherparse::{NetSlice, SlicedPacket, TransportSlice};
use pcap_parser::Linktype;

use super::error::UdpError;
use super::reader::UdpReader;

/// UDP datagram lifted out of a captured frame.
pub struct UdpPacket<'a> {
    pub src: SocketAddr,
    pub dst: SocketAddr,
    pub payload: &'a [u8],
}

impl UdpPacket<'_> {
    /// True when either endpoint uses one of `ports`.
    pub fn touches_any_port(&self, ports: &[u16]) -> bool {
        ports.contains(&self.src.port()) || ports.contains(&self.dst.port())
    }
}

/// Extract the UDP datagram from a link-layer frame.
///
/// Returns `Ok(None)` for link types other than Ethernet/raw IP and for
/// non-UDP transports.
pub fn parse_udp_packet(
    linktype: Linktype,
    data: &[u8],
) -> Result<Option<UdpPacket<'_>>, UdpError> {
    let sliced = match linktype {
        Linktype::ETHERNET => SlicedPacket::from_ethernet(data).map_err(|e| UdpError::Slice {
            link: "ethernet",
            message: e.to_string(),
        })?,
        Linktype::RAW => SlicedPacket::from_ip(data).map_err(|e| UdpError::Slice {
            link: "raw IP",
            message: e.to_string(),
        })?,
        _ => return Ok(None),
    };

    let net = sliced.net.ok_or(UdpError::MissingNetworkLayer)?;
    let udp = match sliced.transport {
        Some(TransportSlice::Udp(udp)) => udp,
        _ => return Ok(None),
    };

    let (src_ip, dst_ip) = match net {
        NetSlice::Ipv4(ref ipv4) => (
            IpAddr::V4(ipv4.header().source_addr()),
            IpAddr::V4(ipv4.header().destination_addr()),
        ),
        NetSlice::Ipv6(ref ipv6) => (
            IpAddr::V6(ipv6.header().source_addr()),
            IpAddr::V6(ipv6.header().destination_addr()),
        ),
    };

    let ip_payload = net.ip_payload_ref().ok_or(UdpError::MissingIpPayload)?;
    let payload = UdpReader::new(ip_payload.payload).datagram()?;

    Ok(Some(UdpPacket {
        src: SocketAddr::new(src_ip, udp.source_port()),
        dst: SocketAddr::new(dst_ip, udp.destination_port()),
        payload,
    }))
}
