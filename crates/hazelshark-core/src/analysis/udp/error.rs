use thiserror::Error;

/// Reasons a captured frame could not be reduced to a UDP datagram.
#[derive(Debug, Error)]
pub enum UdpError {
    #[error("cannot slice {link} frame: {message}")]
    Slice { link: &'static str, message: String },
    #[error("frame has no IP layer")]
    MissingNetworkLayer,
    #[error("IP packet carries no payload")]
    MissingIpPayload,
    #[error("UDP segment too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
}
