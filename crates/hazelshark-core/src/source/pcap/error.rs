use thiserror::Error;

#[derive(Debug, Error)]
pub enum PcapSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{format} {stage} failed: {message}")]
    Pcap {
        format: &'static str,
        stage: &'static str,
        message: String,
    },
}
