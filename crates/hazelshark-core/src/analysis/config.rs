use crate::protocols::hazel::layout::DEFAULT_PORT;

/// Host-side settings for capture analysis.
///
/// Replaces port registration at load time: the caller decides which UDP
/// ports carry Hazel traffic.
///
/// # Examples
/// ```
/// use hazelshark_core::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.ports, vec![22023]);
/// assert!(config.include_packets);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// UDP ports whose traffic is decoded (either endpoint).
    pub ports: Vec<u16>,
    /// Keep one report entry per decoded datagram.
    pub include_packets: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ports: vec![DEFAULT_PORT],
            include_packets: true,
        }
    }
}

impl AnalysisConfig {
    pub fn with_ports(mut self, ports: Vec<u16>) -> Self {
        if !ports.is_empty() {
            self.ports = ports;
        }
        self
    }

    pub fn is_server_port(&self, port: u16) -> bool {
        self.ports.contains(&port)
    }
}
