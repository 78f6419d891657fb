use crate::error::ProbeError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "vsyutkin.42.fr";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_BYTES: usize = 1024;
pub const DEFAULT_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Protocol {
    Http,
    Https,
    /// Any label without a handshake check; probed for TCP reachability only.
    Other(String),
}

impl Protocol {
    pub fn label(&self) -> &str {
        match self {
            Protocol::Http => "HTTP",
            Protocol::Https => "HTTPS",
            Protocol::Other(label) => label.as_str(),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Protocol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let protocol = if s.eq_ignore_ascii_case("http") {
            Protocol::Http
        } else if s.eq_ignore_ascii_case("https") {
            Protocol::Https
        } else {
            Protocol::Other(s.to_string())
        };
        Ok(protocol)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub host: String,
    pub port: u16,
    pub protocol: Protocol,
}

impl ProbeTarget {
    pub fn new(host: impl Into<String>, port: u16, protocol: Protocol) -> Self {
        Self {
            host: host.into(),
            port,
            protocol,
        }
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}/{}", self.host, self.port, self.protocol)
        } else {
            write!(f, "{}:{}/{}", self.host, self.port, self.protocol)
        }
    }
}

/// The fixed probe list: plain HTTP on 80, then HTTPS on 443.
pub fn default_targets(host: &str) -> Vec<ProbeTarget> {
    vec![
        ProbeTarget::new(host, 80, Protocol::Http),
        ProbeTarget::new(host, 443, Protocol::Https),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeOutcome {
    NotAttempted,
    Success(String),
    Failed(String),
}

impl HandshakeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, HandshakeOutcome::Success(_))
    }
}

#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub target: ProbeTarget,
    pub port_open: bool,
    pub handshake: HandshakeOutcome,
    pub connect_error: Option<ProbeError>,
    pub connect_time: Option<Duration>,
}

impl ProbeResult {
    /// A target whose TCP connection never came up. No handshake is recorded.
    pub fn closed(target: ProbeTarget, error: ProbeError) -> Self {
        Self {
            target,
            port_open: false,
            handshake: HandshakeOutcome::NotAttempted,
            connect_error: Some(error),
            connect_time: None,
        }
    }

    pub fn open(target: ProbeTarget, connect_time: Duration, handshake: HandshakeOutcome) -> Self {
        Self {
            target,
            port_open: true,
            handshake,
            connect_error: None,
            connect_time: Some(connect_time),
        }
    }
}

/// Per-probe knobs shared by every target of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub max_bytes: usize,
    pub preview_chars: usize,
    /// Certificate and hostname verification for HTTPS targets. Reachability
    /// checks turn this off through [`ProbeConfig::insecure`].
    pub verify_tls: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            max_bytes: DEFAULT_MAX_BYTES,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            verify_tls: true,
        }
    }
}

impl ProbeConfig {
    /// Same bound for connect and read.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            connect_timeout: timeout,
            read_timeout: timeout,
            ..Self::default()
        }
    }

    pub fn insecure(mut self) -> Self {
        self.verify_tls = false;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub targets: Vec<ProbeTarget>,
    pub concurrency: usize,
    pub probe: ProbeConfig,
}

impl Config {
    pub fn for_host(host: impl Into<String>, probe: ProbeConfig) -> Self {
        let host = host.into();
        Self {
            targets: default_targets(&host),
            host,
            concurrency: 1,
            probe,
        }
    }
}
