use crate::model::{Config, ProbeConfig, DEFAULT_HOST};
use clap::{ArgAction, Parser};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(author, version, about = "HTTP/HTTPS reachability check for a single host", long_about = None)]
pub struct Cli {
    /// Host to probe on ports 80 (HTTP) and 443 (HTTPS)
    #[arg(value_name = "HOST", env = "REACH_PROBE_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Connect timeout in milliseconds
    #[arg(long = "connect-timeout", default_value_t = 3000)]
    pub connect_timeout_ms: u64,

    /// Read and TLS handshake timeout in milliseconds
    #[arg(long = "read-timeout", default_value_t = 3000)]
    pub read_timeout_ms: u64,

    /// Probe targets in parallel with this many workers (1 = one after another)
    #[arg(long = "concurrency", default_value_t = 1)]
    pub concurrency: usize,

    /// Verify the server certificate and hostname on HTTPS
    #[arg(long = "verify-tls", action = ArgAction::SetTrue)]
    pub verify_tls: bool,
}

impl Cli {
    pub fn into_config(self) -> anyhow::Result<Config> {
        let host = self.host.trim();
        if host.is_empty() {
            anyhow::bail!("host must not be empty");
        }

        if self.concurrency == 0 {
            anyhow::bail!("concurrency must be greater than zero");
        }

        if self.connect_timeout_ms == 0 || self.read_timeout_ms == 0 {
            anyhow::bail!("timeouts must be greater than zero");
        }

        let probe = ProbeConfig {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            verify_tls: self.verify_tls,
            ..ProbeConfig::default()
        };

        let mut cfg = Config::for_host(host, probe);
        cfg.concurrency = self.concurrency;
        Ok(cfg)
    }
}
