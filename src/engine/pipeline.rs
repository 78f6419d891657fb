use crate::error::ProbeError;
use crate::model::{HandshakeOutcome, ProbeConfig, ProbeResult, ProbeTarget};
use crate::probe::probe_for_protocol;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

#[async_trait]
pub trait TargetProcessor: Send + Sync {
    async fn process_target(&self, target: ProbeTarget, cfg: Arc<ProbeConfig>) -> ProbeResult;
}

#[derive(Clone, Debug, Default)]
pub struct DefaultProcessor;

#[async_trait]
impl TargetProcessor for DefaultProcessor {
    async fn process_target(&self, target: ProbeTarget, cfg: Arc<ProbeConfig>) -> ProbeResult {
        probe(&target, cfg.as_ref()).await
    }
}

/// Probe a single target: resolve, connect, then run the protocol check.
///
/// Never fails; every error lands in the returned [`ProbeResult`].
#[instrument(skip(target, cfg), fields(target = %target))]
pub async fn probe(target: &ProbeTarget, cfg: &ProbeConfig) -> ProbeResult {
    let addrs = match resolve(target, cfg).await {
        Ok(addrs) => addrs,
        Err(err) => {
            warn!(stage = err.stage(), error = ?err, "resolution failed");
            return ProbeResult::closed(target.clone(), err);
        }
    };

    let tcp_start = Instant::now();
    let stream = match timeout(cfg.connect_timeout, TcpStream::connect(addrs.as_slice())).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(err)) => {
            debug!(error = %err, "connect failed");
            return ProbeResult::closed(target.clone(), ProbeError::connect(&err));
        }
        Err(_) => {
            debug!("connect timeout");
            return ProbeResult::closed(
                target.clone(),
                ProbeError::connect_timeout(cfg.connect_timeout),
            );
        }
    };
    let connect_time = tcp_start.elapsed();
    debug!(ms = connect_time.as_millis() as u64, "port open");

    let Some(prober) = probe_for_protocol(&target.protocol) else {
        debug!(protocol = %target.protocol, "no handshake check for protocol");
        return ProbeResult::open(target.clone(), connect_time, HandshakeOutcome::NotAttempted);
    };

    let handshake = match prober.handshake(stream, cfg, target).await {
        Ok(detail) => HandshakeOutcome::Success(detail),
        Err(err) => {
            warn!(probe = prober.name(), stage = err.stage(), error = %err, "handshake failed");
            HandshakeOutcome::Failed(failure_reason(err))
        }
    };

    ProbeResult::open(target.clone(), connect_time, handshake)
}

async fn resolve(target: &ProbeTarget, cfg: &ProbeConfig) -> Result<Vec<SocketAddr>, ProbeError> {
    let lookup = timeout(
        cfg.connect_timeout,
        lookup_host((target.host.as_str(), target.port)),
    )
    .await;

    let addrs: Vec<SocketAddr> = match lookup {
        Ok(Ok(addrs)) => addrs.collect(),
        Ok(Err(err)) => {
            return Err(ProbeError::Resolution {
                detail: err.to_string(),
            })
        }
        Err(_) => {
            return Err(ProbeError::Resolution {
                detail: format!("lookup timed out after {}ms", cfg.connect_timeout.as_millis()),
            })
        }
    };

    if addrs.is_empty() {
        return Err(ProbeError::Resolution {
            detail: "no addresses returned".into(),
        });
    }
    Ok(addrs)
}

fn failure_reason(err: ProbeError) -> String {
    match err {
        ProbeError::Handshake { message, .. } => message,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Protocol;
    use std::time::Duration;
    use tokio::net::TcpListener;

    fn quick_cfg() -> ProbeConfig {
        ProbeConfig::with_timeout(Duration::from_millis(500)).insecure()
    }

    #[tokio::test]
    async fn unsupported_protocol_only_checks_the_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let _ = listener.accept().await;
        });

        let target = ProbeTarget::new("127.0.0.1", port, Protocol::Other("SSH".into()));
        let result = probe(&target, &quick_cfg()).await;
        assert!(result.port_open);
        assert_eq!(result.handshake, HandshakeOutcome::NotAttempted);
        assert!(result.connect_error.is_none());
        assert!(result.connect_time.is_some());
    }

    #[test]
    fn handshake_reason_drops_the_protocol_prefix() {
        let err = ProbeError::Handshake {
            protocol: "TLS".into(),
            message: "wrong version number".into(),
        };
        assert_eq!(failure_reason(err), "wrong version number");
        assert_eq!(
            failure_reason(ProbeError::Unexpected("boom".into())),
            "unexpected error: boom"
        );
    }
}
