use super::Prober;
use crate::error::ProbeError;
use crate::model::{ProbeConfig, ProbeTarget};
use async_trait::async_trait;
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};
use std::pin::Pin;
use std::sync::OnceLock;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_openssl::SslStream;
use tracing::debug;

pub(super) struct HttpsProbe;

impl HttpsProbe {
    fn failure(err: impl std::fmt::Display) -> ProbeError {
        ProbeError::Handshake {
            protocol: "TLS".into(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl Prober for HttpsProbe {
    fn name(&self) -> &'static str {
        "https"
    }

    async fn handshake(
        &self,
        stream: TcpStream,
        cfg: &ProbeConfig,
        target: &ProbeTarget,
    ) -> Result<String, ProbeError> {
        let connector = tls_connector(cfg.verify_tls)?;

        let ssl = connector
            .configure()
            .map_err(|err| ProbeError::Unexpected(format!("failed to configure TLS connector: {err}")))?
            .verify_hostname(cfg.verify_tls)
            .into_ssl(&target.host)
            .map_err(|err| ProbeError::Unexpected(format!("failed to configure TLS SNI: {err}")))?;
        let mut tls_stream = SslStream::new(ssl, stream)
            .map_err(|err| ProbeError::Unexpected(format!("failed to initialize TLS stream: {err}")))?;

        match timeout(cfg.read_timeout, Pin::new(&mut tls_stream).connect()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(Self::failure(err)),
            Err(_) => {
                return Err(Self::failure(format!(
                    "handshake timed out after {}ms",
                    cfg.read_timeout.as_millis()
                )))
            }
        }

        let ssl = tls_stream.ssl();
        debug!(
            target = %target,
            cipher = ssl.current_cipher().map(|c| c.name()).unwrap_or("unknown"),
            "tls handshake complete"
        );
        Ok(ssl.version_str().to_string())
    }
}

/// One shared connector per verification mode.
fn tls_connector(verify: bool) -> Result<&'static SslConnector, ProbeError> {
    static VERIFYING: OnceLock<Result<SslConnector, String>> = OnceLock::new();
    static PERMISSIVE: OnceLock<Result<SslConnector, String>> = OnceLock::new();

    let cell = if verify { &VERIFYING } else { &PERMISSIVE };
    cell.get_or_init(|| {
        let mut builder = SslConnector::builder(SslMethod::tls()).map_err(|e| e.to_string())?;
        if !verify {
            // Reachability only: accept any certificate.
            builder.set_verify(SslVerifyMode::NONE);
        }
        Ok(builder.build())
    })
    .as_ref()
    .map_err(|err| ProbeError::Unexpected(format!("failed to create TLS connector: {err}")))
}
