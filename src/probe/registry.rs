use crate::error::ProbeError;
use crate::model::{ProbeConfig, ProbeTarget, Protocol};
use async_trait::async_trait;
use tokio::net::TcpStream;

use super::http::HttpProbe;
use super::https::HttpsProbe;

/// A protocol check run over an already established TCP connection.
///
/// The returned string is the detail shown on success (negotiated TLS
/// version, response preview, ...).
#[async_trait]
pub trait Prober: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handshake(
        &self,
        stream: TcpStream,
        cfg: &ProbeConfig,
        target: &ProbeTarget,
    ) -> Result<String, ProbeError>;
}

static HTTP_PROBE: HttpProbe = HttpProbe;
static HTTPS_PROBE: HttpsProbe = HttpsProbe;

pub fn probe_for_protocol(protocol: &Protocol) -> Option<&'static dyn Prober> {
    match protocol {
        Protocol::Http => Some(&HTTP_PROBE as &'static dyn Prober),
        Protocol::Https => Some(&HTTPS_PROBE as &'static dyn Prober),
        Protocol::Other(_) => None,
    }
}
