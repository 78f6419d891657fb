use super::Prober;
use crate::engine::reader::ResponseReader;
use crate::error::ProbeError;
use crate::model::{ProbeConfig, ProbeTarget};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

pub(super) struct HttpProbe;

impl HttpProbe {
    fn request_for(target: &ProbeTarget) -> Vec<u8> {
        let host = &target.host;
        let formatted_host = if host.contains(':') {
            format!("[{}]", host)
        } else {
            host.clone()
        };

        format!("GET / HTTP/1.1\r\nHost: {}\r\n\r\n", formatted_host).into_bytes()
    }

    fn failure(err: impl std::fmt::Display) -> ProbeError {
        ProbeError::Handshake {
            protocol: "HTTP".into(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl Prober for HttpProbe {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn handshake(
        &self,
        mut stream: TcpStream,
        cfg: &ProbeConfig,
        target: &ProbeTarget,
    ) -> Result<String, ProbeError> {
        stream
            .write_all(&Self::request_for(target))
            .await
            .map_err(Self::failure)?;

        let reader = ResponseReader::new(cfg.max_bytes, cfg.read_timeout);
        let response = reader.read(&mut stream).await.map_err(Self::failure)?;
        debug!(target = %target, bytes = response.bytes.len(), reason = ?response.reason, "read http response");

        Ok(ResponseReader::preview(&response, cfg.preview_chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Protocol;

    #[test]
    fn request_carries_host_header() {
        let target = ProbeTarget::new("example.test", 80, Protocol::Http);
        assert_eq!(
            HttpProbe::request_for(&target),
            b"GET / HTTP/1.1\r\nHost: example.test\r\n\r\n".to_vec()
        );
    }

    #[test]
    fn request_brackets_ipv6_hosts() {
        let target = ProbeTarget::new("::1", 80, Protocol::Http);
        let request = String::from_utf8(HttpProbe::request_for(&target)).unwrap();
        assert!(request.contains("Host: [::1]\r\n"));
    }
}
