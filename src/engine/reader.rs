use anyhow::anyhow;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::time::timeout;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadStopReason {
    #[default]
    Partial,
    ConnectionClosed,
    SizeLimit,
}

#[derive(Debug, Clone)]
pub struct ReadResult {
    pub bytes: Vec<u8>,
    pub reason: ReadStopReason,
}

/// Pulls a single chunk of a peer's response, bounded in size and time.
pub struct ResponseReader {
    max_bytes: usize,
    read_timeout: Duration,
}

impl ResponseReader {
    pub fn new(max_bytes: usize, read_timeout: Duration) -> Self {
        Self {
            max_bytes: max_bytes.max(1),
            read_timeout,
        }
    }

    pub async fn read<T: AsyncReadExt + Unpin>(&self, stream: &mut T) -> anyhow::Result<ReadResult> {
        let mut buf = vec![0u8; self.max_bytes];
        let n = timeout(self.read_timeout, stream.read(&mut buf))
            .await
            .map_err(|_| anyhow!("read timed out after {}ms", self.read_timeout.as_millis()))??;
        buf.truncate(n);

        let reason = if n == 0 {
            ReadStopReason::ConnectionClosed
        } else if n >= self.max_bytes {
            ReadStopReason::SizeLimit
        } else {
            ReadStopReason::Partial
        };
        Ok(ReadResult { bytes: buf, reason })
    }

    /// Lossy UTF-8 decode cut to `max_chars` characters.
    pub fn preview(result: &ReadResult, max_chars: usize) -> String {
        String::from_utf8_lossy(&result.bytes)
            .chars()
            .take(max_chars)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stops_at_size_limit() {
        let reader = ResponseReader::new(8, Duration::from_secs(1));
        let mut data: &[u8] = b"HTTP/1.1 200 OK\r\n\r\nBody";
        let res = reader.read(&mut data).await.unwrap();
        assert_eq!(res.bytes, b"HTTP/1.1");
        assert_eq!(res.reason, ReadStopReason::SizeLimit);
    }

    #[tokio::test]
    async fn empty_stream_reports_closed() {
        let reader = ResponseReader::new(64, Duration::from_secs(1));
        let mut data: &[u8] = b"";
        let res = reader.read(&mut data).await.unwrap();
        assert!(res.bytes.is_empty());
        assert_eq!(res.reason, ReadStopReason::ConnectionClosed);
    }

    #[tokio::test]
    async fn silent_peer_times_out() {
        let reader = ResponseReader::new(64, Duration::from_millis(50));
        let (mut client, _server) = tokio::io::duplex(64);
        let err = reader.read(&mut client).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn preview_replaces_invalid_utf8_and_truncates() {
        let result = ReadResult {
            bytes: b"ok\xffmore".to_vec(),
            reason: ReadStopReason::Partial,
        };
        assert_eq!(ResponseReader::preview(&result, 3), "ok\u{fffd}");
        assert_eq!(ResponseReader::preview(&result, 100), "ok\u{fffd}more");
    }
}
