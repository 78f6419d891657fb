//! Failure taxonomy for a single probe.
//!
//! None of these ever escape [`crate::probe::probe`]; they are recorded on the
//! [`crate::model::ProbeResult`] so the rest of the run keeps going.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    /// The hostname produced no usable address.
    #[error("resolution failed")]
    Resolution { detail: String },

    /// TCP connect was refused, unreachable or timed out.
    #[error("{reason}")]
    Connect { reason: String, code: Option<i32> },

    #[error("{protocol} handshake failed: {message}")]
    Handshake { protocol: String, message: String },

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ProbeError {
    pub fn connect(err: &std::io::Error) -> Self {
        ProbeError::Connect {
            reason: err.to_string(),
            code: err.raw_os_error(),
        }
    }

    pub fn connect_timeout(after: std::time::Duration) -> Self {
        ProbeError::Connect {
            reason: format!("connect timeout after {}ms", after.as_millis()),
            code: None,
        }
    }

    pub fn is_resolution(&self) -> bool {
        matches!(self, ProbeError::Resolution { .. })
    }

    /// Short marker used in log lines.
    pub fn stage(&self) -> &'static str {
        match self {
            ProbeError::Resolution { .. } => "resolve",
            ProbeError::Connect { .. } => "connect",
            ProbeError::Handshake { .. } => "handshake",
            ProbeError::Unexpected(_) => "unexpected",
        }
    }

    /// OS error code of a failed connect, if the platform gave one.
    pub fn code(&self) -> Option<i32> {
        match self {
            ProbeError::Connect { code, .. } => *code,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::time::Duration;

    #[test]
    fn resolution_displays_fixed_message() {
        let err = ProbeError::Resolution {
            detail: "no such host".into(),
        };
        assert_eq!(err.to_string(), "resolution failed");
        assert!(err.is_resolution());
    }

    #[test]
    fn connect_keeps_os_code() {
        let io_err = io::Error::from_raw_os_error(111);
        let err = ProbeError::connect(&io_err);
        assert_eq!(err.code(), Some(111));
        assert!(!err.is_resolution());
    }

    #[test]
    fn connect_timeout_mentions_bound() {
        let err = ProbeError::connect_timeout(Duration::from_secs(3));
        assert_eq!(err.to_string(), "connect timeout after 3000ms");
        assert_eq!(err.code(), None);
    }
}
