//! Reachability probe for HTTP and HTTPS endpoints.
//!
//! [`probe`] checks a single [`ProbeTarget`]: TCP connect, then a plain HTTP
//! request or a TLS handshake depending on the protocol. [`Engine`] runs a
//! target list and [`output`] turns the results into a text report.

#[cfg(feature = "cli")]
pub mod cli;
pub mod engine;
pub mod error;
pub mod model;
pub mod output;
pub mod probe;

pub use engine::{probe, Engine};
pub use error::ProbeError;
pub use model::{
    default_targets, Config, HandshakeOutcome, ProbeConfig, ProbeResult, ProbeTarget, Protocol,
};
