mod http;
mod https;
mod registry;

pub use registry::{probe_for_protocol, Prober};
