use crate::model::{HandshakeOutcome, ProbeResult, Protocol};
use std::fmt::Write as _;
use std::io::Write;

const RULE_WIDTH: usize = 50;

pub fn render_header(host: &str) -> String {
    let frame = "#".repeat(RULE_WIDTH);
    format!("\n{frame}\n# Connection Test for {host}\n{frame}\n")
}

pub fn render_footer() -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("\n{rule}\nTest completed!\n{rule}\n")
}

/// Human-readable block for one probed target.
pub fn render_result(result: &ProbeResult) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let target = &result.target;
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "Testing {} ({})", target.protocol, target.port);
    let _ = writeln!(out, "{rule}");

    if !result.port_open {
        match &result.connect_error {
            Some(err) if err.is_resolution() => {
                let _ = writeln!(out, "❌ Hostname could not be resolved");
            }
            Some(err) => {
                let _ = writeln!(out, "❌ Port {} is CLOSED or FILTERED", target.port);
                let _ = writeln!(out, "   Error: {err}");
                if let Some(code) = err.code() {
                    let _ = writeln!(out, "   Error code: {code}");
                }
            }
            None => {
                let _ = writeln!(out, "❌ Port {} is CLOSED or FILTERED", target.port);
            }
        }
        return out;
    }

    let _ = writeln!(out, "✅ Port {} is OPEN", target.port);
    match (&target.protocol, &result.handshake) {
        (Protocol::Https, HandshakeOutcome::Success(version)) => {
            let _ = writeln!(out, "✅ SSL/TLS connection successful");
            let _ = writeln!(out, "   Protocol: {version}");
        }
        (Protocol::Https, HandshakeOutcome::Failed(reason)) => {
            let _ = writeln!(out, "⚠️  SSL/TLS connection failed: {reason}");
        }
        (Protocol::Http, HandshakeOutcome::Success(preview)) => {
            let _ = writeln!(out, "✅ HTTP connection successful");
            let _ = writeln!(out, "   Response preview: {preview}...");
        }
        (Protocol::Http, HandshakeOutcome::Failed(reason)) => {
            let _ = writeln!(out, "⚠️  HTTP request failed: {reason}");
        }
        (protocol, _) => {
            let _ = writeln!(out, "   No handshake check for {protocol}");
        }
    }
    out
}

/// Writes a full report: header, one block per result, footer.
pub struct Reporter<W: Write> {
    writer: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn header(&mut self, host: &str) -> std::io::Result<()> {
        self.writer.write_all(render_header(host).as_bytes())
    }

    pub fn result(&mut self, result: &ProbeResult) -> std::io::Result<()> {
        self.writer.write_all(render_result(result).as_bytes())?;
        self.writer.flush()
    }

    pub fn footer(&mut self) -> std::io::Result<()> {
        self.writer.write_all(render_footer().as_bytes())?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
