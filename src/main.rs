use clap::Parser;
use reach_probe::cli::Cli;
use reach_probe::engine::Engine;
use reach_probe::output::Reporter;
use std::io::BufWriter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let cfg = cli.into_config()?;

    let engine = Engine::new(cfg);
    let mut reporter = Reporter::new(BufWriter::new(std::io::stdout()));
    reporter.header(&engine.config().host)?;

    // Probe outcomes never change the exit status.
    for result in engine.run().await {
        reporter.result(&result)?;
    }
    reporter.footer()?;

    Ok(())
}
