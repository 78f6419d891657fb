pub mod pipeline;
pub mod reader;

use crate::error::ProbeError;
use crate::model::{Config, ProbeConfig, ProbeResult};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use pipeline::{DefaultProcessor, TargetProcessor};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

pub use pipeline::probe;

/// Runs every configured target once and hands back results in input order.
pub struct Engine {
    cfg: Config,
    probe_cfg: Arc<ProbeConfig>,
    processor: Arc<dyn TargetProcessor>,
}

impl Engine {
    pub fn new(cfg: Config) -> Self {
        Self::with_processor(cfg, Arc::new(DefaultProcessor))
    }

    pub fn with_processor(cfg: Config, processor: Arc<dyn TargetProcessor>) -> Self {
        Self {
            probe_cfg: Arc::new(cfg.probe.clone()),
            cfg,
            processor,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[instrument(skip(self), fields(host = %self.cfg.host, targets = self.cfg.targets.len()))]
    pub async fn run(&self) -> Vec<ProbeResult> {
        if self.cfg.concurrency <= 1 {
            self.run_sequential().await
        } else {
            self.run_pooled().await
        }
    }

    async fn run_sequential(&self) -> Vec<ProbeResult> {
        let mut results = Vec::with_capacity(self.cfg.targets.len());
        for target in &self.cfg.targets {
            let result = self
                .processor
                .process_target(target.clone(), self.probe_cfg.clone())
                .await;
            debug!(target = %target, open = result.port_open, "probed target");
            results.push(result);
        }
        results
    }

    async fn run_pooled(&self) -> Vec<ProbeResult> {
        let sem = Arc::new(Semaphore::new(self.cfg.concurrency));
        let mut tasks = FuturesUnordered::new();

        for (idx, target) in self.cfg.targets.iter().cloned().enumerate() {
            let sem = sem.clone();
            let processor = self.processor.clone();
            let cfg = self.probe_cfg.clone();
            let handle = tokio::spawn({
                let target = target.clone();
                async move {
                    // The semaphore is never closed.
                    let _permit = sem.acquire_owned().await.ok();
                    processor.process_target(target, cfg).await
                }
            });
            tasks.push(async move {
                let result = match handle.await {
                    Ok(result) => result,
                    Err(err) => ProbeResult::closed(
                        target,
                        ProbeError::Unexpected(format!("probe task failed: {err}")),
                    ),
                };
                (idx, result)
            });
        }

        let mut indexed = Vec::with_capacity(self.cfg.targets.len());
        while let Some((idx, result)) = tasks.next().await {
            debug!(target = %result.target, open = result.port_open, "probed target");
            indexed.push((idx, result));
        }
        indexed.sort_by_key(|(idx, _)| *idx);
        indexed.into_iter().map(|(_, result)| result).collect()
    }
}
