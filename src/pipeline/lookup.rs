// src/pipeline/lookup.rs

//! Lookup pipeline: classify → throttle/fetch → extract → assemble.

use std::sync::Arc;

use futures::future::join_all;

use crate::error::Result;
use crate::models::{Config, LookupOutcome, LookupResult};
use crate::services::{
    DocumentSource, RateLimiter, ResponseAssembler, TableExtractor, UpstreamClient, classify,
};

/// One pipeline shared by every request.
///
/// Cloning is cheap and clones share the same document source, and with it
/// the same rate limiter.
#[derive(Clone)]
pub struct LookupPipeline {
    source: Arc<dyn DocumentSource>,
    extractor: TableExtractor,
    assembler: ResponseAssembler,
}

impl LookupPipeline {
    /// Build the pipeline against the configured upstream provider.
    pub fn from_config(config: &Config) -> Result<Self> {
        let limiter = Arc::new(RateLimiter::new(config.rate_limit.min_interval()));
        let client = UpstreamClient::new(&config.upstream, limiter)?;
        log::info!(
            "Upstream {} (min interval {} ms)",
            client.endpoint(),
            config.rate_limit.min_interval_ms
        );

        Ok(Self::new(
            Arc::new(client),
            TableExtractor::from_config(&config.extraction)?,
            ResponseAssembler::new(config.attribution.notice()),
        ))
    }

    pub fn new(
        source: Arc<dyn DocumentSource>,
        extractor: TableExtractor,
        assembler: ResponseAssembler,
    ) -> Self {
        Self {
            source,
            extractor,
            assembler,
        }
    }

    /// Attribution notice attached to every response.
    pub fn attribution(&self) -> &str {
        self.assembler.attribution()
    }

    /// Run the pipeline, stopping at the first failing stage.
    pub async fn run(&self, raw: &str) -> Result<LookupResult> {
        let query = classify(raw)?;
        let document = self.source.fetch(&query).await?;
        let records = self.extractor.extract(&document);
        Ok(self.assembler.assemble(&query, records))
    }

    /// Run the pipeline and tag any failure as an error result.
    pub async fn lookup(&self, raw: &str) -> LookupOutcome {
        match self.run(raw).await {
            Ok(result) => {
                log::info!(
                    "Lookup {} ({}): {} result(s)",
                    result.query,
                    result.query_type,
                    result.results_count
                );
                LookupOutcome::Found(result)
            }
            Err(err) => {
                log::warn!("Lookup {:?} failed: {}", raw.trim(), err);
                LookupOutcome::failed(&err, self.attribution())
            }
        }
    }

    /// Run several lookups concurrently; outcomes keep the input order.
    pub async fn lookup_many<S: AsRef<str>>(&self, raws: &[S]) -> Vec<LookupOutcome> {
        join_all(raws.iter().map(|raw| self.lookup(raw.as_ref()))).await
    }
}
