// src/models/mod.rs

//! Domain models for the lookup service.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod query;
mod record;
mod response;

// Re-export all public types
pub use config::{
    AttributionConfig, Config, ExtractionConfig, LoggingConfig, RateLimitConfig, ServerConfig,
    UpstreamConfig,
};
pub use query::{ClassifiedQuery, QueryKind};
pub use record::Record;
pub use response::{ErrorResult, LookupOutcome, LookupResult, render_json};

/// Raw body returned by the upstream provider for one query.
///
/// Nothing is assumed about its structure until extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamDocument(String);

impl UpstreamDocument {
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
