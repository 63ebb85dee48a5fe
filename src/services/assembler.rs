//! Response assembly.

use crate::models::{ClassifiedQuery, LookupResult, Record};

/// Packages extracted records into a lookup result.
#[derive(Debug, Clone)]
pub struct ResponseAssembler {
    attribution: String,
}

impl ResponseAssembler {
    /// `attribution` is copied into every result, success or error.
    pub fn new(attribution: impl Into<String>) -> Self {
        Self {
            attribution: attribution.into(),
        }
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }

    pub fn assemble(&self, classified: &ClassifiedQuery, records: Vec<Record>) -> LookupResult {
        LookupResult {
            query: classified.normalized().to_string(),
            query_type: classified.kind(),
            results_count: records.len(),
            results: records,
            copyright: self.attribution.clone(),
        }
    }
}
