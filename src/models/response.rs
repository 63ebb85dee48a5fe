//! Response objects returned by a lookup.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{QueryKind, Record};

/// Successful lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub query: String,
    pub query_type: QueryKind,
    pub results_count: usize,
    pub results: Vec<Record>,
    pub copyright: String,
}

/// Failed lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
    pub detail: String,
    pub copyright: String,
    /// Caller-correctable failure
    #[serde(skip)]
    pub client_error: bool,
}

impl ErrorResult {
    /// A caller-correctable error, such as a missing or malformed query.
    pub fn client(error: impl Into<String>, detail: impl Into<String>, copyright: &str) -> Self {
        Self {
            error: error.into(),
            detail: detail.into(),
            copyright: copyright.to_string(),
            client_error: true,
        }
    }

    /// Tag an application error with its category and detail.
    pub fn from_error(err: &AppError, copyright: &str) -> Self {
        Self {
            error: err.category().to_string(),
            detail: err.detail(),
            copyright: copyright.to_string(),
            client_error: err.is_client_error(),
        }
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LookupOutcome {
    Found(LookupResult),
    Failed(ErrorResult),
}

impl LookupOutcome {
    pub fn failed(err: &AppError, copyright: &str) -> Self {
        Self::Failed(ErrorResult::from_error(err, copyright))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Failed(result) if result.client_error)
    }

    /// Render as JSON, indented when `pretty` is set.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        render_json(self, pretty)
    }
}

/// Serialize any response body the way the service emits it.
pub fn render_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
