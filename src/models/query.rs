//! Classified lookup queries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two shapes of input the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKind {
    /// Country-code prefixed mobile number (`92...`)
    #[serde(rename = "mobile")]
    MobileNumber,

    /// 13-digit national identity number
    #[serde(rename = "cnic")]
    NationalId,
}

impl QueryKind {
    /// Label used in the `query_type` field of a result.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::MobileNumber => "mobile",
            QueryKind::NationalId => "cnic",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query that passed classification.
///
/// Only the classifier constructs these, so `normalized` always satisfies
/// exactly one shape predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedQuery {
    kind: QueryKind,
    normalized: String,
}

impl ClassifiedQuery {
    pub(crate) fn new(kind: QueryKind, normalized: impl Into<String>) -> Self {
        Self {
            kind,
            normalized: normalized.into(),
        }
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}
