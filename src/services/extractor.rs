//! Result table extraction.
//!
//! Turns the provider's HTML into records. Extraction is total: anything
//! unexpected in the document yields fewer records, never an error.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{ExtractionConfig, Record, UpstreamDocument};

/// Opening `<tbody>` tag as written in the source, before the parser adds one.
static EXPLICIT_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<tbody[\s/>]").expect("tbody pattern is valid"));

/// Extracts result rows from an upstream document.
#[derive(Debug, Clone)]
pub struct TableExtractor {
    marked_table: Selector,
    any_table: Selector,
    body: Selector,
    row: Selector,
    cell: Selector,
}

impl TableExtractor {
    /// Create an extractor that prefers tables matching `table_selector`.
    pub fn new(table_selector: &str) -> Result<Self> {
        Ok(Self {
            marked_table: Self::parse_selector(table_selector)?,
            any_table: Self::parse_selector("table")?,
            body: Self::parse_selector("tbody")?,
            row: Self::parse_selector("tr")?,
            cell: Self::parse_selector("td")?,
        })
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        Self::new(&config.table_selector)
    }

    /// Extract every body row of the result table, in document order.
    pub fn extract(&self, document: &UpstreamDocument) -> Vec<Record> {
        let html = Html::parse_document(document.as_str());

        let Some(table) = html
            .select(&self.marked_table)
            .next()
            .or_else(|| html.select(&self.any_table).next())
        else {
            log::debug!("No result table in upstream document");
            return Vec::new();
        };

        // html5ever wraps bare rows in a tbody of its own
        if !EXPLICIT_BODY.is_match(document.as_str()) {
            log::debug!("Result table has no body");
            return Vec::new();
        }

        let Some(body) = table.select(&self.body).next() else {
            log::debug!("Result table has no body");
            return Vec::new();
        };

        body.select(&self.row)
            .map(|row| Record::from_cells(self.cells(row)))
            .collect()
    }

    fn cells(&self, row: ElementRef<'_>) -> Vec<String> {
        row.select(&self.cell).map(cell_text).collect()
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default()).expect("default selectors are valid")
    }
}

/// Text of a cell with each text node trimmed and joined without separators.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
