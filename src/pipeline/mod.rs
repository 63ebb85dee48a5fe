//! Pipeline entry points.
//!
//! - `LookupPipeline`: classify, fetch, extract and assemble one query

pub mod lookup;

pub use lookup::LookupPipeline;
