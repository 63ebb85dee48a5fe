//! Service layer for the lookup pipeline.
//!
//! - Input classification (`classify`)
//! - Outbound throttling (`RateLimiter`)
//! - Provider access (`UpstreamClient`)
//! - HTML table parsing (`TableExtractor`)
//! - Result packaging (`ResponseAssembler`)

mod assembler;
mod classifier;
mod extractor;
mod rate_limiter;
mod upstream;

pub use assembler::ResponseAssembler;
pub use classifier::{INVALID_QUERY_HINT, classify, is_cnic, is_mobile};
pub use extractor::TableExtractor;
pub use rate_limiter::RateLimiter;
pub use upstream::{DocumentSource, UpstreamClient};
