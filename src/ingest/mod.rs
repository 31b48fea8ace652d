//! Record ingestion: fetching raw records and normalizing them.
//!
//! The fetcher owns the HTTP boundary; the normalizer owns every
//! field-level cleaning rule.

pub mod fetcher;
pub mod normalizer;

pub use fetcher::RecordFetcher;
pub use normalizer::normalize;
