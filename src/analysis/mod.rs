//! Pure analysis stages over the canonical patient table.

pub mod analyzer;
pub mod filter;

pub use analyzer::analyze;
pub use filter::filter_by_age;
