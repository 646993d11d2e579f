//! Dedup-and-notify pipeline stages.
//!
//! Raw feed payload → [`normalizer`] → [`recency`] → [`dedup`] → [`formatter`].

pub mod dedup;
pub mod formatter;
pub mod normalizer;
pub mod recency;

pub use dedup::DedupCache;
pub use formatter::build_message;
pub use normalizer::normalize;
pub use recency::filter_recent;
