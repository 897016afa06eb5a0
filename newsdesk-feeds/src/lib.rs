//! Feed ingestion clients for the Newsdesk pipeline
//!
//! This crate provides:
//! - RSS/Atom feed fetching from a curated source registry
//! - Readability-style main-content extraction with thumbnail selection
//! - Scraping rate limits (randomized delays, bounded concurrency,
//!   per-domain spacing)

pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod rate_limit;
pub mod sources;

pub use error::FeedError;
pub use extractor::{ContentExtractor, ExtractedContent};
pub use fetcher::{parse_feed, FeedArticle, FeedFetcher};
pub use rate_limit::{random_delay, run_with_limit, run_with_limit_and_delay, DomainRateLimiter};
pub use sources::{curated_sources, enabled_sources, sources_by_topic, FeedSource, FeedTopic};
