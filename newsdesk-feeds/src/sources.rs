//! Curated RSS feed source registry

use serde::{Deserialize, Serialize};

/// Topic grouping for feed sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedTopic {
    Technology,
    Ai,
    Crypto,
    Business,
    General,
}

/// A single feed definition
#[derive(Debug, Clone)]
pub struct FeedSource {
    /// Name of the source
    pub name: String,
    /// RSS/Atom feed URL
    pub url: String,
    /// Topic grouping
    pub topic: FeedTopic,
    /// Maximum items to take from this feed per fetch
    pub limit: usize,
    /// Whether this source is currently active
    pub enabled: bool,
}

impl FeedSource {
    pub fn new(name: &str, url: &str, topic: FeedTopic, limit: usize) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            topic,
            limit,
            enabled: true,
        }
    }
}

/// Curated list of news feeds for the pipeline
pub fn curated_sources() -> Vec<FeedSource> {
    vec![
        // Technology - General
        FeedSource::new(
            "TechCrunch",
            "https://techcrunch.com/feed/",
            FeedTopic::Technology,
            15,
        ),
        FeedSource::new(
            "The Verge",
            "https://www.theverge.com/rss/index.xml",
            FeedTopic::Technology,
            15,
        ),
        FeedSource::new(
            "Ars Technica",
            "https://feeds.arstechnica.com/arstechnica/index",
            FeedTopic::Technology,
            10,
        ),
        FeedSource::new(
            "Wired",
            "https://www.wired.com/feed/rss",
            FeedTopic::Technology,
            10,
        ),
        FeedSource::new(
            "Engadget",
            "https://www.engadget.com/rss.xml",
            FeedTopic::Technology,
            10,
        ),
        // Developer & Hacker News
        FeedSource::new(
            "Hacker News",
            "https://hnrss.org/frontpage",
            FeedTopic::Technology,
            20,
        ),
        // AI & Machine Learning
        FeedSource::new(
            "MIT AI News",
            "http://news.mit.edu/topic/mitartificial-intelligence2-rss.xml",
            FeedTopic::Ai,
            10,
        ),
        FeedSource::new(
            "DeepMind Blog",
            "https://deepmind.google/blog/rss.xml",
            FeedTopic::Ai,
            5,
        ),
        // Crypto & Web3
        FeedSource::new(
            "CoinDesk",
            "https://www.coindesk.com/arc/outboundfeeds/rss/",
            FeedTopic::Crypto,
            10,
        ),
        FeedSource::new("Decrypt", "https://decrypt.co/feed", FeedTopic::Crypto, 10),
        // Business & Startups
        FeedSource::new(
            "VentureBeat",
            "https://venturebeat.com/feed/",
            FeedTopic::Business,
            10,
        ),
        FeedSource::new(
            "Business Insider Tech",
            "https://www.businessinsider.com/sai/rss",
            FeedTopic::Business,
            10,
        ),
        // General News
        FeedSource::new(
            "BBC News",
            "https://feeds.bbci.co.uk/news/rss.xml",
            FeedTopic::General,
            10,
        ),
    ]
}

/// Sources currently enabled for ingestion
pub fn enabled_sources() -> Vec<FeedSource> {
    curated_sources().into_iter().filter(|s| s.enabled).collect()
}

/// Enabled sources matching a topic
pub fn sources_by_topic(topic: FeedTopic) -> Vec<FeedSource> {
    curated_sources()
        .into_iter()
        .filter(|s| s.enabled && s.topic == topic)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curated_sources_not_empty() {
        let sources = curated_sources();
        assert!(!sources.is_empty());
        assert!(sources.iter().any(|s| s.name == "TechCrunch"));
    }

    #[test]
    fn test_sources_by_topic_filters() {
        let crypto = sources_by_topic(FeedTopic::Crypto);
        assert!(!crypto.is_empty());
        assert!(crypto.iter().all(|s| s.topic == FeedTopic::Crypto));
    }

    #[test]
    fn test_enabled_sources_respects_flag() {
        let total = curated_sources().len();
        assert_eq!(enabled_sources().len(), total);
    }
}
