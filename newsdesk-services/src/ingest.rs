//! Scrape stage: feed ingestion into the article store
//!
//! Walks the enabled feed sources, normalizes fresh items, optionally
//! extracts full page content for items whose feeds carry too little text,
//! and inserts through the atomic dedup gate.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use newsdesk_core::{NewArticle, NewsdeskError};
use newsdesk_feeds::{
    enabled_sources, run_with_limit, sources_by_topic, ContentExtractor, DomainRateLimiter,
    ExtractedContent, FeedArticle, FeedError, FeedFetcher, FeedSource, FeedTopic,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::store::ArticleStore;

/// Excerpt length when the feed provides no summary
const EXCERPT_CHARS: usize = 300;

/// Tuning knobs for the scrape stage
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Items older than this are skipped
    pub max_age_hours: i64,
    /// Feed content shorter than this triggers full-page extraction
    pub min_content_chars: usize,
    /// Concurrency limit for extraction requests
    pub extract_concurrency: usize,
    /// Pause between feeds
    pub feed_delay: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_age_hours: 24,
            min_content_chars: 200,
            extract_concurrency: 3,
            feed_delay: Duration::from_millis(1000),
        }
    }
}

/// Result summary of one scrape run
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    /// Fresh items seen across all feeds (including duplicates)
    pub total_articles: usize,
    /// Rows actually inserted
    pub new_articles: usize,
    /// Inserted rows whose content came from page extraction
    pub extracted_articles: usize,
    /// Feeds attempted
    pub feeds: usize,
}

/// A previewed (not persisted) article for the manual fetch endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewArticle {
    pub title: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Whether the content came from page extraction
    pub extracted: bool,
}

/// Feed ingestion service
pub struct IngestService {
    fetcher: FeedFetcher,
    extractor: ContentExtractor,
    limiter: DomainRateLimiter,
    store: Arc<ArticleStore>,
    sources: Vec<FeedSource>,
    config: IngestConfig,
}

impl IngestService {
    /// Create an ingest service over the curated source registry
    pub fn new(store: Arc<ArticleStore>) -> Self {
        Self::with_config(store, IngestConfig::default())
    }

    pub fn with_config(store: Arc<ArticleStore>, config: IngestConfig) -> Self {
        Self {
            fetcher: FeedFetcher::new(),
            extractor: ContentExtractor::new(),
            limiter: DomainRateLimiter::default(),
            store,
            sources: enabled_sources(),
            config,
        }
    }

    /// Replace the source registry (custom feed lists, tests)
    pub fn with_sources(mut self, sources: Vec<FeedSource>) -> Self {
        self.sources = sources;
        self
    }

    /// Run the scrape stage over every enabled source.
    ///
    /// Per-feed failures are logged and skipped; the run itself only fails
    /// on unrecoverable storage errors.
    pub async fn run(&self) -> Result<IngestSummary, NewsdeskError> {
        let mut summary = IngestSummary {
            feeds: self.sources.len(),
            ..IngestSummary::default()
        };

        for (index, source) in self.sources.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.config.feed_delay).await;
            }

            let items = match self.fetcher.fetch_feed(source).await {
                Ok(items) => items,
                Err(e) => {
                    warn!("Failed to fetch feed {}: {}", source.name, e);
                    continue;
                }
            };

            let cutoff = Utc::now() - chrono::Duration::hours(self.config.max_age_hours);
            let fresh: Vec<FeedArticle> = items
                .into_iter()
                .filter(|item| item.published_at.map(|d| d >= cutoff).unwrap_or(true))
                .collect();

            summary.total_articles += fresh.len();

            // Skip URLs we already hold before doing any scraping work; the
            // insert below remains the authoritative gate
            let mut candidates = Vec::new();
            for item in fresh {
                match self.store.article_exists(&item.link) {
                    Ok(true) => debug!("Skipping known article: {}", item.link),
                    Ok(false) => candidates.push(item),
                    Err(e) => {
                        warn!("Existence check failed for {}: {}", item.link, e);
                        candidates.push(item);
                    }
                }
            }

            let extracted = self.extract_thin_items(&candidates).await;

            for item in candidates {
                let (content, thumbnail, was_extracted) = match extracted.get(&item.link) {
                    Some(page) => (
                        page.content.clone(),
                        page.thumbnail.clone().or_else(|| item.thumbnail.clone()),
                        true,
                    ),
                    None => (item.body().to_string(), item.thumbnail.clone(), false),
                };

                let excerpt = if content.is_empty() {
                    None
                } else {
                    Some(content.chars().take(EXCERPT_CHARS).collect())
                };

                let new_article = NewArticle {
                    url: item.link.clone(),
                    title: item.title.clone(),
                    content: Some(content).filter(|c| !c.is_empty()),
                    excerpt,
                    thumbnail_url: thumbnail,
                    author: item.author.clone(),
                    source: item.source_host.clone(),
                    published_at: item.published_at,
                };

                match self.store.insert_article(&new_article) {
                    Ok(Some(_)) => {
                        summary.new_articles += 1;
                        if was_extracted {
                            summary.extracted_articles += 1;
                        }
                    }
                    Ok(None) => debug!("Duplicate article skipped: {}", item.link),
                    Err(e) => warn!("Failed to insert article {}: {}", item.link, e),
                }
            }
        }

        info!(
            "Scraping completed: {}/{} new articles from {} feeds",
            summary.new_articles, summary.total_articles, summary.feeds
        );
        Ok(summary)
    }

    /// Extract full page content for items whose feed body is too thin.
    async fn extract_thin_items(
        &self,
        candidates: &[FeedArticle],
    ) -> HashMap<String, ExtractedContent> {
        let thin_urls: Vec<String> = candidates
            .iter()
            .filter(|item| item.body().chars().count() < self.config.min_content_chars)
            .map(|item| item.link.clone())
            .collect();

        if thin_urls.is_empty() {
            return HashMap::new();
        }

        let tasks: Vec<_> = thin_urls
            .into_iter()
            .map(|url| {
                let extractor = &self.extractor;
                let limiter = &self.limiter;
                move || async move {
                    limiter.wait_for_url(&url).await;
                    let page = extractor.extract(&url).await;
                    Ok::<_, FeedError>((url, page))
                }
            })
            .collect();

        let results = run_with_limit(tasks, self.config.extract_concurrency).await;

        results
            .into_iter()
            .flatten()
            .filter_map(|(url, page)| page.map(|p| (url, p)))
            .collect()
    }

    /// Fetch + extract the freshest technology articles without persisting.
    pub async fn preview(&self, limit: usize) -> Vec<PreviewArticle> {
        let sources = sources_by_topic(FeedTopic::Technology);
        let items = self.fetcher.fetch_many(&sources).await;
        let top: Vec<FeedArticle> = items.into_iter().take(limit).collect();

        let tasks: Vec<_> = top
            .iter()
            .map(|item| {
                let url = item.link.clone();
                let extractor = &self.extractor;
                let limiter = &self.limiter;
                move || async move {
                    limiter.wait_for_url(&url).await;
                    let page = extractor.extract(&url).await;
                    Ok::<_, FeedError>((url, page))
                }
            })
            .collect();

        let mut extracted: HashMap<String, ExtractedContent> =
            run_with_limit(tasks, self.config.extract_concurrency)
                .await
                .into_iter()
                .flatten()
                .filter_map(|(url, page)| page.map(|p| (url, p)))
                .collect();

        top.into_iter()
            .map(|item| {
                let page = extracted.remove(&item.link);
                let was_extracted = page.is_some();
                let (content, thumbnail) = match page {
                    Some(page) => (
                        page.content,
                        page.thumbnail.or_else(|| item.thumbnail.clone()),
                    ),
                    None => (item.body().to_string(), item.thumbnail.clone()),
                };

                PreviewArticle {
                    title: item.title,
                    link: item.link,
                    published_at: item.published_at,
                    content,
                    thumbnail,
                    author: item.author,
                    extracted: was_extracted,
                }
            })
            .collect()
    }
}
