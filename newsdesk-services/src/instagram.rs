//! Generate stage: Instagram content from classified articles
//!
//! Picks relevant classified articles, generates caption content for each,
//! and stores draft posts through the atomic one-post-per-article gate.

use std::sync::Arc;
use std::time::Duration;

use newsdesk_ai::{GenerationInput, OpenAiClient};
use newsdesk_core::{Article, ArticleStatus, NewsdeskError};
use serde::Serialize;
use tracing::{error, info};

use crate::store::ArticleStore;

/// Minimum relevance score for generation
const MIN_RELEVANCE: u8 = 6;

/// Classified articles considered per cron run
const CRON_LIMIT: usize = 20;

/// Classified articles processed per manual batch call
const MANUAL_LIMIT: usize = 3;

/// Pause between per-article generation calls
const ITEM_DELAY: Duration = Duration::from_millis(1000);

/// Result summary of one generation run
#[derive(Debug, Default, Clone, Serialize)]
pub struct GenerateSummary {
    pub total: usize,
    pub generated: usize,
    pub failed: usize,
    /// Articles that already had a post (normal skips)
    pub skipped: usize,
}

/// Per-article outcome of a manual batch call
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub article_id: i64,
    pub title: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Instagram content generation service
pub struct InstagramService {
    ai: Arc<OpenAiClient>,
    store: Arc<ArticleStore>,
}

impl InstagramService {
    pub fn new(ai: Arc<OpenAiClient>, store: Arc<ArticleStore>) -> Self {
        Self { ai, store }
    }

    /// Run the cron generation stage.
    pub async fn run(&self) -> Result<GenerateSummary, NewsdeskError> {
        let articles = self
            .store
            .classified_for_generation(MIN_RELEVANCE, CRON_LIMIT)
            .map_err(|e| NewsdeskError::storage(e.to_string()))?;

        if articles.is_empty() {
            info!("No articles ready for Instagram content");
            return Ok(GenerateSummary::default());
        }

        let mut summary = GenerateSummary {
            total: articles.len(),
            ..GenerateSummary::default()
        };
        info!("Found {} articles to generate Instagram content", summary.total);

        for (index, article) in articles.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(ITEM_DELAY).await;
            }

            match self.generate_one(article).await {
                Ok(outcome) => match outcome.status {
                    "success" => summary.generated += 1,
                    "skipped" => summary.skipped += 1,
                    _ => summary.failed += 1,
                },
                Err(_) => summary.failed += 1,
            }
        }

        info!(
            "Instagram generation completed: {} success, {} failed, {} skipped",
            summary.generated, summary.failed, summary.skipped
        );
        Ok(summary)
    }

    /// Manual batch endpoint: process a handful of articles and report each.
    pub async fn run_manual(&self) -> Result<Vec<GenerationOutcome>, NewsdeskError> {
        let articles = self
            .store
            .classified_for_generation(MIN_RELEVANCE, MANUAL_LIMIT)
            .map_err(|e| NewsdeskError::storage(e.to_string()))?;

        let mut outcomes = Vec::with_capacity(articles.len());
        for (index, article) in articles.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(ITEM_DELAY).await;
            }
            match self.generate_one(article).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!("Generation batch item failed: {}", e),
            }
        }

        Ok(outcomes)
    }

    /// Generate and store the post for one article.
    async fn generate_one(&self, article: Article) -> Result<GenerationOutcome, NewsdeskError> {
        // Cheap pre-check; the insert below is the real gate
        match self.store.has_post_for(article.id) {
            Ok(true) => {
                info!(
                    "Skipping article {}: Instagram post already exists",
                    article.id
                );
                return Ok(GenerationOutcome {
                    article_id: article.id,
                    title: article.title,
                    status: "skipped",
                    post_id: None,
                    error: None,
                });
            }
            Ok(false) => {}
            Err(e) => return Err(NewsdeskError::storage(e.to_string())),
        }

        info!("Generating Instagram content for: \"{}\"", article.title);

        let input = GenerationInput {
            title: article.title.clone(),
            category: article.category,
            excerpt: article.excerpt.clone(),
            content: article.content.clone(),
        };

        let content = match self.ai.generate_instagram_content(&input).await {
            Ok(content) => content,
            Err(e) => {
                error!(
                    "Failed to generate Instagram content for article {}: {}",
                    article.id, e
                );
                return Ok(GenerationOutcome {
                    article_id: article.id,
                    title: article.title,
                    status: "failed",
                    post_id: None,
                    error: Some(e.to_string()),
                });
            }
        };

        let post_id = self
            .store
            .insert_post(article.id, &content, article.thumbnail_url.as_deref())
            .map_err(|e| NewsdeskError::storage(e.to_string()))?;

        match post_id {
            Some(post_id) => {
                self.store
                    .advance_status(article.id, ArticleStatus::Generated)
                    .map_err(|e| NewsdeskError::storage(e.to_string()))?;

                info!(
                    "Generated Instagram content with {} hashtags",
                    content.hashtags.len()
                );
                Ok(GenerationOutcome {
                    article_id: article.id,
                    title: article.title,
                    status: "success",
                    post_id: Some(post_id),
                    error: None,
                })
            }
            // A concurrent run inserted first; treat like the pre-check skip
            None => Ok(GenerationOutcome {
                article_id: article.id,
                title: article.title,
                status: "skipped",
                post_id: None,
                error: None,
            }),
        }
    }
}
