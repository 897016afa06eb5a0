//! Classify stage: pending articles through the LLM
//!
//! Loads pending articles and classifies them in fixed-size concurrent
//! groups. Per-item failures are counted, never propagated to siblings.

use std::sync::Arc;
use std::time::Duration;

use newsdesk_ai::OpenAiClient;
use newsdesk_core::{Article, ArticleStatus, EnhancedClassification, NewsdeskError};
use serde::Serialize;
use tracing::{error, info};

use crate::batch::process_in_batches;
use crate::store::ArticleStore;

/// Pending articles processed per run
const PENDING_LIMIT: usize = 50;

/// Concurrent classifications per group
const BATCH_SIZE: usize = 5;

/// Fixed pause between groups
const BATCH_DELAY: Duration = Duration::from_millis(1000);

/// Result summary of one classify run
#[derive(Debug, Default, Clone, Serialize)]
pub struct ClassifySummary {
    pub total: usize,
    pub classified: usize,
    pub failed: usize,
}

/// Batch classification service
pub struct ClassifyService {
    ai: Arc<OpenAiClient>,
    store: Arc<ArticleStore>,
}

impl ClassifyService {
    pub fn new(ai: Arc<OpenAiClient>, store: Arc<ArticleStore>) -> Self {
        Self { ai, store }
    }

    /// Classify up to [`PENDING_LIMIT`] pending articles.
    pub async fn run(&self) -> Result<ClassifySummary, NewsdeskError> {
        let articles = self
            .store
            .list_articles(Some(ArticleStatus::Pending), PENDING_LIMIT)
            .map_err(|e| NewsdeskError::storage(e.to_string()))?;

        if articles.is_empty() {
            info!("No articles to classify");
            return Ok(ClassifySummary::default());
        }

        let total = articles.len();
        info!("Found {} articles to classify", total);

        let results = process_in_batches(articles, BATCH_SIZE, BATCH_DELAY, |article| {
            self.classify_one(article)
        })
        .await;

        let classified = results.iter().filter(|r| r.is_ok()).count();
        let failed = total - classified;

        info!(
            "Classification completed: {} success, {} failed",
            classified, failed
        );
        Ok(ClassifySummary {
            total,
            classified,
            failed,
        })
    }

    async fn classify_one(&self, article: Article) -> Result<(), NewsdeskError> {
        let body = article
            .content
            .as_deref()
            .or(article.excerpt.as_deref())
            .unwrap_or_default();

        let classification = match self.ai.classify_article(&article.title, body).await {
            Ok(classification) => classification,
            Err(e) => {
                error!("Failed to classify article {}: {}", article.id, e);
                return Err(e);
            }
        };

        info!(
            "Classified \"{}\" as {} (score: {})",
            article.title, classification.category, classification.relevance_score
        );

        self.store
            .apply_classification(article.id, &classification)
            .map_err(|e| NewsdeskError::storage(e.to_string()))?;
        Ok(())
    }

    /// Enhanced classification of a single article, for the manual endpoint.
    ///
    /// Flattens the standard fields onto the row and returns the full
    /// enhanced result to the caller.
    pub async fn classify_single(&self, id: i64) -> Result<EnhancedClassification, NewsdeskError> {
        let article = self
            .store
            .get_article(id)
            .map_err(|e| NewsdeskError::storage(e.to_string()))?
            .ok_or_else(|| NewsdeskError::not_found(format!("Article {} not found", id)))?;

        let body = article
            .content
            .as_deref()
            .or(article.excerpt.as_deref())
            .unwrap_or_default();

        let enhanced = self
            .ai
            .enhanced_classify_article(&article.title, body)
            .await?;

        self.store
            .apply_classification(id, &enhanced.to_classification())
            .map_err(|e| NewsdeskError::storage(e.to_string()))?;

        Ok(enhanced)
    }
}
