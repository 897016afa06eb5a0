//! Article data structures for the ingestion pipeline

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing state of an ingested article.
///
/// Transitions only move forward: pending → classified → generated → posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    /// Freshly ingested, waiting for classification
    Pending,
    /// Classified by the LLM, waiting for content generation
    Classified,
    /// Instagram content generated
    Generated,
    /// Published to Instagram
    Posted,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Pending => "pending",
            ArticleStatus::Classified => "classified",
            ArticleStatus::Generated => "generated",
            ArticleStatus::Posted => "posted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ArticleStatus::Pending),
            "classified" => Some(ArticleStatus::Classified),
            "generated" => Some(ArticleStatus::Generated),
            "posted" => Some(ArticleStatus::Posted),
            _ => None,
        }
    }

    /// Position in the forward-only lifecycle
    pub fn rank(self) -> u8 {
        match self {
            ArticleStatus::Pending => 0,
            ArticleStatus::Classified => 1,
            ArticleStatus::Generated => 2,
            ArticleStatus::Posted => 3,
        }
    }

    /// Whether moving to `next` is a forward transition.
    ///
    /// The pipeline never regresses an article's status.
    pub fn can_advance_to(self, next: ArticleStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed category set produced by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Technology,
    Business,
    Sports,
    Politics,
    Entertainment,
    Health,
    Science,
    /// Only produced by the enhanced classifier
    Lifestyle,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "TECHNOLOGY",
            Category::Business => "BUSINESS",
            Category::Sports => "SPORTS",
            Category::Politics => "POLITICS",
            Category::Entertainment => "ENTERTAINMENT",
            Category::Health => "HEALTH",
            Category::Science => "SCIENCE",
            Category::Lifestyle => "LIFESTYLE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TECHNOLOGY" => Some(Category::Technology),
            "BUSINESS" => Some(Category::Business),
            "SPORTS" => Some(Category::Sports),
            "POLITICS" => Some(Category::Politics),
            "ENTERTAINMENT" => Some(Category::Entertainment),
            "HEALTH" => Some(Category::Health),
            "SCIENCE" => Some(Category::Science),
            "LIFESTYLE" => Some(Category::Lifestyle),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment label produced by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored news article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Row identifier
    pub id: i64,
    /// Canonical source URL (deduplication key)
    pub url: String,
    /// Article title
    pub title: String,
    /// Extracted body text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Short excerpt (first ~300 chars of the content if the feed had none)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Thumbnail image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Author name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Source hostname
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Publication date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Pipeline processing state
    pub status: ArticleStatus,
    /// Classifier category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Classifier subcategory (free text)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Sentiment label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    /// Classifier keywords
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Topical importance, 1-10
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<u8>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting a freshly ingested article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArticle {
    pub url: String,
    pub title: String,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub thumbnail_url: Option<String>,
    pub author: Option<String>,
    pub source: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}
