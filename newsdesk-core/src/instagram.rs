//! Generated Instagram post data structures

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication state of a generated post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Generated, awaiting review
    Draft,
    /// Queued for publication
    Scheduled,
    /// Published
    Posted,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Posted => "posted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(PostStatus::Draft),
            "scheduled" => Some(PostStatus::Scheduled),
            "posted" => Some(PostStatus::Posted),
            _ => None,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored Instagram post derived from one article.
///
/// Each article owns at most one post; the pipeline only ever creates the
/// row, later edits come from the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramPost {
    /// Row identifier
    pub id: i64,
    /// Source article (unique per post)
    pub article_id: i64,
    /// Generated catchy title
    pub generated_title: String,
    /// Short caption
    pub caption: String,
    /// Extended caption with call-to-action
    pub full_caption: String,
    /// Hashtag list (without leading '#')
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// Accessibility alt text
    pub alt_text: String,
    /// Image URL, copied from the article thumbnail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Publication state
    pub status: PostStatus,
    /// Row creation time
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_status_round_trip() {
        for status in [PostStatus::Draft, PostStatus::Scheduled, PostStatus::Posted] {
            assert_eq!(PostStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PostStatus::parse("published"), None);
    }
}
