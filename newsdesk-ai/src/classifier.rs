//! Standard article classifier
//!
//! Deterministic (temperature 0) classification into the closed category
//! set. A malformed or missing response is a hard failure for the item; the
//! batch layer in the services crate isolates per-item failures.

use newsdesk_core::{ClassificationResult, NewsdeskError};
use tracing::instrument;

use crate::client::{extract_json, truncate_chars, OpenAiClient};

/// Character budget for article content in the standard prompt
const CONTENT_BUDGET: usize = 1000;

const SYSTEM_PROMPT: &str = "You are a news classification assistant. Return only valid JSON.";

impl OpenAiClient {
    /// Classify a single article by title and body text.
    #[instrument(skip(self, content), fields(title = %title))]
    pub async fn classify_article(
        &self,
        title: &str,
        content: &str,
    ) -> Result<ClassificationResult, NewsdeskError> {
        let prompt = format!(
            r#"Classify this news article and extract key information. Return ONLY valid JSON.

Article:
Title: {}
Content: {}

Respond with JSON in this exact format:
{{
  "category": "one of: TECHNOLOGY, BUSINESS, SPORTS, POLITICS, ENTERTAINMENT, HEALTH, SCIENCE",
  "subcategory": "more specific topic",
  "sentiment": "positive, negative, or neutral",
  "keywords": ["keyword1", "keyword2", "keyword3"],
  "relevance_score": 1-10
}}"#,
            title,
            truncate_chars(content, CONTENT_BUDGET)
        );

        let content = self.chat_json(SYSTEM_PROMPT, &prompt, 0.0, None).await?;
        let json_str = extract_json(&content)?;

        serde_json::from_str(&json_str)
            .map_err(|e| NewsdeskError::parse(format!("Failed to parse classification: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use newsdesk_core::{Category, Sentiment};

    use super::*;

    #[test]
    fn test_stubbed_response_parses_into_result() {
        // The exact shape the prompt demands, as the provider returns it
        let stub = r#"{
            "category": "TECHNOLOGY",
            "subcategory": "AI",
            "sentiment": "neutral",
            "keywords": ["x"],
            "relevance_score": 7
        }"#;

        let result: ClassificationResult =
            serde_json::from_str(&extract_json(stub).unwrap()).unwrap();
        assert_eq!(result.category, Category::Technology);
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.relevance_score, 7);
    }

    #[test]
    fn test_content_budget_applies() {
        let long = "x".repeat(5000);
        assert_eq!(truncate_chars(&long, CONTENT_BUDGET).len(), 1000);
    }
}
