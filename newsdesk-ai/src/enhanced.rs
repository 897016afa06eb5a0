//! Enhanced classifier and executive summaries
//!
//! The enhanced variant trades determinism for richer output: entities,
//! summaries and social-media signals, at a moderate sampling temperature.

use newsdesk_core::{EnhancedClassification, ExecutiveSummary, NewsdeskError};
use tracing::instrument;

use crate::client::{extract_json, truncate_chars, OpenAiClient};

/// Character budget for article content in the enhanced prompts
const CONTENT_BUDGET: usize = 2000;

const ANALYST_SYSTEM_PROMPT: &str = "You are an expert news analyst and social media content \
strategist. Analyze articles for both informational value and social media potential. Always \
return valid JSON.";

const SUMMARY_SYSTEM_PROMPT: &str =
    "You are an expert at creating concise, impactful summaries. Always return valid JSON.";

impl OpenAiClient {
    /// Run the enhanced classification over an article.
    #[instrument(skip(self, content), fields(title = %title))]
    pub async fn enhanced_classify_article(
        &self,
        title: &str,
        content: &str,
    ) -> Result<EnhancedClassification, NewsdeskError> {
        let prompt = format!(
            r#"Analyze this news article in detail and provide comprehensive classification and insights.

Article:
Title: {}
Content: {}

Provide a detailed JSON response with the following structure:
{{
  "category": "Choose from: TECHNOLOGY, BUSINESS, SPORTS, POLITICS, ENTERTAINMENT, HEALTH, SCIENCE, LIFESTYLE",
  "subcategory": "Specific subtopic within the category",
  "sentiment": "positive, negative, or neutral",
  "sentiment_score": -1.0 to 1.0 (numeric score),
  "keywords": ["5-8 most relevant keywords"],
  "entities": {{
    "people": ["mentioned people"],
    "companies": ["mentioned companies/organizations"],
    "locations": ["mentioned places"],
    "technologies": ["mentioned tech/products"]
  }},
  "one_line_summary": "Concise one-line summary (max 100 chars)",
  "key_points": [
    "First key point",
    "Second key point",
    "Third key point"
  ],
  "instagram_worthy": true/false (is this suitable for Instagram?),
  "visual_suggestion": "Suggestion for visual content/imagery",
  "target_audience": "Primary audience for this content",
  "relevance_score": 1-10 (general importance),
  "trending_potential": 1-10 (viral potential),
  "language": "en, ko, or other"
}}

Focus on extracting actionable insights that would help create engaging social media content."#,
            title,
            truncate_chars(content, CONTENT_BUDGET)
        );

        let content = self
            .chat_json(ANALYST_SYSTEM_PROMPT, &prompt, 0.3, Some(1000))
            .await?;
        let json_str = extract_json(&content)?;

        serde_json::from_str(&json_str).map_err(|e| {
            NewsdeskError::parse(format!("Failed to parse enhanced classification: {}", e))
        })
    }

    /// Generate an executive summary for an article.
    #[instrument(skip(self, content), fields(title = %title))]
    pub async fn generate_executive_summary(
        &self,
        title: &str,
        content: &str,
    ) -> Result<ExecutiveSummary, NewsdeskError> {
        let prompt = format!(
            r#"Create an executive summary for this article.

Title: {}
Content: {}

Return JSON with:
{{
  "executive_summary": "2-3 paragraph professional summary",
  "tldr": "One sentence TL;DR (max 150 chars)",
  "main_takeaway": "The single most important point",
  "call_to_action": "Suggested action for readers"
}}"#,
            title,
            truncate_chars(content, CONTENT_BUDGET)
        );

        let content = self
            .chat_json(SUMMARY_SYSTEM_PROMPT, &prompt, 0.2, Some(500))
            .await?;
        let json_str = extract_json(&content)?;

        serde_json::from_str(&json_str)
            .map_err(|e| NewsdeskError::parse(format!("Failed to parse summary: {}", e)))
    }

    /// Summarize an article as prose using a caller-supplied system prompt
    /// (the stored per-category templates).
    #[instrument(skip(self, system_prompt, content), fields(title = %title))]
    pub async fn summarize_with_prompt(
        &self,
        system_prompt: &str,
        title: &str,
        content: &str,
    ) -> Result<String, NewsdeskError> {
        let prompt = format!(
            "Title: {}\n\nContent: {}\n\nSummarize this article following your editorial guidelines.",
            title,
            truncate_chars(content, CONTENT_BUDGET)
        );

        let summary = self
            .chat_text(system_prompt, &prompt, 0.3, Some(500))
            .await?;
        Ok(summary.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use newsdesk_core::{Category, Sentiment};

    use super::*;

    #[test]
    fn test_enhanced_stub_parses() {
        let stub = r#"{
            "category": "SCIENCE",
            "subcategory": "space",
            "sentiment": "positive",
            "sentiment_score": 0.6,
            "keywords": ["telescope", "exoplanet"],
            "entities": {
                "people": ["Jane Doe"],
                "companies": ["NASA"],
                "locations": [],
                "technologies": ["JWST"]
            },
            "one_line_summary": "New exoplanet imaged directly",
            "key_points": ["First direct image", "Closest candidate yet"],
            "instagram_worthy": true,
            "visual_suggestion": "Telescope render",
            "target_audience": "science enthusiasts",
            "relevance_score": 8,
            "trending_potential": 7,
            "language": "en"
        }"#;

        let result: EnhancedClassification =
            serde_json::from_str(&extract_json(stub).unwrap()).unwrap();
        assert_eq!(result.category, Category::Science);
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert!(result.instagram_worthy);
        assert_eq!(result.entities.companies, vec!["NASA"]);
    }

    #[test]
    fn test_enhanced_tolerates_missing_optional_lists() {
        // Entities and key points are occasionally omitted by the model
        let stub = r#"{
            "category": "HEALTH",
            "subcategory": "nutrition",
            "sentiment": "neutral",
            "sentiment_score": 0.0,
            "keywords": [],
            "one_line_summary": "s",
            "instagram_worthy": false,
            "visual_suggestion": "",
            "target_audience": "",
            "relevance_score": 2,
            "trending_potential": 1,
            "language": "en"
        }"#;

        let result: EnhancedClassification = serde_json::from_str(stub).unwrap();
        assert!(result.entities.people.is_empty());
        assert!(result.key_points.is_empty());
    }

    #[test]
    fn test_summary_stub_parses() {
        let stub = r#"{
            "executive_summary": "Two paragraphs.",
            "tldr": "Short version.",
            "main_takeaway": "The point.",
            "call_to_action": "Read more."
        }"#;

        let summary: ExecutiveSummary = serde_json::from_str(stub).unwrap();
        assert_eq!(summary.tldr, "Short version.");
    }
}
