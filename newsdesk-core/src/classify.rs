//! Structured classifier output types
//!
//! These are transient results: their fields are flattened onto the stored
//! article row rather than persisted as separate entities.

use serde::{Deserialize, Serialize};

use crate::article::{Category, Sentiment};

/// Output of the standard classifier (temperature 0, strict schema)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Closed category set
    pub category: Category,
    /// More specific topic, free text
    pub subcategory: String,
    /// Sentiment label
    pub sentiment: Sentiment,
    /// Extracted keywords
    pub keywords: Vec<String>,
    /// Topical importance, 1-10
    pub relevance_score: u8,
}

/// Named entities extracted by the enhanced classifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedEntities {
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// Output of the enhanced classifier (temperature 0.3, richer schema)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedClassification {
    pub category: Category,
    pub subcategory: String,

    pub sentiment: Sentiment,
    /// Continuous sentiment, -1.0 to 1.0
    pub sentiment_score: f64,

    pub keywords: Vec<String>,
    #[serde(default)]
    pub entities: NamedEntities,

    /// One-line summary (max ~100 chars)
    pub one_line_summary: String,
    /// Up to three key points
    #[serde(default)]
    pub key_points: Vec<String>,

    /// Whether the article is suitable for Instagram
    pub instagram_worthy: bool,
    /// Suggestion for visual content or imagery
    pub visual_suggestion: String,
    /// Primary audience for this content
    pub target_audience: String,

    /// Topical importance, 1-10
    pub relevance_score: u8,
    /// Viral potential, 1-10
    pub trending_potential: u8,
    /// Detected language code ("en", "ko", ...)
    pub language: String,
}

impl EnhancedClassification {
    /// Downgrade to the standard result shape for flattening onto a row.
    pub fn to_classification(&self) -> ClassificationResult {
        ClassificationResult {
            category: self.category,
            subcategory: self.subcategory.clone(),
            sentiment: self.sentiment,
            keywords: self.keywords.clone(),
            relevance_score: self.relevance_score,
        }
    }
}

/// Output of the executive summary call (temperature 0.2)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    /// 2-3 paragraph professional summary
    pub executive_summary: String,
    /// One sentence TL;DR (max ~150 chars)
    pub tldr: String,
    /// The single most important point
    pub main_takeaway: String,
    /// Suggested action for readers
    pub call_to_action: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_deserializes_strict_schema() {
        let json = r#"{
            "category": "TECHNOLOGY",
            "subcategory": "AI",
            "sentiment": "neutral",
            "keywords": ["x"],
            "relevance_score": 7
        }"#;

        let result: ClassificationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.category, Category::Technology);
        assert_eq!(result.subcategory, "AI");
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.keywords, vec!["x"]);
        assert_eq!(result.relevance_score, 7);
    }

    #[test]
    fn test_classification_rejects_unknown_category() {
        let json = r#"{
            "category": "GARDENING",
            "subcategory": "roses",
            "sentiment": "positive",
            "keywords": [],
            "relevance_score": 3
        }"#;

        assert!(serde_json::from_str::<ClassificationResult>(json).is_err());
    }

    #[test]
    fn test_enhanced_downgrades_to_standard() {
        let enhanced = EnhancedClassification {
            category: Category::Business,
            subcategory: "markets".to_string(),
            sentiment: Sentiment::Negative,
            sentiment_score: -0.4,
            keywords: vec!["rates".to_string()],
            entities: NamedEntities::default(),
            one_line_summary: "Rates up".to_string(),
            key_points: vec![],
            instagram_worthy: false,
            visual_suggestion: String::new(),
            target_audience: "investors".to_string(),
            relevance_score: 8,
            trending_potential: 5,
            language: "en".to_string(),
        };

        let standard = enhanced.to_classification();
        assert_eq!(standard.category, Category::Business);
        assert_eq!(standard.relevance_score, 8);
    }
}
