//! Instagram content generation
//!
//! Builds caption/hashtag/alt-text content from a classified article, styled
//! by a per-category lookup table.

use newsdesk_core::{Category, NewsdeskError};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::{extract_json, truncate_chars, OpenAiClient};

/// Content budget when no excerpt is available
const CONTENT_FALLBACK_CHARS: usize = 500;

const SYSTEM_PROMPT: &str = "You are an Instagram content creator specialized in news curation. \
Return only valid JSON.";

/// Style profile applied per category
#[derive(Debug, Clone)]
pub struct CategoryStyle {
    pub tone: &'static str,
    pub emojis: &'static [&'static str],
    pub hashtags: &'static [&'static str],
}

const TECHNOLOGY_STYLE: CategoryStyle = CategoryStyle {
    tone: "informative, exciting",
    emojis: &["🚀", "💡", "🔬", "⚡"],
    hashtags: &["#TechNews", "#Innovation", "#FutureTech"],
};

/// Style profile for a category.
///
/// Categories without their own profile fall back to the TECHNOLOGY style.
pub fn category_style(category: Category) -> &'static CategoryStyle {
    match category {
        Category::Technology => &TECHNOLOGY_STYLE,
        Category::Business => &CategoryStyle {
            tone: "professional, insightful",
            emojis: &["📈", "💼", "💰", "🎯"],
            hashtags: &["#BusinessNews", "#Finance", "#Markets"],
        },
        Category::Sports => &CategoryStyle {
            tone: "energetic, passionate",
            emojis: &["⚽", "🏀", "🏆", "🔥"],
            hashtags: &["#Sports", "#Athletics", "#GameDay"],
        },
        Category::Politics => &CategoryStyle {
            tone: "balanced, informative",
            emojis: &["🗳️", "🌍", "📰", "⚖️"],
            hashtags: &["#Politics", "#News", "#WorldNews"],
        },
        Category::Entertainment => &CategoryStyle {
            tone: "fun, engaging",
            emojis: &["🎬", "🎭", "🎵", "✨"],
            hashtags: &["#Entertainment", "#PopCulture", "#Trending"],
        },
        Category::Health => &CategoryStyle {
            tone: "caring, informative",
            emojis: &["💚", "🧘", "💪", "🏥"],
            hashtags: &["#Health", "#Wellness", "#Healthcare"],
        },
        Category::Science => &CategoryStyle {
            tone: "curious, educational",
            emojis: &["🔬", "🧪", "🌌", "🧬"],
            hashtags: &["#Science", "#Research", "#Discovery"],
        },
        Category::Lifestyle => &TECHNOLOGY_STYLE,
    }
}

/// Generated Instagram content for one article
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstagramContent {
    /// Catchy title, max 80 chars
    pub title: String,
    /// Short caption, ~125-150 chars
    pub caption: String,
    /// Extended caption with call-to-action, up to 2200 chars
    pub full_caption: String,
    /// 10-15 hashtags mixing broad and niche
    pub hashtags: Vec<String>,
    /// Accessibility alt text, max 100 chars
    pub alt_text: String,
    /// One primary emoji
    pub emoji: String,
}

/// Classified-article fields fed into the generator
#[derive(Debug, Clone)]
pub struct GenerationInput {
    pub title: String,
    pub category: Option<Category>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
}

impl GenerationInput {
    fn key_points(&self) -> String {
        if let Some(excerpt) = self.excerpt.as_deref().filter(|e| !e.is_empty()) {
            return excerpt.to_string();
        }
        self.content
            .as_deref()
            .map(|c| truncate_chars(c, CONTENT_FALLBACK_CHARS))
            .unwrap_or_default()
    }
}

impl OpenAiClient {
    /// Generate Instagram content for a classified article.
    #[instrument(skip(self, article), fields(title = %article.title))]
    pub async fn generate_instagram_content(
        &self,
        article: &GenerationInput,
    ) -> Result<InstagramContent, NewsdeskError> {
        let category = article.category.unwrap_or(Category::Technology);
        let style = category_style(category);

        let prompt = format!(
            r#"Create Instagram post content for this news article.

Article Title: {title}
Category: {category}
Key Points: {key_points}

Style Guide:
- Tone: {tone}
- Suggested emojis: {emojis}
- Base hashtags: {hashtags}

Generate:
1. TITLE: Catchy, engaging title (max 80 characters, front-load key info)
2. CAPTION: Engaging caption for Instagram (125-150 characters ideal)
3. FULL_CAPTION: Extended caption with context (up to 2200 characters)
4. HASHTAGS: 10-15 relevant hashtags (mix of popular and niche)
5. ALT_TEXT: Descriptive alt text for accessibility (max 100 characters)
6. EMOJI: One primary emoji for visual appeal

Rules:
- Be conversational and engaging
- Use emojis strategically (1-3)
- Front-load the most important information
- Make it shareable and comment-worthy
- Avoid clickbait

Return ONLY valid JSON in this format:
{{
  "title": "engaging title",
  "caption": "short engaging caption",
  "fullCaption": "longer caption with details and call-to-action",
  "hashtags": ["hashtag1", "hashtag2"],
  "altText": "image description",
  "emoji": "suggested emoji"
}}"#,
            title = article.title,
            category = category,
            key_points = article.key_points(),
            tone = style.tone,
            emojis = style.emojis.join(", "),
            hashtags = style.hashtags.join(", "),
        );

        let content = self.chat_json(SYSTEM_PROMPT, &prompt, 0.7, None).await?;
        let json_str = extract_json(&content)?;

        serde_json::from_str(&json_str).map_err(|e| {
            NewsdeskError::parse(format!("Failed to parse Instagram content: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifestyle_falls_back_to_technology_style() {
        let style = category_style(Category::Lifestyle);
        assert_eq!(style.tone, "informative, exciting");
        assert!(style.hashtags.contains(&"#TechNews"));
    }

    #[test]
    fn test_each_category_has_emojis_and_hashtags() {
        for category in [
            Category::Technology,
            Category::Business,
            Category::Sports,
            Category::Politics,
            Category::Entertainment,
            Category::Health,
            Category::Science,
        ] {
            let style = category_style(category);
            assert!(!style.emojis.is_empty());
            assert!(!style.hashtags.is_empty());
        }
    }

    #[test]
    fn test_key_points_prefers_excerpt() {
        let input = GenerationInput {
            title: "t".to_string(),
            category: None,
            excerpt: Some("the excerpt".to_string()),
            content: Some("the content".to_string()),
        };
        assert_eq!(input.key_points(), "the excerpt");

        let input = GenerationInput {
            excerpt: None,
            ..input
        };
        assert_eq!(input.key_points(), "the content");
    }

    #[test]
    fn test_content_stub_parses_camel_case() {
        let stub = r#"{
            "title": "Big News",
            "caption": "short",
            "fullCaption": "long with CTA",
            "hashtags": ["TechNews", "AI"],
            "altText": "a robot",
            "emoji": "🚀"
        }"#;

        let content: InstagramContent = serde_json::from_str(stub).unwrap();
        assert_eq!(content.full_caption, "long with CTA");
        assert_eq!(content.alt_text, "a robot");
        assert_eq!(content.hashtags.len(), 2);
    }
}
