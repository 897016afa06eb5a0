//! Readability-style article content extraction
//!
//! Given an article URL, fetches the page and isolates the main textual
//! content, discarding navigation and boilerplate. Failure never propagates:
//! callers fall back to the feed-provided summary.

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; NewsdeskBot/1.0; +https://newsdesk.dev/bot)";

/// Paragraphs shorter than this are treated as boilerplate
const MIN_PARAGRAPH_CHARS: usize = 30;

/// Excerpt length when the page has no usable description
const EXCERPT_CHARS: usize = 300;

/// Candidate containers for the main article body, most specific first
const CONTENT_SELECTORS: &[&str] = &["article", "main", "#content", ".content", ".post", ".entry"];

/// Extracted main content of an article page
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    /// Article title
    pub title: String,
    /// Plain-text body
    pub content: String,
    /// Short excerpt (description meta tag, else the first 300 chars)
    pub excerpt: String,
    /// Inner HTML of the chosen content container
    pub html: String,
    /// Character length of the plain-text body
    pub length: usize,
    /// Site name from og:site_name, when present
    pub site_name: Option<String>,
    /// Thumbnail chosen by the priority strategy
    pub thumbnail: Option<String>,
}

/// HTTP + readability extractor
pub struct ContentExtractor {
    client: Client,
}

impl ContentExtractor {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Fetch a page and extract its readable content.
    ///
    /// Any failure (network, non-success status, unparseable document, no
    /// extractable text) yields `None`.
    pub async fn extract(&self, url: &str) -> Option<ExtractedContent> {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Content extraction fetch failed for {}: {}", url, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "Content extraction got status {} for {}",
                response.status(),
                url
            );
            return None;
        }

        let html = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Content extraction body read failed for {}: {}", url, e);
                return None;
            }
        };

        let extracted = extract_from_html(&html, url);
        if extracted.is_none() {
            debug!("No extractable content at {}", url);
        }
        extracted
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract readable content from a fetched HTML document.
pub fn extract_from_html(html: &str, page_url: &str) -> Option<ExtractedContent> {
    let document = Html::parse_document(html);

    let (content, container_html) = extract_main_content(&document)?;
    if content.is_empty() {
        return None;
    }

    let title = meta_content(&document, "meta[property=\"og:title\"]")
        .or_else(|| {
            let selector = Selector::parse("title").ok()?;
            document
                .select(&selector)
                .next()
                .map(|t| t.text().collect::<String>().trim().to_string())
        })
        .filter(|t| !t.is_empty())?;

    let excerpt = meta_content(&document, "meta[property=\"og:description\"]")
        .or_else(|| meta_content(&document, "meta[name=\"description\"]"))
        .unwrap_or_else(|| truncate_chars(&content, EXCERPT_CHARS));

    let site_name = meta_content(&document, "meta[property=\"og:site_name\"]");
    let thumbnail = select_thumbnail(&document, page_url);
    let length = content.chars().count();

    Some(ExtractedContent {
        title,
        content,
        excerpt,
        html: container_html,
        length,
        site_name,
        thumbnail,
    })
}

/// Find the main content container and collect its substantial paragraphs.
fn extract_main_content(document: &Html) -> Option<(String, String)> {
    let paragraph_selector = Selector::parse("p, blockquote").ok()?;

    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };

        for container in document.select(&selector) {
            let paragraphs = collect_paragraphs(&container, &paragraph_selector);
            if !paragraphs.is_empty() {
                return Some((paragraphs.join("\n\n"), container.inner_html()));
            }
        }
    }

    // Fall back to every substantial paragraph on the page
    let paragraphs: Vec<String> = document
        .select(&paragraph_selector)
        .filter_map(|p| clean_paragraph(&p))
        .collect();

    if paragraphs.is_empty() {
        None
    } else {
        let body_html = document
            .select(&Selector::parse("body").ok()?)
            .next()
            .map(|b| b.inner_html())
            .unwrap_or_default();
        Some((paragraphs.join("\n\n"), body_html))
    }
}

fn collect_paragraphs(container: &ElementRef, paragraph_selector: &Selector) -> Vec<String> {
    container
        .select(paragraph_selector)
        .filter_map(|p| clean_paragraph(&p))
        .collect()
}

fn clean_paragraph(paragraph: &ElementRef) -> Option<String> {
    let text = paragraph
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if text.len() < MIN_PARAGRAPH_CHARS {
        return None;
    }
    Some(text)
}

fn meta_content(document: &Html, selector_str: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Choose a thumbnail for the page.
///
/// Strict priority order, first match wins:
/// 1. Open Graph og:image
/// 2. Twitter Card twitter:image
/// 3. First <img> inside an <article>
/// 4. Largest <img> by area among those with explicit width >= 400 and
///    height >= 300
pub fn select_thumbnail(document: &Html, page_url: &str) -> Option<String> {
    if let Some(image) = meta_content(document, "meta[property=\"og:image\"]") {
        return normalize_image_url(&image, page_url);
    }

    if let Some(image) = meta_content(document, "meta[name=\"twitter:image\"]") {
        return normalize_image_url(&image, page_url);
    }

    if let Ok(selector) = Selector::parse("article img") {
        if let Some(src) = document
            .select(&selector)
            .next()
            .and_then(|img| img.value().attr("src"))
        {
            return normalize_image_url(src, page_url);
        }
    }

    let selector = Selector::parse("img").ok()?;
    let largest = document
        .select(&selector)
        .filter_map(|img| {
            let src = img.value().attr("src")?;
            let width: u32 = img.value().attr("width")?.parse().ok()?;
            let height: u32 = img.value().attr("height")?.parse().ok()?;
            (width >= 400 && height >= 300).then_some((src, width as u64 * height as u64))
        })
        .max_by_key(|(_, area)| *area);

    largest.and_then(|(src, _)| normalize_image_url(src, page_url))
}

/// Normalize an image URL against the page URL.
///
/// Handles absolute, protocol-relative, root-relative and document-relative
/// forms.
pub fn normalize_image_url(image_url: &str, page_url: &str) -> Option<String> {
    if image_url.is_empty() {
        return None;
    }

    if image_url.starts_with("http") {
        return Some(image_url.to_string());
    }

    if let Some(rest) = image_url.strip_prefix("//") {
        return Some(format!("https://{}", rest));
    }

    let base = url::Url::parse(page_url).ok()?;

    if image_url.starts_with('/') {
        return Some(format!(
            "{}://{}{}",
            base.scheme(),
            base.host_str()?,
            image_url
        ));
    }

    base.join(image_url).ok().map(|u| u.to_string())
}

/// Truncate to at most `max` characters on a char boundary
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html>
<head>
  <title>Fallback Title</title>
  <meta property="og:title" content="OG Title">
  <meta property="og:site_name" content="Example News">
  <meta property="og:image" content="/images/og.jpg">
  <meta name="twitter:image" content="https://cdn.example.com/tw.jpg">
</head>
<body>
  <nav><p>Home About Contact and other navigation links here</p></nav>
  <article>
    <img src="inline.jpg">
    <p>This is the first substantial paragraph of the article body text.</p>
    <p>And here is a second paragraph that also carries real content.</p>
    <p>ok</p>
  </article>
  <img src="/big.jpg" width="800" height="600">
</body>
</html>"#;

    #[test]
    fn test_extracts_article_paragraphs() {
        let extracted = extract_from_html(PAGE, "https://example.com/post/1").unwrap();

        assert_eq!(extracted.title, "OG Title");
        assert!(extracted.content.contains("first substantial paragraph"));
        assert!(extracted.content.contains("second paragraph"));
        // Short paragraphs are boilerplate
        assert!(!extracted.content.contains("\n\nok"));
        assert_eq!(extracted.site_name.as_deref(), Some("Example News"));
        assert_eq!(extracted.length, extracted.content.chars().count());
    }

    #[test]
    fn test_excerpt_falls_back_to_content_prefix() {
        let extracted = extract_from_html(PAGE, "https://example.com/post/1").unwrap();
        // No description meta on the page, so the excerpt is a content prefix
        assert!(extracted.excerpt.starts_with("This is the first"));
        assert!(extracted.excerpt.chars().count() <= 300);
    }

    #[test]
    fn test_thumbnail_og_image_beats_larger_images() {
        let document = Html::parse_document(PAGE);
        let thumbnail = select_thumbnail(&document, "https://example.com/post/1");
        // og:image wins over twitter:image, the article img and the 800x600 img
        assert_eq!(thumbnail.as_deref(), Some("https://example.com/images/og.jpg"));
    }

    #[test]
    fn test_thumbnail_priority_chain() {
        let without_meta = r#"<html><body>
            <article><img src="article.jpg"></article>
            <img src="/big.jpg" width="800" height="600">
        </body></html>"#;
        let document = Html::parse_document(without_meta);
        let thumbnail = select_thumbnail(&document, "https://example.com/a/b");
        assert_eq!(
            thumbnail.as_deref(),
            Some("https://example.com/a/article.jpg")
        );

        let images_only = r#"<html><body>
            <img src="/small.jpg" width="200" height="200">
            <img src="/wide.jpg" width="500" height="400">
            <img src="/huge.jpg" width="1000" height="800">
            <img src="/nosize.jpg">
        </body></html>"#;
        let document = Html::parse_document(images_only);
        let thumbnail = select_thumbnail(&document, "https://example.com/a/b");
        assert_eq!(thumbnail.as_deref(), Some("https://example.com/huge.jpg"));
    }

    #[test]
    fn test_thumbnail_none_when_nothing_qualifies() {
        let page = r#"<html><body><img src="/tiny.jpg" width="100" height="80"></body></html>"#;
        let document = Html::parse_document(page);
        assert_eq!(select_thumbnail(&document, "https://example.com/"), None);
    }

    #[test]
    fn test_normalize_image_url_cases() {
        let page = "https://example.com/news/2026/story.html";

        assert_eq!(
            normalize_image_url("https://cdn.com/x.jpg", page).as_deref(),
            Some("https://cdn.com/x.jpg")
        );
        assert_eq!(
            normalize_image_url("//cdn.com/x.jpg", page).as_deref(),
            Some("https://cdn.com/x.jpg")
        );
        assert_eq!(
            normalize_image_url("/img/x.jpg", page).as_deref(),
            Some("https://example.com/img/x.jpg")
        );
        assert_eq!(
            normalize_image_url("x.jpg", page).as_deref(),
            Some("https://example.com/news/2026/x.jpg")
        );
        assert_eq!(normalize_image_url("", page), None);
    }

    #[test]
    fn test_unparseable_document_yields_none() {
        // A page with no substantial paragraphs anywhere
        let page = "<html><body><div>nav</div></body></html>";
        assert!(extract_from_html(page, "https://example.com/").is_none());
    }
}
