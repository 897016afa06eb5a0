//! RSS/Atom feed client
//!
//! Fetches and parses feeds from the curated source registry into
//! normalized article records.

use chrono::{DateTime, Utc};
use reqwest::Client;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::FeedError;
use crate::sources::FeedSource;

/// A normalized feed item, before persistence
#[derive(Debug, Clone)]
pub struct FeedArticle {
    /// Stable identifier (hash of the link)
    pub id: String,
    /// Item title
    pub title: String,
    /// Canonical article URL
    pub link: String,
    /// Publication date, if the feed provided one
    pub published_at: Option<DateTime<Utc>>,
    /// HTML-free summary text
    pub summary: String,
    /// Full content when the feed carries it (content:encoded and friends)
    pub full_content: Option<String>,
    /// Thumbnail image URL
    pub thumbnail: Option<String>,
    /// Author name
    pub author: Option<String>,
    /// Category tags from the feed
    pub categories: Vec<String>,
    /// Hostname of the article URL
    pub source_host: Option<String>,
}

impl FeedArticle {
    /// Best available body text: full content if present, else the summary.
    pub fn body(&self) -> &str {
        match &self.full_content {
            Some(content) if !content.is_empty() => content,
            _ => &self.summary,
        }
    }
}

/// Feed client over the curated registry
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    /// Create a new fetcher with a bounded request timeout
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Fetch a single feed and normalize its items.
    ///
    /// Individual malformed items are skipped; only transport or whole-body
    /// parse failures are errors.
    pub async fn fetch_feed(&self, source: &FeedSource) -> Result<Vec<FeedArticle>, FeedError> {
        let response = self
            .client
            .get(&source.url)
            .header("User-Agent", "Newsdesk/1.0")
            .send()
            .await
            .map_err(|e| FeedError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::ApiError {
                status: response.status().as_u16(),
                message: format!("Failed to fetch {}", source.url),
            });
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| FeedError::RequestFailed(e.to_string()))?;

        let mut items = parse_feed(&content)
            .map_err(|_| FeedError::ParseError(format!("Failed to parse feed: {}", source.url)))?;

        items.truncate(source.limit);
        debug!("Fetched {} items from {}", items.len(), source.name);
        Ok(items)
    }

    /// Fetch several feeds concurrently, aggregating best-effort.
    ///
    /// Feeds that fail to fetch or parse are logged and skipped; the result
    /// contains items from exactly the succeeding feeds and the call itself
    /// never fails.
    pub async fn fetch_many(&self, sources: &[FeedSource]) -> Vec<FeedArticle> {
        let fetches = sources.iter().map(|source| async move {
            match self.fetch_feed(source).await {
                Ok(items) => items,
                Err(e) => {
                    warn!("Failed to fetch feed {}: {}", source.name, e);
                    Vec::new()
                }
            }
        });

        let mut all_items: Vec<FeedArticle> = futures::future::join_all(fetches)
            .await
            .into_iter()
            .flatten()
            .collect();

        // Newest first across feeds; items without a date sort last
        all_items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        all_items
    }
}

impl Default for FeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a raw feed body, trying RSS first and then Atom.
pub fn parse_feed(content: &[u8]) -> Result<Vec<FeedArticle>, FeedError> {
    if let Ok(channel) = rss::Channel::read_from(content) {
        return Ok(parse_rss_channel(&channel));
    }

    if let Ok(atom_feed) = atom_syndication::Feed::read_from(content) {
        return Ok(parse_atom_feed(&atom_feed));
    }

    Err(FeedError::ParseError(
        "Body is neither RSS nor Atom".to_string(),
    ))
}

/// Normalize an RSS channel's items
fn parse_rss_channel(channel: &rss::Channel) -> Vec<FeedArticle> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item.title()?.to_string();
            let link = item.link()?.to_string();

            let published_at = item
                .pub_date()
                .and_then(|d| parse_feed_date(d));

            let description_html = item.description().unwrap_or_default();
            let summary = strip_html(description_html);

            // content:encoded carries the full body on feeds that publish it
            let full_content = item
                .content()
                .map(strip_html)
                .filter(|c| !c.is_empty());

            // Thumbnail: enclosure, then media:* extensions, then the first
            // <img> in the description HTML
            let thumbnail = item
                .enclosure()
                .filter(|e| e.mime_type().starts_with("image/"))
                .map(|e| e.url().to_string())
                .or_else(|| extract_media_content(item))
                .or_else(|| extract_image_from_html(description_html));

            let author = item
                .author()
                .or_else(|| item.dublin_core_ext().and_then(|dc| dc.creators().first().map(|s| s.as_str())))
                .map(|s| s.to_string())
                .filter(|s| !s.is_empty());

            let categories = item
                .categories()
                .iter()
                .map(|c| c.name().to_string())
                .collect();

            Some(FeedArticle {
                id: item_id(&link),
                source_host: host_of(&link),
                title,
                link,
                published_at,
                summary,
                full_content,
                thumbnail,
                author,
                categories,
            })
        })
        .collect()
}

/// Normalize an Atom feed's entries
fn parse_atom_feed(atom_feed: &atom_syndication::Feed) -> Vec<FeedArticle> {
    atom_feed
        .entries()
        .iter()
        .filter_map(|entry| {
            let title = entry.title().to_string();
            let link = entry.links().first().map(|l| l.href().to_string())?;

            if link.is_empty() {
                return None;
            }

            let published_at = entry
                .published()
                .or_else(|| Some(entry.updated()))
                .map(|d| d.with_timezone(&Utc));

            let summary_html = entry.summary().map(|s| s.as_str()).unwrap_or_default();
            let content_html = entry.content().and_then(|c| c.value()).unwrap_or_default();

            let summary = if !summary_html.is_empty() {
                strip_html(summary_html)
            } else {
                strip_html(content_html)
            };

            let full_content = if content_html.is_empty() {
                None
            } else {
                Some(strip_html(content_html)).filter(|c| !c.is_empty())
            };

            let thumbnail = extract_image_from_html(content_html)
                .or_else(|| extract_image_from_html(summary_html));

            let author = entry
                .authors()
                .first()
                .map(|a| a.name().to_string())
                .filter(|s| !s.is_empty());

            let categories = entry
                .categories()
                .iter()
                .map(|c| c.term().to_string())
                .collect();

            Some(FeedArticle {
                id: item_id(&link),
                source_host: host_of(&link),
                title,
                link,
                published_at,
                summary,
                full_content,
                thumbnail,
                author,
                categories,
            })
        })
        .collect()
}

/// Generate a stable item id from the article URL
fn item_id(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(&hasher.finalize()[..8])
}

/// Parse the date formats feeds actually use
fn parse_feed_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Hostname of a URL, if it parses
fn host_of(link: &str) -> Option<String> {
    url::Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}

/// Extract image URL from HTML content (finds first <img src="...">)
fn extract_image_from_html(html: &str) -> Option<String> {
    let img_pattern = regex::Regex::new(r#"<img[^>]+src=["']([^"']+)["']"#).ok()?;
    if let Some(caps) = img_pattern.captures(html) {
        let url = caps.get(1)?.as_str().to_string();
        // Skip tiny tracking pixels and icons
        if url.contains("1x1") || url.contains("pixel") || url.contains("spacer") {
            return None;
        }
        return Some(url);
    }
    None
}

/// Extract image from RSS media:content or media:thumbnail extensions
fn extract_media_content(item: &rss::Item) -> Option<String> {
    let extensions = item.extensions();

    if let Some(media) = extensions.get("media") {
        if let Some(content_list) = media.get("content") {
            for content in content_list {
                if let Some(url) = content.attrs().get("url") {
                    let medium = content.attrs().get("medium").map(|s| s.as_str());
                    let mime = content.attrs().get("type").map(|s| s.as_str());

                    if medium == Some("image")
                        || mime.map(|m| m.starts_with("image/")).unwrap_or(false)
                        || url.ends_with(".jpg")
                        || url.ends_with(".jpeg")
                        || url.ends_with(".png")
                        || url.ends_with(".webp")
                    {
                        return Some(url.clone());
                    }
                }
            }
        }

        if let Some(thumbnail_list) = media.get("thumbnail") {
            for thumbnail in thumbnail_list {
                if let Some(url) = thumbnail.attrs().get("url") {
                    return Some(url.clone());
                }
            }
        }
    }

    None
}

/// Strip HTML tags from text
fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::FeedTopic;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Sample Feed</title>
    <link>https://example.com</link>
    <description>test</description>
    <item>
      <title>First story</title>
      <link>https://example.com/2026/08/05/first</link>
      <pubDate>Wed, 05 Aug 2026 10:00:00 GMT</pubDate>
      <description>&lt;p&gt;Summary with &lt;img src="https://cdn.example.com/a.jpg"&gt; markup&lt;/p&gt;</description>
    </item>
    <item>
      <title>No link item</title>
      <description>broken</description>
    </item>
    <item>
      <title>Second story</title>
      <link>https://example.com/second</link>
      <description>Plain summary</description>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Feed</title>
  <id>urn:uuid:feed</id>
  <updated>2026-08-05T10:00:00Z</updated>
  <entry>
    <title>Atom entry</title>
    <id>urn:uuid:entry-1</id>
    <link href="https://example.org/post/1"/>
    <updated>2026-08-05T09:00:00Z</updated>
    <summary>An atom summary</summary>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss_skips_malformed_items() {
        let items = parse_feed(RSS_SAMPLE.as_bytes()).unwrap();

        // The item without a link is dropped, the rest survive
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "First story");
        assert_eq!(items[0].summary, "Summary with markup");
        assert_eq!(
            items[0].thumbnail.as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
        assert!(items[0].published_at.is_some());
        assert_eq!(items[0].source_host.as_deref(), Some("example.com"));
        assert!(items[1].published_at.is_none());
    }

    #[test]
    fn test_parse_atom_fallback() {
        let items = parse_feed(ATOM_SAMPLE.as_bytes()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Atom entry");
        assert_eq!(items[0].link, "https://example.org/post/1");
        assert_eq!(items[0].summary, "An atom summary");
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        assert!(parse_feed(b"not a feed at all").is_err());
    }

    #[test]
    fn test_body_prefers_full_content() {
        let items = parse_feed(RSS_SAMPLE.as_bytes()).unwrap();
        let mut item = items[0].clone();
        assert_eq!(item.body(), item.summary);

        item.full_content = Some("full text".to_string());
        assert_eq!(item.body(), "full text");
    }

    #[test]
    fn test_strip_html() {
        let html = "<p>Hello <b>world</b>!</p>";
        assert_eq!(strip_html(html), "Hello world!");
    }

    #[test]
    fn test_item_id_is_stable() {
        assert_eq!(item_id("https://a.com/1"), item_id("https://a.com/1"));
        assert_ne!(item_id("https://a.com/1"), item_id("https://a.com/2"));
    }

    #[tokio::test]
    async fn test_fetch_many_is_best_effort() {
        let fetcher = FeedFetcher::new();

        // Both feeds are unreachable; the aggregate call must not fail,
        // it just yields nothing.
        let sources = vec![
            FeedSource::new("bad-1", "http://127.0.0.1:1/feed.xml", FeedTopic::General, 5),
            FeedSource::new("bad-2", "http://127.0.0.1:1/other.xml", FeedTopic::General, 5),
        ];

        let items = fetcher.fetch_many(&sources).await;
        assert!(items.is_empty());
    }
}
