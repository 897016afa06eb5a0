//! End-to-end persistence flow, no network: a parsed feed item becomes a
//! pending row, then a stubbed classification advances it.

use newsdesk_core::{
    ArticleStatus, Category, ClassificationResult, NewArticle, Sentiment,
};
use newsdesk_feeds::parse_feed;
use newsdesk_services::ArticleStore;

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Wire</title>
    <link>https://a.com</link>
    <description>test</description>
    <item>
      <title>X</title>
      <link>https://a.com/1</link>
      <pubDate>Wed, 05 Aug 2026 09:00:00 GMT</pubDate>
      <description>Short feed summary</description>
    </item>
  </channel>
</rss>"#;

#[test]
fn feed_item_flows_to_classified_row() {
    let store = ArticleStore::new_in_memory().unwrap();

    // Ingest: one fresh feed item, extraction produced 1200 chars of content
    let items = parse_feed(FEED.as_bytes()).unwrap();
    assert_eq!(items.len(), 1);
    let item = &items[0];

    let content: String = "a".repeat(1200);
    let excerpt: String = content.chars().take(300).collect();

    let new_article = NewArticle {
        url: item.link.clone(),
        title: item.title.clone(),
        content: Some(content),
        excerpt: Some(excerpt),
        thumbnail_url: item.thumbnail.clone(),
        author: item.author.clone(),
        source: item.source_host.clone(),
        published_at: item.published_at,
    };

    let id = store.insert_article(&new_article).unwrap().unwrap();

    let stored = store.get_article(id).unwrap().unwrap();
    assert_eq!(stored.title, "X");
    assert_eq!(stored.url, "https://a.com/1");
    assert_eq!(stored.status, ArticleStatus::Pending);
    assert_eq!(stored.content.as_ref().unwrap().len(), 1200);
    assert_eq!(stored.excerpt.as_ref().unwrap().len(), 300);
    assert!(stored.published_at.is_some());

    // Feeding the same URL through again changes nothing
    assert!(store.insert_article(&new_article).unwrap().is_none());
    assert_eq!(store.list_articles(None, 10).unwrap().len(), 1);

    // Classify with a stubbed LLM result
    let classification = ClassificationResult {
        category: Category::Technology,
        subcategory: "AI".to_string(),
        sentiment: Sentiment::Neutral,
        keywords: vec!["x".to_string()],
        relevance_score: 7,
    };
    assert!(store.apply_classification(id, &classification).unwrap());

    let classified = store.get_article(id).unwrap().unwrap();
    assert_eq!(classified.status, ArticleStatus::Classified);
    assert_eq!(classified.category, Some(Category::Technology));
    assert_eq!(classified.subcategory.as_deref(), Some("AI"));
    assert_eq!(classified.sentiment, Some(Sentiment::Neutral));
    assert_eq!(classified.keywords, vec!["x"]);
    assert_eq!(classified.relevance_score, Some(7));
}
