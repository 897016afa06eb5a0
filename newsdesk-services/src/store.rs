//! Article and Instagram post storage
//!
//! SQLite-backed persistence for the pipeline. Both deduplication gates are
//! atomic conditional inserts against UNIQUE constraints, and article status
//! updates are forward-only at the SQL level, so concurrent pipeline runs
//! cannot duplicate rows or regress a lifecycle.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use newsdesk_core::{
    Article, ArticleStatus, Category, ClassificationResult, InstagramPost, NewArticle,
    PostStatus, Sentiment,
};
use newsdesk_ai::InstagramContent;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

/// Errors that can occur during storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to acquire lock")]
    LockError,
}

/// SQLite storage for articles, posts and prompt templates
pub struct ArticleStore {
    conn: Mutex<Connection>,
}

/// SQL expression mapping a status string to its lifecycle rank
const STATUS_RANK_SQL: &str =
    "CASE status WHEN 'pending' THEN 0 WHEN 'classified' THEN 1 WHEN 'generated' THEN 2 WHEN 'posted' THEN 3 END";

impl ArticleStore {
    /// Open (or create) the database at `db_path`.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("Failed to create database directory: {}", e)))?;
        }

        let conn = Connection::open(&db_path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;

        info!("Initialized article store at: {}", db_path.as_ref().display());
        Ok(store)
    }

    /// Create an in-memory store (useful for testing)
    pub fn new_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                content TEXT,
                excerpt TEXT,
                thumbnail_url TEXT,
                author TEXT,
                source TEXT,
                published_at INTEGER,
                status TEXT NOT NULL DEFAULT 'pending',
                category TEXT,
                subcategory TEXT,
                sentiment TEXT,
                keywords TEXT,
                relevance_score INTEGER,
                created_at INTEGER DEFAULT (strftime('%s', 'now'))
            );

            CREATE INDEX IF NOT EXISTS idx_articles_status
            ON articles(status, created_at DESC);

            CREATE TABLE IF NOT EXISTS instagram_posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                article_id INTEGER NOT NULL UNIQUE REFERENCES articles(id),
                generated_title TEXT NOT NULL,
                caption TEXT NOT NULL,
                full_caption TEXT NOT NULL,
                hashtags TEXT,
                alt_text TEXT NOT NULL,
                image_url TEXT,
                status TEXT NOT NULL DEFAULT 'draft',
                created_at INTEGER DEFAULT (strftime('%s', 'now'))
            );

            CREATE TABLE IF NOT EXISTS prompt_templates (
                user_id TEXT NOT NULL,
                category TEXT NOT NULL,
                system_prompt TEXT NOT NULL,
                updated_at INTEGER DEFAULT (strftime('%s', 'now')),
                UNIQUE(user_id, category)
            );
            "#,
        )?;

        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockError)
    }

    // ------------------------------------------------------------------
    // Articles
    // ------------------------------------------------------------------

    /// Insert a freshly ingested article unless its URL is already stored.
    ///
    /// The dedup gate: a single conditional insert against the UNIQUE url
    /// constraint. Returns the new row id, or `None` when the URL was
    /// already present (a normal skip, not an error).
    pub fn insert_article(&self, article: &NewArticle) -> Result<Option<i64>, StoreError> {
        let conn = self.lock()?;

        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO articles
                (url, title, content, excerpt, thumbnail_url, author, source, published_at, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'pending')
            "#,
            params![
                article.url,
                article.title,
                article.content,
                article.excerpt,
                article.thumbnail_url,
                article.author,
                article.source,
                article.published_at.map(|d| d.timestamp()),
            ],
        )?;

        if inserted == 0 {
            Ok(None)
        } else {
            Ok(Some(conn.last_insert_rowid()))
        }
    }

    /// Whether an article with this canonical URL is already stored.
    ///
    /// Cheap pre-check used to skip scraping work; the insert above remains
    /// the authoritative gate.
    pub fn article_exists(&self, url: &str) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM articles WHERE url = ?1)",
            params![url],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn get_article(&self, id: i64) -> Result<Option<Article>, StoreError> {
        let conn = self.lock()?;
        let article = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_ARTICLE),
                params![id],
                row_to_article,
            )
            .optional()?;
        Ok(article)
    }

    pub fn get_article_by_url(&self, url: &str) -> Result<Option<Article>, StoreError> {
        let conn = self.lock()?;
        let article = conn
            .query_row(
                &format!("{} WHERE url = ?1", SELECT_ARTICLE),
                params![url],
                row_to_article,
            )
            .optional()?;
        Ok(article)
    }

    /// List articles, optionally filtered by status, newest first.
    pub fn list_articles(
        &self,
        status: Option<ArticleStatus>,
        limit: usize,
    ) -> Result<Vec<Article>, StoreError> {
        let conn = self.lock()?;

        let mut articles = Vec::new();
        match status {
            Some(status) => {
                let mut stmt = conn.prepare(&format!(
                    "{} WHERE status = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
                    SELECT_ARTICLE
                ))?;
                let rows = stmt.query_map(params![status.as_str(), limit as i64], row_to_article)?;
                for row in rows {
                    articles.push(row?);
                }
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "{} ORDER BY created_at DESC, id DESC LIMIT ?1",
                    SELECT_ARTICLE
                ))?;
                let rows = stmt.query_map(params![limit as i64], row_to_article)?;
                for row in rows {
                    articles.push(row?);
                }
            }
        }

        Ok(articles)
    }

    /// Classified articles relevant enough for content generation.
    pub fn classified_for_generation(
        &self,
        min_relevance: u8,
        limit: usize,
    ) -> Result<Vec<Article>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "{} WHERE status = 'classified' AND relevance_score >= ?1
             ORDER BY relevance_score DESC, created_at DESC LIMIT ?2",
            SELECT_ARTICLE
        ))?;
        let rows = stmt.query_map(params![min_relevance as i64, limit as i64], row_to_article)?;

        let mut articles = Vec::new();
        for row in rows {
            articles.push(row?);
        }
        Ok(articles)
    }

    /// Flatten a classification onto an article row.
    ///
    /// Advances `pending` rows to `classified`; rows further along keep
    /// their status (the lifecycle never regresses). Returns whether the
    /// row existed.
    pub fn apply_classification(
        &self,
        id: i64,
        classification: &ClassificationResult,
    ) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let keywords = serde_json::to_string(&classification.keywords)?;

        let updated = conn.execute(
            r#"
            UPDATE articles
            SET category = ?1,
                subcategory = ?2,
                sentiment = ?3,
                keywords = ?4,
                relevance_score = ?5,
                status = CASE WHEN status = 'pending' THEN 'classified' ELSE status END
            WHERE id = ?6
            "#,
            params![
                classification.category.as_str(),
                classification.subcategory,
                classification.sentiment.as_str(),
                keywords,
                classification.relevance_score as i64,
                id,
            ],
        )?;

        Ok(updated > 0)
    }

    /// Advance an article's status, forward only.
    ///
    /// Returns whether the row moved; a regressing or same-status request is
    /// a no-op, never an error.
    pub fn advance_status(&self, id: i64, next: ArticleStatus) -> Result<bool, StoreError> {
        let conn = self.lock()?;

        let updated = conn.execute(
            &format!(
                "UPDATE articles SET status = ?1 WHERE id = ?2 AND {} < ?3",
                STATUS_RANK_SQL
            ),
            params![next.as_str(), id, next.rank() as i64],
        )?;

        Ok(updated > 0)
    }

    /// Article counts per status, for the health endpoint.
    pub fn article_counts(&self) -> Result<Vec<(String, i64)>, StoreError> {
        let conn = self.lock()?;

        let mut stmt =
            conn.prepare("SELECT status, COUNT(*) FROM articles GROUP BY status")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }

    // ------------------------------------------------------------------
    // Instagram posts
    // ------------------------------------------------------------------

    /// Insert a generated post unless the article already has one.
    ///
    /// Same atomic gate as articles, keyed on the UNIQUE article_id.
    pub fn insert_post(
        &self,
        article_id: i64,
        content: &InstagramContent,
        image_url: Option<&str>,
    ) -> Result<Option<i64>, StoreError> {
        let conn = self.lock()?;
        let hashtags = serde_json::to_string(&content.hashtags)?;

        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO instagram_posts
                (article_id, generated_title, caption, full_caption, hashtags, alt_text, image_url, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'draft')
            "#,
            params![
                article_id,
                content.title,
                content.caption,
                content.full_caption,
                hashtags,
                content.alt_text,
                image_url,
            ],
        )?;

        if inserted == 0 {
            Ok(None)
        } else {
            Ok(Some(conn.last_insert_rowid()))
        }
    }

    pub fn has_post_for(&self, article_id: i64) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM instagram_posts WHERE article_id = ?1)",
            params![article_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn get_post(&self, id: i64) -> Result<Option<InstagramPost>, StoreError> {
        let conn = self.lock()?;
        let post = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_POST),
                params![id],
                row_to_post,
            )
            .optional()?;
        Ok(post)
    }

    pub fn list_posts(&self, limit: usize) -> Result<Vec<InstagramPost>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY created_at DESC, id DESC LIMIT ?1",
            SELECT_POST
        ))?;
        let rows = stmt.query_map(params![limit as i64], row_to_post)?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row?);
        }
        Ok(posts)
    }

    /// Dashboard status edit (draft/scheduled/posted).
    pub fn update_post_status(&self, id: i64, status: PostStatus) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE instagram_posts SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        Ok(updated > 0)
    }

    // ------------------------------------------------------------------
    // Prompt templates
    // ------------------------------------------------------------------

    /// Store a per-category system prompt for a user, replacing any previous
    /// value.
    pub fn upsert_prompt(
        &self,
        user_id: &str,
        category: &str,
        system_prompt: &str,
    ) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO prompt_templates (user_id, category, system_prompt)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id, category) DO UPDATE SET
                system_prompt = excluded.system_prompt,
                updated_at = strftime('%s', 'now')
            "#,
            params![user_id, category, system_prompt],
        )?;
        Ok(())
    }

    pub fn get_prompt(&self, user_id: &str, category: &str) -> Result<Option<String>, StoreError> {
        let conn = self.lock()?;
        let prompt = conn
            .query_row(
                "SELECT system_prompt FROM prompt_templates WHERE user_id = ?1 AND category = ?2",
                params![user_id, category],
                |row| row.get(0),
            )
            .optional()?;
        Ok(prompt)
    }
}

const SELECT_ARTICLE: &str = "SELECT id, url, title, content, excerpt, thumbnail_url, author, \
source, published_at, status, category, subcategory, sentiment, keywords, relevance_score, \
created_at FROM articles";

const SELECT_POST: &str = "SELECT id, article_id, generated_title, caption, full_caption, \
hashtags, alt_text, image_url, status, created_at FROM instagram_posts";

fn row_to_article(row: &Row<'_>) -> rusqlite::Result<Article> {
    let published_at: Option<i64> = row.get(8)?;
    let status: String = row.get(9)?;
    let category: Option<String> = row.get(10)?;
    let sentiment: Option<String> = row.get(12)?;
    let keywords: Option<String> = row.get(13)?;
    let relevance_score: Option<i64> = row.get(14)?;
    let created_at: i64 = row.get(15)?;

    Ok(Article {
        id: row.get(0)?,
        url: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        excerpt: row.get(4)?,
        thumbnail_url: row.get(5)?,
        author: row.get(6)?,
        source: row.get(7)?,
        published_at: published_at.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        status: ArticleStatus::parse(&status).unwrap_or(ArticleStatus::Pending),
        category: category.as_deref().and_then(Category::parse),
        subcategory: row.get(11)?,
        sentiment: sentiment.as_deref().and_then(Sentiment::parse),
        keywords: keywords
            .as_deref()
            .and_then(|k| serde_json::from_str(k).ok())
            .unwrap_or_default(),
        relevance_score: relevance_score.map(|s| s.clamp(0, 10) as u8),
        created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_else(Utc::now),
    })
}

fn row_to_post(row: &Row<'_>) -> rusqlite::Result<InstagramPost> {
    let hashtags: Option<String> = row.get(5)?;
    let status: String = row.get(8)?;
    let created_at: i64 = row.get(9)?;

    Ok(InstagramPost {
        id: row.get(0)?,
        article_id: row.get(1)?,
        generated_title: row.get(2)?,
        caption: row.get(3)?,
        full_caption: row.get(4)?,
        hashtags: hashtags
            .as_deref()
            .and_then(|h| serde_json::from_str(h).ok())
            .unwrap_or_default(),
        alt_text: row.get(6)?,
        image_url: row.get(7)?,
        status: PostStatus::parse(&status).unwrap_or(PostStatus::Draft),
        created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_else(Utc::now),
    })
}

#[cfg(test)]
mod tests {
    use newsdesk_core::Sentiment;

    use super::*;

    fn sample_article(url: &str) -> NewArticle {
        NewArticle {
            url: url.to_string(),
            title: "X".to_string(),
            content: Some("body text".repeat(50)),
            excerpt: Some("body text".to_string()),
            thumbnail_url: None,
            author: Some("Reporter".to_string()),
            source: Some("a.com".to_string()),
            published_at: Some(Utc::now()),
        }
    }

    fn sample_classification() -> ClassificationResult {
        ClassificationResult {
            category: Category::Technology,
            subcategory: "AI".to_string(),
            sentiment: Sentiment::Neutral,
            keywords: vec!["x".to_string()],
            relevance_score: 7,
        }
    }

    fn sample_content() -> InstagramContent {
        InstagramContent {
            title: "Big News".to_string(),
            caption: "short".to_string(),
            full_caption: "long".to_string(),
            hashtags: vec!["TechNews".to_string()],
            alt_text: "alt".to_string(),
            emoji: "🚀".to_string(),
        }
    }

    #[test]
    fn test_insert_article_dedupes_by_url() {
        let store = ArticleStore::new_in_memory().unwrap();

        let first = store.insert_article(&sample_article("https://a.com/1")).unwrap();
        assert!(first.is_some());

        // Same canonical URL: a normal skip, exactly one row remains
        let second = store.insert_article(&sample_article("https://a.com/1")).unwrap();
        assert!(second.is_none());

        let all = store.list_articles(None, 10).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, ArticleStatus::Pending);
    }

    #[test]
    fn test_classification_flattens_and_advances() {
        let store = ArticleStore::new_in_memory().unwrap();
        let id = store
            .insert_article(&sample_article("https://a.com/1"))
            .unwrap()
            .unwrap();

        assert!(store.apply_classification(id, &sample_classification()).unwrap());

        let article = store.get_article(id).unwrap().unwrap();
        assert_eq!(article.status, ArticleStatus::Classified);
        assert_eq!(article.category, Some(Category::Technology));
        assert_eq!(article.subcategory.as_deref(), Some("AI"));
        assert_eq!(article.sentiment, Some(Sentiment::Neutral));
        assert_eq!(article.keywords, vec!["x"]);
        assert_eq!(article.relevance_score, Some(7));
    }

    #[test]
    fn test_status_never_regresses() {
        let store = ArticleStore::new_in_memory().unwrap();
        let id = store
            .insert_article(&sample_article("https://a.com/1"))
            .unwrap()
            .unwrap();

        assert!(store.advance_status(id, ArticleStatus::Generated).unwrap());
        // Backwards move is a no-op
        assert!(!store.advance_status(id, ArticleStatus::Classified).unwrap());
        assert!(!store.advance_status(id, ArticleStatus::Generated).unwrap());

        // Re-classifying keeps the later status
        assert!(store.apply_classification(id, &sample_classification()).unwrap());
        let article = store.get_article(id).unwrap().unwrap();
        assert_eq!(article.status, ArticleStatus::Generated);

        assert!(store.advance_status(id, ArticleStatus::Posted).unwrap());
    }

    #[test]
    fn test_at_most_one_post_per_article() {
        let store = ArticleStore::new_in_memory().unwrap();
        let id = store
            .insert_article(&sample_article("https://a.com/1"))
            .unwrap()
            .unwrap();

        let first = store.insert_post(id, &sample_content(), Some("img.jpg")).unwrap();
        assert!(first.is_some());
        assert!(store.has_post_for(id).unwrap());

        let second = store.insert_post(id, &sample_content(), None).unwrap();
        assert!(second.is_none());

        assert_eq!(store.list_posts(10).unwrap().len(), 1);
    }

    #[test]
    fn test_classified_for_generation_filters_relevance() {
        let store = ArticleStore::new_in_memory().unwrap();

        for (i, score) in [3u8, 6, 9].iter().enumerate() {
            let id = store
                .insert_article(&sample_article(&format!("https://a.com/{}", i)))
                .unwrap()
                .unwrap();
            let mut classification = sample_classification();
            classification.relevance_score = *score;
            store.apply_classification(id, &classification).unwrap();
        }

        let ready = store.classified_for_generation(6, 20).unwrap();
        assert_eq!(ready.len(), 2);
        assert!(ready.iter().all(|a| a.relevance_score.unwrap() >= 6));
        // Highest relevance first
        assert_eq!(ready[0].relevance_score, Some(9));
    }

    #[test]
    fn test_post_status_update() {
        let store = ArticleStore::new_in_memory().unwrap();
        let id = store
            .insert_article(&sample_article("https://a.com/1"))
            .unwrap()
            .unwrap();
        let post_id = store
            .insert_post(id, &sample_content(), None)
            .unwrap()
            .unwrap();

        assert!(store.update_post_status(post_id, PostStatus::Scheduled).unwrap());
        let post = store.get_post(post_id).unwrap().unwrap();
        assert_eq!(post.status, PostStatus::Scheduled);

        assert!(!store.update_post_status(999, PostStatus::Posted).unwrap());
    }

    #[test]
    fn test_prompt_upsert_replaces() {
        let store = ArticleStore::new_in_memory().unwrap();

        assert_eq!(store.get_prompt("u1", "technology").unwrap(), None);

        store.upsert_prompt("u1", "technology", "first").unwrap();
        store.upsert_prompt("u1", "technology", "second").unwrap();
        store.upsert_prompt("u2", "technology", "other user").unwrap();

        assert_eq!(
            store.get_prompt("u1", "technology").unwrap().as_deref(),
            Some("second")
        );
        assert_eq!(
            store.get_prompt("u2", "technology").unwrap().as_deref(),
            Some("other user")
        );
    }

    #[test]
    fn test_article_counts_by_status() {
        let store = ArticleStore::new_in_memory().unwrap();

        for i in 0..3 {
            store
                .insert_article(&sample_article(&format!("https://a.com/{}", i)))
                .unwrap();
        }
        let classified = store.get_article_by_url("https://a.com/0").unwrap().unwrap();
        store
            .apply_classification(classified.id, &sample_classification())
            .unwrap();

        let counts = store.article_counts().unwrap();
        assert!(counts.contains(&("pending".to_string(), 2)));
        assert!(counts.contains(&("classified".to_string(), 1)));
    }
}
