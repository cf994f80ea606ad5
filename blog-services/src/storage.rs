//! Blog storage
//!
//! SQLite-backed persistence for published posts and the broker directory
//! used to pick review subjects.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use uuid::Uuid;

use blog_core::{BrokerData, GeneratedBlogContent};

/// A post as stored and served back to readers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub published_at: DateTime<Utc>,
    pub reading_time: u32,
    pub tags: Vec<String>,
    pub image_url: String,
    pub seo_title: String,
    pub seo_description: String,
    pub key_takeaways: Vec<String>,
    pub content_type: String,
    pub published: bool,
}

/// Post storage service using SQLite
pub struct BlogStorage {
    conn: Mutex<Connection>,
}

const POST_COLUMNS: &str = "id, title, slug, content, excerpt, published_at, reading_time, tags, \
     image_url, seo_title, seo_description, key_takeaways, content_type, published";

impl BlogStorage {
    /// Open (or create) the database file and its tables
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StorageError> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Io(format!("Failed to create database directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_schema()?;

        Ok(storage)
    }

    /// In-memory database for tests
    pub fn new_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_schema()?;

        Ok(storage)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockError)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS blog_posts (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                content TEXT NOT NULL,
                excerpt TEXT NOT NULL,
                published_at TEXT NOT NULL,
                reading_time INTEGER NOT NULL,
                tags TEXT NOT NULL,
                image_url TEXT NOT NULL,
                seo_title TEXT NOT NULL,
                seo_description TEXT NOT NULL,
                key_takeaways TEXT NOT NULL,
                content_type TEXT NOT NULL,
                published INTEGER NOT NULL DEFAULT 1
            );

            CREATE INDEX IF NOT EXISTS idx_blog_posts_published_at
            ON blog_posts(published_at);

            CREATE TABLE IF NOT EXISTS brokers (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                rating REAL,
                regulation TEXT,
                min_deposit REAL,
                spreads TEXT,
                platforms TEXT NOT NULL DEFAULT '[]',
                website_url TEXT
            );
            "#,
        )?;

        Ok(())
    }

    pub fn slug_exists(&self, slug: &str) -> Result<bool, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockError)?;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM blog_posts WHERE slug = ?1)",
            params![slug],
            |row| row.get(0),
        )?;

        Ok(exists)
    }

    /// Store a generated article as a published post
    pub fn insert_post(
        &self,
        post: &GeneratedBlogContent,
        content_type: &str,
    ) -> Result<StoredPost, StorageError> {
        let stored = StoredPost {
            id: Uuid::new_v4().to_string(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            published_at: Utc::now(),
            reading_time: post.reading_time,
            tags: post.tags.clone(),
            image_url: post.featured_image.clone(),
            seo_title: post.seo_title.clone(),
            seo_description: post.seo_description.clone(),
            key_takeaways: post.key_takeaways.clone(),
            content_type: content_type.to_string(),
            published: true,
        };

        let conn = self.conn.lock().map_err(|_| StorageError::LockError)?;
        conn.execute(
            &format!(
                "INSERT INTO blog_posts ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                POST_COLUMNS
            ),
            params![
                stored.id,
                stored.title,
                stored.slug,
                stored.content,
                stored.excerpt,
                stored.published_at.to_rfc3339(),
                stored.reading_time,
                serde_json::to_string(&stored.tags)?,
                stored.image_url,
                stored.seo_title,
                stored.seo_description,
                serde_json::to_string(&stored.key_takeaways)?,
                stored.content_type,
                stored.published,
            ],
        )?;

        Ok(stored)
    }

    pub fn get_post_by_slug(&self, slug: &str) -> Result<Option<StoredPost>, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockError)?;

        let post = conn
            .query_row(
                &format!("SELECT {} FROM blog_posts WHERE slug = ?1", POST_COLUMNS),
                params![slug],
                post_from_row,
            )
            .optional()?;

        Ok(post)
    }

    /// Newest posts first
    pub fn list_posts(&self, limit: usize) -> Result<Vec<StoredPost>, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockError)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM blog_posts WHERE published = 1 ORDER BY published_at DESC LIMIT ?1",
            POST_COLUMNS
        ))?;
        let posts = stmt
            .query_map(params![limit as i64], post_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    pub fn post_count(&self) -> Result<usize, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockError)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM blog_posts", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn upsert_broker(&self, broker: &BrokerData) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockError)?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO brokers
                (id, name, description, rating, regulation, min_deposit, spreads, platforms, website_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                broker.id,
                broker.name,
                broker.description,
                broker.rating,
                broker.regulation,
                broker.min_deposit,
                broker.spreads,
                serde_json::to_string(&broker.platforms)?,
                broker.website_url,
            ],
        )?;

        Ok(())
    }

    /// Highest-rated brokers first; unrated brokers sort last
    pub fn top_brokers(&self, limit: usize) -> Result<Vec<BrokerData>, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockError)?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, description, rating, regulation, min_deposit, spreads, platforms, website_url
            FROM brokers
            ORDER BY rating IS NULL, rating DESC, name ASC
            LIMIT ?1
            "#,
        )?;

        let brokers = stmt
            .query_map(params![limit as i64], |row| {
                let platforms: String = row.get(7)?;
                Ok(BrokerData {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    rating: row.get(3)?,
                    regulation: row.get(4)?,
                    min_deposit: row.get(5)?,
                    spreads: row.get(6)?,
                    platforms: serde_json::from_str(&platforms).unwrap_or_default(),
                    website_url: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(brokers)
    }
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<StoredPost> {
    let published_at: String = row.get(5)?;
    let tags: String = row.get(7)?;
    let key_takeaways: String = row.get(11)?;

    Ok(StoredPost {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        content: row.get(3)?,
        excerpt: row.get(4)?,
        published_at: DateTime::parse_from_rfc3339(&published_at)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        reading_time: row.get(6)?,
        tags: serde_json::from_str(&tags).unwrap_or_default(),
        image_url: row.get(8)?,
        seo_title: row.get(9)?,
        seo_description: row.get(10)?,
        key_takeaways: serde_json::from_str(&key_takeaways).unwrap_or_default(),
        content_type: row.get(12)?,
        published: row.get(13)?,
    })
}

/// Errors that can occur during storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to acquire lock")]
    LockError,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, slug: &str) -> GeneratedBlogContent {
        GeneratedBlogContent {
            title: title.to_string(),
            slug: slug.to_string(),
            content: "## Intro\n\nBody".to_string(),
            excerpt: "Intro Body...".to_string(),
            seo_title: title.to_string(),
            seo_description: "Intro Body...".to_string(),
            reading_time: 3,
            tags: vec!["forex".to_string(), "broker-review".to_string()],
            featured_image: "/images/blog/default-forex.jpg".to_string(),
            key_takeaways: vec!["Regulated".to_string()],
        }
    }

    fn broker(id: &str, name: &str, rating: Option<f64>) -> BrokerData {
        let mut broker = BrokerData::new(id, name);
        broker.rating = rating;
        broker.platforms = vec!["MT4".to_string()];
        broker
    }

    #[test]
    fn test_insert_and_fetch_post() {
        let storage = BlogStorage::new_in_memory().unwrap();
        let stored = storage
            .insert_post(&article("Acme FX Review", "acme-fx-review"), "broker-review")
            .unwrap();

        assert!(storage.slug_exists("acme-fx-review").unwrap());
        assert!(!storage.slug_exists("missing").unwrap());

        let fetched = storage.get_post_by_slug("acme-fx-review").unwrap().unwrap();
        assert_eq!(fetched.id, stored.id);
        assert_eq!(fetched.tags, vec!["forex", "broker-review"]);
        assert_eq!(fetched.content_type, "broker-review");
        assert!(fetched.published);
        assert!(storage.get_post_by_slug("missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_slug_is_rejected() {
        let storage = BlogStorage::new_in_memory().unwrap();
        storage.insert_post(&article("A", "same"), "forex-guide").unwrap();
        let second = storage.insert_post(&article("B", "same"), "forex-guide");
        assert!(matches!(second, Err(StorageError::Database(_))));
        assert_eq!(storage.post_count().unwrap(), 1);
    }

    #[test]
    fn test_list_posts_limit() {
        let storage = BlogStorage::new_in_memory().unwrap();
        for i in 0..3 {
            storage
                .insert_post(&article(&format!("Post {}", i), &format!("post-{}", i)), "etf-guide")
                .unwrap();
        }
        assert_eq!(storage.list_posts(2).unwrap().len(), 2);
        assert_eq!(storage.list_posts(10).unwrap().len(), 3);
    }

    #[test]
    fn test_top_brokers_by_rating() {
        let storage = BlogStorage::new_in_memory().unwrap();
        storage.upsert_broker(&broker("1", "Low", Some(3.1))).unwrap();
        storage.upsert_broker(&broker("2", "Unrated", None)).unwrap();
        storage.upsert_broker(&broker("3", "High", Some(4.8))).unwrap();
        storage.upsert_broker(&broker("1", "Low Updated", Some(3.5))).unwrap();

        let brokers = storage.top_brokers(10).unwrap();
        let names: Vec<&str> = brokers.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Low Updated", "Unrated"]);
        assert_eq!(brokers[0].platforms, vec!["MT4"]);

        assert_eq!(storage.top_brokers(1).unwrap().len(), 1);
    }
}
