//! Blog post repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use meal_planner_shared::BlogPost;
use sqlx::PgPool;
use uuid::Uuid;

const BLOG_POST_COLUMNS: &str = "id, title, author, content, tags, created_at, updated_at";

/// Blog post record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlogPostRecord {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BlogPostRecord> for BlogPost {
    fn from(record: BlogPostRecord) -> Self {
        BlogPost {
            id: record.id,
            title: record.title,
            author: record.author,
            content: record.content,
            tags: record.tags,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Blog post fields written on create and replace
#[derive(Debug, Clone)]
pub struct BlogPostFields {
    pub title: String,
    pub author: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Blog post repository
pub struct BlogPostRepository;

impl BlogPostRepository {
    pub async fn create(pool: &PgPool, fields: &BlogPostFields) -> Result<BlogPostRecord> {
        let record = sqlx::query_as::<_, BlogPostRecord>(&format!(
            r#"
            INSERT INTO blog_posts (title, author, content, tags)
            VALUES ($1, $2, $3, $4)
            RETURNING {BLOG_POST_COLUMNS}
            "#
        ))
        .bind(&fields.title)
        .bind(&fields.author)
        .bind(&fields.content)
        .bind(&fields.tags)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<BlogPostRecord>> {
        let records = sqlx::query_as::<_, BlogPostRecord>(&format!(
            "SELECT {BLOG_POST_COLUMNS} FROM blog_posts ORDER BY created_at DESC, id"
        ))
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<BlogPostRecord>> {
        let record = sqlx::query_as::<_, BlogPostRecord>(&format!(
            "SELECT {BLOG_POST_COLUMNS} FROM blog_posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn find_by_title(pool: &PgPool, title: &str) -> Result<Option<BlogPostRecord>> {
        let record = sqlx::query_as::<_, BlogPostRecord>(&format!(
            "SELECT {BLOG_POST_COLUMNS} FROM blog_posts WHERE title = $1"
        ))
        .bind(title)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn update(pool: &PgPool, id: Uuid, fields: &BlogPostFields) -> Result<Option<BlogPostRecord>> {
        let record = sqlx::query_as::<_, BlogPostRecord>(&format!(
            r#"
            UPDATE blog_posts SET
                title = $2,
                author = $3,
                content = $4,
                tags = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BLOG_POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.author)
        .bind(&fields.content)
        .bind(&fields.tags)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<BlogPostRecord>> {
        let record = sqlx::query_as::<_, BlogPostRecord>(&format!(
            "DELETE FROM blog_posts WHERE id = $1 RETURNING {BLOG_POST_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}
