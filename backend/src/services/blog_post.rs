//! Blog post management

use crate::error::{is_unique_violation, ApiError};
use crate::repositories::{BlogPostFields, BlogPostRepository};
use meal_planner_shared::validation::REQUIRED_FIELDS;
use meal_planner_shared::{BlogPost, BlogPostRequest};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

fn duplicate_title() -> ApiError {
    ApiError::Conflict("Duplicate blog post title".to_string())
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Blog ID {} not found", id))
}

/// Blog post service
pub struct BlogPostService;

impl BlogPostService {
    /// Validate a request into storable fields
    pub fn fields(req: BlogPostRequest) -> Result<BlogPostFields, ApiError> {
        req.validate()?;
        let fields = BlogPostFields {
            title: req.title.trim().to_string(),
            author: req.author.trim().to_string(),
            content: req.content,
            tags: req
                .tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        };

        if fields.title.is_empty() || fields.author.is_empty() || fields.content.trim().is_empty() {
            return Err(ApiError::Validation(REQUIRED_FIELDS.to_string()));
        }
        Ok(fields)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<BlogPost>, ApiError> {
        let posts = BlogPostRepository::list(pool).await?;
        Ok(posts.into_iter().map(BlogPost::from).collect())
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<BlogPost, ApiError> {
        BlogPostRepository::find_by_id(pool, id)
            .await?
            .map(BlogPost::from)
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(pool: &PgPool, fields: BlogPostFields) -> Result<BlogPost, ApiError> {
        if BlogPostRepository::find_by_title(pool, &fields.title).await?.is_some() {
            return Err(duplicate_title());
        }

        let record = BlogPostRepository::create(pool, &fields).await.map_err(|e| {
            if is_unique_violation(&e) {
                duplicate_title()
            } else {
                ApiError::Internal(e)
            }
        })?;

        info!(blog_post_id = %record.id, title = %record.title, "Blog post created");
        Ok(record.into())
    }

    /// Replace every field of a post
    pub async fn update(pool: &PgPool, id: Uuid, fields: BlogPostFields) -> Result<BlogPost, ApiError> {
        if let Some(existing) = BlogPostRepository::find_by_title(pool, &fields.title).await? {
            if existing.id != id {
                return Err(duplicate_title());
            }
        }

        let record = BlogPostRepository::update(pool, id, &fields)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    duplicate_title()
                } else {
                    ApiError::Internal(e)
                }
            })?
            .ok_or_else(|| not_found(id))?;

        info!(blog_post_id = %id, "Blog post updated");
        Ok(record.into())
    }

    /// Delete a post, returning it
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<BlogPost, ApiError> {
        let record = BlogPostRepository::delete(pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;

        info!(blog_post_id = %id, "Blog post deleted");
        Ok(record.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_trim_and_drop_empty_tags() {
        let fields = BlogPostService::fields(BlogPostRequest {
            title: "  Meal prep 101 ".to_string(),
            author: "Sam".to_string(),
            content: "Cook once, eat all week.".to_string(),
            tags: vec!["prep".to_string(), "  ".to_string(), " budget ".to_string()],
        })
        .unwrap();

        assert_eq!(fields.title, "Meal prep 101");
        assert_eq!(fields.tags, vec!["prep".to_string(), "budget".to_string()]);
    }

    #[test]
    fn test_blank_title_is_missing() {
        let err = BlogPostService::fields(BlogPostRequest {
            title: "   ".to_string(),
            author: "Sam".to_string(),
            content: "Body".to_string(),
            tags: vec![],
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(msg) if msg == REQUIRED_FIELDS));
    }

    #[test]
    fn test_fields_require_content() {
        let err = BlogPostService::fields(BlogPostRequest {
            title: "Title".to_string(),
            author: "Sam".to_string(),
            content: String::new(),
            tags: vec![],
        })
        .unwrap_err();

        match err {
            ApiError::Validation(msg) => assert_eq!(msg, "All fields are required"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
