use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{self, types::Json, PgPool};
use uuid::Uuid;

use crate::{
    entities::{blog_post::{BlogPost, BlogPostRow}, tag::TagCount},
    errors::AppError,
    repositories::sqlx_repo::SqlxBlogPostRepo,
};

/// Which engagement counter to bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Views,
    Likes,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    /// All posts, drafts included, in insertion order.
    async fn list_posts(&self) -> Result<Vec<BlogPost>, AppError>;
    async fn get_post(&self, id: &Uuid) -> Result<BlogPost, AppError>;
    async fn get_post_by_slug(&self, slug: &str) -> Result<BlogPost, AppError>;
    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError>;
    async fn insert_post(&self, post: &BlogPost) -> Result<(), AppError>;
    async fn update_post(&self, post: &BlogPost) -> Result<(), AppError>;
    async fn delete_post(&self, id: &Uuid) -> Result<(), AppError>;
    /// Atomically increments a counter on a published post.
    async fn increment(&self, id: &Uuid, counter: Counter) -> Result<BlogPost, AppError>;
    /// Tag usage across published posts, most used first.
    async fn tag_counts(&self, limit: usize) -> Result<Vec<TagCount>, AppError>;
}

pub type DynBlogPostRepo = Arc<dyn BlogPostRepository>;

#[async_trait]
impl<T> BlogPostRepository for Arc<T>
where
    T: BlogPostRepository + ?Sized,
{
    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>, AppError> {
        (**self).list_posts().await
    }

    async fn get_post(&self, id: &Uuid) -> Result<BlogPost, AppError> {
        (**self).get_post(id).await
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<BlogPost, AppError> {
        (**self).get_post_by_slug(slug).await
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        (**self).slug_exists(slug, exclude_id).await
    }

    async fn insert_post(&self, post: &BlogPost) -> Result<(), AppError> {
        (**self).insert_post(post).await
    }

    async fn update_post(&self, post: &BlogPost) -> Result<(), AppError> {
        (**self).update_post(post).await
    }

    async fn delete_post(&self, id: &Uuid) -> Result<(), AppError> {
        (**self).delete_post(id).await
    }

    async fn increment(&self, id: &Uuid, counter: Counter) -> Result<BlogPost, AppError> {
        (**self).increment(id, counter).await
    }

    async fn tag_counts(&self, limit: usize) -> Result<Vec<TagCount>, AppError> {
        (**self).tag_counts(limit).await
    }
}

impl SqlxBlogPostRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxBlogPostRepo { pool }
    }
}

fn post_not_found() -> AppError {
    AppError::NotFound("Blog post not found".into())
}

#[async_trait]
impl BlogPostRepository for SqlxBlogPostRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>, AppError> {
        let rows = sqlx::query_as::<_, BlogPostRow>(
            "SELECT * FROM blog_posts ORDER BY created_at ASC, id ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BlogPost::from).collect())
    }

    async fn get_post(&self, id: &Uuid) -> Result<BlogPost, AppError> {
        sqlx::query_as::<_, BlogPostRow>("SELECT * FROM blog_posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(BlogPost::from)
            .ok_or_else(post_not_found)
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<BlogPost, AppError> {
        sqlx::query_as::<_, BlogPostRow>("SELECT * FROM blog_posts WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .map(BlogPost::from)
            .ok_or_else(post_not_found)
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM blog_posts
                WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert_post(&self, post: &BlogPost) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO blog_posts (
                id, title, slug, excerpt, content, cover_image_url, category, tags, author,
                published, featured, views, likes, published_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.cover_image_url)
        .bind(&post.category)
        .bind(&post.tags)
        .bind(Json(&post.author))
        .bind(post.published)
        .bind(post.featured)
        .bind(post.views as i64)
        .bind(post.likes as i64)
        .bind(post.published_at)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_post(&self, post: &BlogPost) -> Result<(), AppError> {
        // Counters are owned by `increment`; a stale copy must not overwrite them.
        let result = sqlx::query(
            r#"
            UPDATE blog_posts SET
                title = $2, slug = $3, excerpt = $4, content = $5, cover_image_url = $6,
                category = $7, tags = $8, author = $9, published = $10, featured = $11,
                published_at = $12, updated_at = $13
            WHERE id = $1
            "#
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.cover_image_url)
        .bind(&post.category)
        .bind(&post.tags)
        .bind(Json(&post.author))
        .bind(post.published)
        .bind(post.featured)
        .bind(post.published_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(post_not_found());
        }
        Ok(())
    }

    async fn delete_post(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(post_not_found());
        }
        Ok(())
    }

    async fn increment(&self, id: &Uuid, counter: Counter) -> Result<BlogPost, AppError> {
        let sql = match counter {
            Counter::Views => {
                "UPDATE blog_posts SET views = views + 1 WHERE id = $1 AND published = TRUE RETURNING *"
            }
            Counter::Likes => {
                "UPDATE blog_posts SET likes = likes + 1 WHERE id = $1 AND published = TRUE RETURNING *"
            }
        };

        sqlx::query_as::<_, BlogPostRow>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(BlogPost::from)
            .ok_or_else(post_not_found)
    }

    async fn tag_counts(&self, limit: usize) -> Result<Vec<TagCount>, AppError> {
        let tags = sqlx::query_as::<_, TagCount>(
            r#"
            SELECT tag, COUNT(*)::BIGINT AS count
            FROM blog_posts, UNNEST(tags) AS tag
            WHERE published = TRUE
            GROUP BY tag
            ORDER BY count DESC, tag ASC
            LIMIT $1
            "#
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }
}
