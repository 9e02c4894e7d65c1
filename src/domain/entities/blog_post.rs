use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        option_fields::OptionField,
        validation::{
            copy_title, validate_image_ref, validate_list, validate_optional_image_field, validate_slug_input,
            validate_title, validate_url, MAX_SUMMARY_LENGTH, MAX_TITLE_LENGTH,
        },
    },
    utils::markdown::safe_markdown_to_html,
};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_CATEGORY_LENGTH: u64 = 40;
const MAX_AUTHOR_NAME_LENGTH: u64 = 80;
const WORDS_PER_MINUTE: usize = 200;
pub const DEFAULT_CATEGORY: &str = "general";

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct BlogPostRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub author: Json<Author>,
    pub published: bool,
    pub featured: bool,
    pub views: i64,
    pub likes: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[validate(length(min = 1, max = MAX_AUTHOR_NAME_LENGTH))]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "validate_url"))]
    pub avatar_url: Option<String>,

    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub author: Author,
    pub published: bool,
    pub featured: bool,
    pub views: u64,
    pub likes: u64,
    pub read_time_minutes: u32,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub cover_image_url: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub author: Author,
    pub published: bool,
    pub featured: bool,
    pub views: u64,
    pub likes: u64,
    pub read_time_minutes: u32,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostDetail {
    #[serde(flatten)]
    pub post: BlogPost,
    pub content_html: String,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewBlogPost {
    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(custom(function = "validate_slug_input"))]
    pub slug: Option<String>,

    #[serde(default)]
    #[validate(length(max = MAX_SUMMARY_LENGTH))]
    pub excerpt: String,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,

    #[serde(default)]
    #[validate(custom(function = "validate_image_ref"))]
    pub cover_image_url: Option<String>,

    #[serde(default)]
    #[validate(length(max = MAX_CATEGORY_LENGTH))]
    pub category: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_list"))]
    pub tags: Vec<String>,

    #[serde(default)]
    #[validate(nested)]
    pub author: Option<Author>,

    #[serde(default)]
    pub published: bool,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPostPatch {
    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH),
        custom(function = "validate_title")
    )]
    pub title: Option<String>,

    #[validate(custom(function = "validate_slug_input"))]
    pub slug: Option<String>,

    #[validate(length(max = MAX_SUMMARY_LENGTH))]
    pub excerpt: Option<String>,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,

    #[validate(custom(function = "validate_optional_image_field"))]
    pub cover_image_url: OptionField<String>,

    #[validate(length(max = MAX_CATEGORY_LENGTH))]
    pub category: Option<String>,

    #[validate(custom(function = "validate_list"))]
    pub tags: Option<Vec<String>>,

    #[validate(nested)]
    pub author: Option<Author>,

    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub published_at: OptionField<DateTime<Utc>>,
}

// ───── Conversions ──────────────────────────────────────────────────

/// Reading time at 200 words per minute, never below one minute.
pub fn estimate_read_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

fn normalize_category(category: Option<String>) -> String {
    category
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

impl From<BlogPostRow> for BlogPost {
    fn from(row: BlogPostRow) -> Self {
        let read_time_minutes = estimate_read_time(&row.content);
        BlogPost {
            id: row.id,
            slug: row.slug,
            title: row.title,
            excerpt: row.excerpt,
            content: row.content,
            cover_image_url: row.cover_image_url,
            category: row.category,
            tags: row.tags,
            author: row.author.0,
            published: row.published,
            featured: row.featured,
            views: row.views.max(0) as u64,
            likes: row.likes.max(0) as u64,
            read_time_minutes,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl BlogPost {
    pub fn from_new(new: NewBlogPost, slug: String, default_author: &Author) -> Self {
        let now = Utc::now();
        let published_at = match (new.published, new.published_at) {
            (true, None) => Some(now),
            (_, at) => at,
        };

        BlogPost {
            id: Uuid::new_v4(),
            slug,
            read_time_minutes: estimate_read_time(&new.content),
            title: new.title,
            excerpt: new.excerpt,
            content: new.content,
            cover_image_url: new.cover_image_url,
            category: normalize_category(new.category),
            tags: new.tags,
            author: new.author.unwrap_or_else(|| default_author.clone()),
            published: new.published,
            featured: new.featured,
            views: 0,
            likes: 0,
            published_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Wholesale replacement keeping identity, counters and creation time.
    pub fn replace_with(&mut self, new: NewBlogPost, slug: String, default_author: &Author) {
        let previous = self.clone();
        *self = BlogPost::from_new(new, slug, default_author);
        self.id = previous.id;
        self.created_at = previous.created_at;
        self.views = previous.views;
        self.likes = previous.likes;
        if self.published && self.published_at.is_none() {
            self.published_at = previous.published_at;
        }
    }

    pub fn apply_patch(&mut self, patch: BlogPostPatch, slug: String) {
        self.slug = slug;
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(excerpt) = patch.excerpt {
            self.excerpt = excerpt;
        }
        if let Some(content) = patch.content {
            self.read_time_minutes = estimate_read_time(&content);
            self.content = content;
        }
        patch.cover_image_url.apply_to(&mut self.cover_image_url);
        if patch.category.is_some() {
            self.category = normalize_category(patch.category);
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
        patch.published_at.apply_to(&mut self.published_at);
        if let Some(published) = patch.published {
            self.published = published;
            if published && self.published_at.is_none() {
                self.published_at = Some(Utc::now());
            }
        }
        self.updated_at = Utc::now();
    }

    pub fn publish(&mut self) {
        let now = Utc::now();
        self.published = true;
        if self.published_at.is_none() {
            self.published_at = Some(now);
        }
        self.updated_at = now;
    }

    /// Unpublished copy with fresh identity and zeroed counters.
    pub fn duplicate(&self, slug: String) -> Self {
        let now = Utc::now();
        BlogPost {
            id: Uuid::new_v4(),
            slug,
            title: copy_title(&self.title),
            published: false,
            featured: false,
            views: 0,
            likes: 0,
            published_at: None,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Date used for "latest" ordering.
    pub fn display_date(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }

    pub fn to_summary(&self) -> BlogPostSummary {
        BlogPostSummary {
            id: self.id,
            slug: self.slug.clone(),
            title: self.title.clone(),
            excerpt: self.excerpt.clone(),
            cover_image_url: self.cover_image_url.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
            author: self.author.clone(),
            published: self.published,
            featured: self.featured,
            views: self.views,
            likes: self.likes,
            read_time_minutes: self.read_time_minutes,
            published_at: self.published_at,
            updated_at: self.updated_at,
        }
    }

    pub fn into_detail(self) -> BlogPostDetail {
        let content_html = safe_markdown_to_html(&self.content);
        BlogPostDetail {
            post: self,
            content_html,
        }
    }
}
