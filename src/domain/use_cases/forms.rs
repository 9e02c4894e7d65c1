//! Admin form submissions.
//!
//! HTML forms post every field as free text: array fields arrive as
//! comma-separated strings, numbers as strings that may not parse, and
//! checkboxes as `on`. These builders turn such a submission into the
//! structured payload the JSON API accepts.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::{
    entities::{
        blog_post::{Author, NewBlogPost},
        project::{NewProject, ProjectPerformance, ProjectStats},
    },
    errors::AppError,
};

/// Splits on commas (and newlines when `multiline`), trimming items and
/// dropping empties.
pub fn split_list(raw: &str, multiline: bool) -> Vec<String> {
    raw.split(|c: char| c == ',' || (multiline && c == '\n'))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Silent numeric parse: anything unparsable, negative or NaN becomes 0.
pub fn parse_count(raw: &str) -> u64 {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => n.round() as u64,
        _ => 0,
    }
}

fn parse_optional_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite() && *n >= 0.0)
}

pub fn parse_checkbox(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "on" | "true" | "1" | "yes")
}

fn non_blank(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_enum<T>(raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr<Err = AppError> + Default,
{
    if raw.trim().is_empty() {
        Ok(T::default())
    } else {
        raw.parse()
    }
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectForm {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub long_description: String,
    pub technologies: String,
    pub features: String,
    pub github_url: String,
    pub live_url: String,
    pub image_url: String,
    pub screenshots: String,
    pub category: String,
    pub status: String,
    pub difficulty: String,
    pub featured: String,
    pub views: String,
    pub likes: String,
    pub stars: String,
    pub forks: String,
    pub lighthouse: String,
    pub load_time_ms: String,
    pub bundle_size_kb: String,
}

impl ProjectForm {
    pub fn into_payload(self) -> Result<NewProject, AppError> {
        let performance = ProjectPerformance {
            lighthouse: parse_optional_number(&self.lighthouse).map(|n| n.round().min(100.0) as u8),
            load_time_ms: parse_optional_number(&self.load_time_ms).map(|n| n.round() as u32),
            bundle_size_kb: parse_optional_number(&self.bundle_size_kb).map(|n| n.round() as u32),
        };

        Ok(NewProject {
            title: self.title.trim().to_string(),
            slug: non_blank(self.slug),
            description: self.description.trim().to_string(),
            long_description: self.long_description.trim().to_string(),
            technologies: split_list(&self.technologies, false),
            features: split_list(&self.features, true),
            github_url: non_blank(self.github_url),
            live_url: non_blank(self.live_url),
            image_url: non_blank(self.image_url),
            screenshots: split_list(&self.screenshots, true),
            category: parse_enum(&self.category)?,
            status: parse_enum(&self.status)?,
            difficulty: parse_enum(&self.difficulty)?,
            featured: parse_checkbox(&self.featured),
            stats: ProjectStats {
                views: parse_count(&self.views),
                likes: parse_count(&self.likes),
                stars: parse_count(&self.stars),
                forks: parse_count(&self.forks),
            },
            performance,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogPostForm {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image_url: String,
    pub category: String,
    pub tags: String,
    pub author_name: String,
    pub author_avatar_url: String,
    pub author_bio: String,
    pub published: String,
    pub featured: String,
    pub published_at: String,
}

impl BlogPostForm {
    pub fn into_payload(self) -> NewBlogPost {
        let author = non_blank(self.author_name).map(|name| Author {
            name,
            avatar_url: non_blank(self.author_avatar_url),
            bio: non_blank(self.author_bio),
        });

        NewBlogPost {
            title: self.title.trim().to_string(),
            slug: non_blank(self.slug),
            excerpt: self.excerpt.trim().to_string(),
            content: self.content,
            cover_image_url: non_blank(self.cover_image_url),
            category: non_blank(self.category),
            tags: split_list(&self.tags, false),
            author,
            published: parse_checkbox(&self.published),
            featured: parse_checkbox(&self.featured),
            published_at: parse_datetime(&self.published_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::project::{Difficulty, ProjectCategory, ProjectStatus};

    #[test]
    fn split_list_trims_and_drops_empties() {
        assert_eq!(split_list(" Rust, Actix ,, SQL ,", false), vec!["Rust", "Actix", "SQL"]);
        assert_eq!(split_list("Fast\nSafe, Small", true), vec!["Fast", "Safe", "Small"]);
        assert_eq!(split_list("Fast\nSafe", false), vec!["Fast\nSafe"]);
        assert!(split_list("   ", false).is_empty());
    }

    #[test]
    fn numbers_fall_back_to_zero() {
        assert_eq!(parse_count("42"), 42);
        assert_eq!(parse_count(" 7.6 "), 8);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count("NaN"), 0);
        assert_eq!(parse_count("-5"), 0);
        assert_eq!(parse_count(""), 0);
    }

    #[test]
    fn project_form_builds_payload() {
        let form = ProjectForm {
            title: " Rust API ".into(),
            description: "Fast".into(),
            technologies: "Rust, Actix, Postgres".into(),
            features: "Auth\nSearch, Uploads".into(),
            github_url: "https://github.com/me/api".into(),
            live_url: "   ".into(),
            category: "Backend".into(),
            status: "in-progress".into(),
            featured: "on".into(),
            views: "120".into(),
            likes: "oops".into(),
            lighthouse: "97.4".into(),
            load_time_ms: "NaN".into(),
            ..Default::default()
        };

        let payload = form.into_payload().unwrap();
        assert_eq!(payload.title, "Rust API");
        assert_eq!(payload.slug, None);
        assert_eq!(payload.technologies, vec!["Rust", "Actix", "Postgres"]);
        assert_eq!(payload.features, vec!["Auth", "Search", "Uploads"]);
        assert_eq!(payload.live_url, None);
        assert_eq!(payload.category, ProjectCategory::Backend);
        assert_eq!(payload.status, ProjectStatus::InProgress);
        assert_eq!(payload.difficulty, Difficulty::default());
        assert!(payload.featured);
        assert_eq!(payload.stats.views, 120);
        assert_eq!(payload.stats.likes, 0);
        assert_eq!(payload.performance.lighthouse, Some(97));
        assert_eq!(payload.performance.load_time_ms, None);
    }

    #[test]
    fn project_form_rejects_unknown_enum() {
        let form = ProjectForm {
            title: "X".into(),
            category: "spaceships".into(),
            ..Default::default()
        };
        assert!(form.into_payload().is_err());
    }

    #[test]
    fn blog_form_builds_payload() {
        let form = BlogPostForm {
            title: "Hello".into(),
            content: "Body".into(),
            tags: "rust, web, ".into(),
            author_name: "Guest Writer".into(),
            published: "true".into(),
            published_at: "2024-05-01".into(),
            ..Default::default()
        };

        let payload = form.into_payload();
        assert_eq!(payload.tags, vec!["rust", "web"]);
        assert_eq!(payload.author.unwrap().name, "Guest Writer");
        assert!(payload.published);
        assert_eq!(payload.published_at.unwrap().to_rfc3339(), "2024-05-01T00:00:00+00:00");
        assert!(payload.category.is_none());
    }

    #[test]
    fn blank_author_uses_default() {
        let payload = BlogPostForm { title: "Hello".into(), ..Default::default() }.into_payload();
        assert!(payload.author.is_none());
        assert!(payload.published_at.is_none());
    }
}
