//! Filtering and ordering of project and blog collections.
//!
//! The whole collection is recomputed per request: filter with the
//! criteria, then sort stably so ties keep their source order.

use std::{cmp::Reverse, str::FromStr};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    entities::{
        blog_post::BlogPost,
        project::{Difficulty, Project, ProjectCategory, ProjectStatus},
    },
    errors::AppError,
};

/// Filter value meaning "no filter".
pub const ALL_SENTINEL: &str = "all";
pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Latest,
    Popular,
    Trending,
    Title,
}

impl FromStr for SortMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latest" | "newest" => Ok(SortMode::Latest),
            "popular" => Ok(SortMode::Popular),
            "trending" | "featured" => Ok(SortMode::Trending),
            "title" => Ok(SortMode::Title),
            other => Err(AppError::InvalidInput(format!("Unknown sort mode '{}'", other))),
        }
    }
}

/// Engagement ranking: `views + likes * 2`.
pub fn trending_score(views: u64, likes: u64) -> u64 {
    views.saturating_add(likes.saturating_mul(2))
}

/// What the engine needs to know about an item.
pub trait Listable {
    fn title(&self) -> &str;
    /// Fields the free-text query is matched against (logical OR).
    fn search_fields(&self) -> Vec<&str>;
    fn sort_date(&self) -> Option<DateTime<Utc>>;
    fn views(&self) -> u64;
    fn likes(&self) -> u64;
}

impl Listable for Project {
    fn title(&self) -> &str {
        &self.title
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.title.as_str(),
            self.description.as_str(),
            self.long_description.as_str(),
        ];
        fields.extend(self.technologies.iter().map(String::as_str));
        fields
    }

    fn sort_date(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn views(&self) -> u64 {
        self.stats.views
    }

    fn likes(&self) -> u64 {
        self.stats.likes
    }
}

impl Listable for BlogPost {
    fn title(&self) -> &str {
        &self.title
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.excerpt.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }

    fn sort_date(&self) -> Option<DateTime<Utc>> {
        Some(self.display_date())
    }

    fn views(&self) -> u64 {
        self.views
    }

    fn likes(&self) -> u64 {
        self.likes
    }
}

/// Case-insensitive substring match of a (pre-lowercased) needle against
/// any searchable field. An empty needle matches everything.
pub fn matches_query<T: Listable>(item: &T, needle: &str) -> bool {
    needle.is_empty()
        || item
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

pub fn sort_items<T: Listable>(items: &mut [T], mode: SortMode) {
    match mode {
        // `None` sorts after every date when reversed.
        SortMode::Latest => items.sort_by_key(|item| Reverse(item.sort_date())),
        SortMode::Popular => items.sort_by_key(|item| Reverse(item.views())),
        SortMode::Trending => {
            items.sort_by_key(|item| Reverse(trending_score(item.views(), item.likes())))
        }
        SortMode::Title => items.sort_by_cached_key(|item| item.title().to_lowercase()),
    }
}

fn normalized_query(query: Option<&str>) -> String {
    query.map(|q| q.trim().to_lowercase()).unwrap_or_default()
}

fn apply<T, F>(items: Vec<T>, query: Option<&str>, sort: SortMode, predicate: F) -> Vec<T>
where
    T: Listable,
    F: Fn(&T) -> bool,
{
    let needle = normalized_query(query);
    let mut kept: Vec<T> = items
        .into_iter()
        .filter(|item| predicate(item) && matches_query(item, &needle))
        .collect();
    sort_items(&mut kept, sort);
    kept
}

#[derive(Debug, Clone, Default)]
pub struct ProjectCriteria {
    pub query: Option<String>,
    pub category: Option<ProjectCategory>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<ProjectStatus>,
    pub featured: Option<bool>,
    pub sort: SortMode,
}

impl ProjectCriteria {
    pub fn apply(&self, projects: Vec<Project>) -> Vec<Project> {
        apply(projects, self.query.as_deref(), self.sort, |p| {
            self.category.is_none_or(|c| p.category == c)
                && self.difficulty.is_none_or(|d| p.difficulty == d)
                && self.status.is_none_or(|s| p.status == s)
                && self.featured.is_none_or(|f| p.featured == f)
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlogCriteria {
    pub query: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
    pub include_drafts: bool,
    pub sort: SortMode,
}

impl BlogCriteria {
    pub fn apply(&self, posts: Vec<BlogPost>) -> Vec<BlogPost> {
        apply(posts, self.query.as_deref(), self.sort, |p| {
            (self.include_drafts || p.published)
                && self
                    .category
                    .as_deref()
                    .is_none_or(|c| p.category.eq_ignore_ascii_case(c))
                && self
                    .tag
                    .as_deref()
                    .is_none_or(|t| p.tags.iter().any(|tag| tag.eq_ignore_ascii_case(t)))
                && self.featured.is_none_or(|f| p.featured == f)
        })
    }
}

/// Raw listing query string. Every filter accepts `all` as "no filter".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListingParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub status: Option<String>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
    pub sort: Option<String>,
    pub drafts: Option<bool>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

fn filter_value(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL_SENTINEL))
}

fn parse_filter<T: FromStr<Err = AppError>>(raw: Option<&str>) -> Result<Option<T>, AppError> {
    filter_value(raw).map(str::parse).transpose()
}

impl ListingParams {
    pub fn sort_mode(&self) -> Result<SortMode, AppError> {
        Ok(parse_filter::<SortMode>(self.sort.as_deref())?.unwrap_or_default())
    }

    pub fn project_criteria(&self) -> Result<ProjectCriteria, AppError> {
        Ok(ProjectCriteria {
            query: self.q.clone(),
            category: parse_filter(self.category.as_deref())?,
            difficulty: parse_filter(self.difficulty.as_deref())?,
            status: parse_filter(self.status.as_deref())?,
            featured: self.featured,
            sort: self.sort_mode()?,
        })
    }

    /// Drafts are only included when the caller is an admin and asked.
    pub fn blog_criteria(&self, is_admin: bool) -> Result<BlogCriteria, AppError> {
        Ok(BlogCriteria {
            query: self.q.clone(),
            category: filter_value(self.category.as_deref()).map(str::to_string),
            tag: filter_value(self.tag.as_deref()).map(str::to_string),
            featured: self.featured,
            include_drafts: is_admin && self.drafts.unwrap_or(false),
            sort: self.sort_mode()?,
        })
    }

    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len();
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = self.offset.unwrap_or(0);
        let items = items.into_iter().skip(offset).take(limit).collect();
        Page { items, total, limit, offset }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> Page<T> {
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}
