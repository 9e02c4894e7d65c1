use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        option_fields::OptionField,
        validation::{
            copy_title, validate_image_ref, validate_image_refs, validate_list, validate_optional_image_field,
            validate_optional_url_field, validate_slug_input, validate_title, validate_url,
            MAX_SUMMARY_LENGTH, MAX_TITLE_LENGTH,
        },
    },
    errors::AppError,
};

/// Declares a fieldless enum whose wire form is a fixed kebab-case label,
/// with `FromStr` (case-insensitive) and `Display` over the same labels.
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? } default $default:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| AppError::InvalidInput(format!(
                        "Unknown {} '{}'", stringify!($name), needle
                    )))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labelled_enum!(
    ProjectCategory {
        Web => "web",
        Mobile => "mobile",
        Backend => "backend",
        Ai => "ai",
        Tooling => "tooling",
        Other => "other",
    } default Other
);

labelled_enum!(
    ProjectStatus {
        Planning => "planning",
        InProgress => "in-progress",
        Completed => "completed",
        Archived => "archived",
    } default Completed
);

labelled_enum!(
    Difficulty {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
        Expert => "expert",
    } default Intermediate
);

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectStats {
    pub views: u64,
    pub likes: u64,
    pub stars: u64,
    pub forks: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPerformance {
    #[validate(range(max = 100, message = "Lighthouse score must be between 0 and 100"))]
    pub lighthouse: Option<u8>,
    pub load_time_ms: Option<u32>,
    pub bundle_size_kb: Option<u32>,
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub long_description: String,
    pub technologies: Vec<String>,
    pub features: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub screenshots: Vec<String>,
    pub category: String,
    pub status: String,
    pub difficulty: String,
    pub featured: bool,
    pub stats: Json<ProjectStats>,
    pub performance: Json<ProjectPerformance>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub long_description: String,
    pub technologies: Vec<String>,
    pub features: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub screenshots: Vec<String>,
    pub category: ProjectCategory,
    pub status: ProjectStatus,
    pub difficulty: Difficulty,
    pub featured: bool,
    pub stats: ProjectStats,
    pub performance: ProjectPerformance,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── Input & Validation Requests ──────────────────────────────────

/// Create/replace payload. A blank `slug` is derived from the title on
/// create and left untouched on replace.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(custom(function = "validate_slug_input"))]
    pub slug: Option<String>,

    #[validate(length(max = MAX_SUMMARY_LENGTH))]
    pub description: String,

    #[serde(default)]
    pub long_description: String,

    #[serde(default)]
    #[validate(custom(function = "validate_list"))]
    pub technologies: Vec<String>,

    #[serde(default)]
    pub features: Vec<String>,

    #[validate(custom(function = "validate_url"))]
    pub github_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub live_url: Option<String>,

    #[validate(custom(function = "validate_image_ref"))]
    pub image_url: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_image_refs"))]
    pub screenshots: Vec<String>,

    #[serde(default)]
    pub category: ProjectCategory,

    #[serde(default)]
    pub status: ProjectStatus,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub stats: ProjectStats,

    #[serde(default)]
    #[validate(nested)]
    pub performance: ProjectPerformance,
}

/// Partial update. Plain `Option` fields are required on the entity, so
/// `null` and absence both leave them unchanged; `OptionField` fields are
/// nullable on the entity.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPatch {
    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH),
        custom(function = "validate_title")
    )]
    pub title: Option<String>,

    #[validate(custom(function = "validate_slug_input"))]
    pub slug: Option<String>,

    #[validate(length(max = MAX_SUMMARY_LENGTH))]
    pub description: Option<String>,

    pub long_description: Option<String>,

    #[validate(custom(function = "validate_list"))]
    pub technologies: Option<Vec<String>>,

    pub features: Option<Vec<String>>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub github_url: OptionField<String>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub live_url: OptionField<String>,

    #[validate(custom(function = "validate_optional_image_field"))]
    pub image_url: OptionField<String>,

    #[validate(custom(function = "validate_image_refs"))]
    pub screenshots: Option<Vec<String>>,

    pub category: Option<ProjectCategory>,
    pub status: Option<ProjectStatus>,
    pub difficulty: Option<Difficulty>,
    pub featured: Option<bool>,
    pub stats: Option<ProjectStats>,

    #[validate(nested)]
    pub performance: Option<ProjectPerformance>,
}

// ───── Conversions ──────────────────────────────────────────────────

impl TryFrom<ProjectRow> for Project {
    type Error = AppError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            long_description: row.long_description,
            technologies: row.technologies,
            features: row.features,
            github_url: row.github_url,
            live_url: row.live_url,
            image_url: row.image_url,
            screenshots: row.screenshots,
            category: row.category.parse()?,
            status: row.status.parse()?,
            difficulty: row.difficulty.parse()?,
            featured: row.featured,
            stats: row.stats.0,
            performance: row.performance.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Project {
    pub fn from_new(new: NewProject, slug: String) -> Self {
        let now = Utc::now();
        Project {
            id: Uuid::new_v4(),
            title: new.title,
            slug,
            description: new.description,
            long_description: new.long_description,
            technologies: new.technologies,
            features: new.features,
            github_url: new.github_url,
            live_url: new.live_url,
            image_url: new.image_url,
            screenshots: new.screenshots,
            category: new.category,
            status: new.status,
            difficulty: new.difficulty,
            featured: new.featured,
            stats: new.stats,
            performance: new.performance,
            created_at: now,
            updated_at: now,
        }
    }

    /// Wholesale replacement keeping identity and creation time.
    pub fn replace_with(&mut self, new: NewProject, slug: String) {
        let id = self.id;
        let created_at = self.created_at;
        *self = Project::from_new(new, slug);
        self.id = id;
        self.created_at = created_at;
    }

    pub fn apply_patch(&mut self, patch: ProjectPatch, slug: String) {
        self.slug = slug;
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(long_description) = patch.long_description {
            self.long_description = long_description;
        }
        if let Some(technologies) = patch.technologies {
            self.technologies = technologies;
        }
        if let Some(features) = patch.features {
            self.features = features;
        }
        patch.github_url.apply_to(&mut self.github_url);
        patch.live_url.apply_to(&mut self.live_url);
        patch.image_url.apply_to(&mut self.image_url);
        if let Some(screenshots) = patch.screenshots {
            self.screenshots = screenshots;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
        if let Some(stats) = patch.stats {
            self.stats = stats;
        }
        if let Some(performance) = patch.performance {
            self.performance = performance;
        }
        self.updated_at = Utc::now();
    }

    /// Copy with fresh identity, reset counters and a `(Copy)` title.
    pub fn duplicate(&self, slug: String) -> Self {
        let now = Utc::now();
        Project {
            id: Uuid::new_v4(),
            title: copy_title(&self.title),
            slug,
            featured: false,
            stats: ProjectStats::default(),
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }
}
