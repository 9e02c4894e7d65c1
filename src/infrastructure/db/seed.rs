//! Sample content loaded into an empty store so a fresh install has
//! something to show.

use chrono::{Duration, Utc};

use crate::{
    entities::{
        blog_post::{Author, BlogPost, NewBlogPost},
        project::{Difficulty, NewProject, Project, ProjectCategory, ProjectPerformance, ProjectStats, ProjectStatus},
    },
    errors::AppError,
    repositories::{blog_post::BlogPostRepository, project::ProjectRepository},
    use_cases::slug::slugify,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn mock_projects() -> Vec<Project> {
    let samples = [
        (
            "Portfolio Platform",
            "Personal site with a project showcase, blog and AI chat assistant.",
            strings(&["Rust", "Actix Web", "React", "PostgreSQL"]),
            ProjectCategory::Web,
            ProjectStatus::Completed,
            Difficulty::Advanced,
            true,
            ProjectStats { views: 1250, likes: 87, stars: 42, forks: 9 },
            Some(98),
        ),
        (
            "Task Tracker Mobile",
            "Offline-first task manager with background sync.",
            strings(&["React Native", "TypeScript", "SQLite"]),
            ProjectCategory::Mobile,
            ProjectStatus::InProgress,
            Difficulty::Intermediate,
            false,
            ProjectStats { views: 430, likes: 35, stars: 12, forks: 2 },
            None,
        ),
        (
            "Realtime Chat Service",
            "WebSocket chat backend with presence and message history.",
            strings(&["Rust", "Tokio", "Redis"]),
            ProjectCategory::Backend,
            ProjectStatus::Completed,
            Difficulty::Expert,
            true,
            ProjectStats { views: 980, likes: 120, stars: 64, forks: 14 },
            None,
        ),
        (
            "Document Q&A Assistant",
            "Retrieval-augmented assistant answering questions over uploaded PDFs.",
            strings(&["Python", "FastAPI", "Embeddings"]),
            ProjectCategory::Ai,
            ProjectStatus::Planning,
            Difficulty::Advanced,
            false,
            ProjectStats { views: 150, likes: 22, stars: 5, forks: 0 },
            None,
        ),
    ];

    let now = Utc::now();
    samples
        .into_iter()
        .enumerate()
        .map(|(index, (title, description, technologies, category, status, difficulty, featured, stats, lighthouse))| {
            let new = NewProject {
                title: title.to_string(),
                description: description.to_string(),
                long_description: format!("{description} Built end to end, from data model to deployment."),
                technologies,
                features: strings(&["Responsive UI", "Automated tests", "CI deployment"]),
                github_url: Some(format!("https://github.com/example/{}", slugify(title))),
                category,
                status,
                difficulty,
                featured,
                stats,
                performance: ProjectPerformance { lighthouse, ..Default::default() },
                ..Default::default()
            };
            let mut project = Project::from_new(new, slugify(title));
            project.created_at = now - Duration::days(30 * (index as i64 + 1));
            project.updated_at = project.created_at;
            project
        })
        .collect()
}

pub fn mock_posts(owner_name: &str) -> Vec<BlogPost> {
    let author = Author { name: owner_name.to_string(), ..Default::default() };
    let samples = [
        (
            "Building a REST API in Rust",
            "Notes from moving a portfolio backend to Actix Web and SQLx.",
            strings(&["rust", "backend", "api"]),
            "engineering",
            true,
            true,
            (820, 64),
        ),
        (
            "Designing a Project Showcase",
            "How filters, sorting and slugs shape a browsable portfolio.",
            strings(&["design", "frontend", "react"]),
            "design",
            true,
            false,
            (410, 22),
        ),
        (
            "Adding an AI Assistant to a Personal Site",
            "Proxying chat completions with graceful canned fallbacks.",
            strings(&["ai", "rust", "api"]),
            "engineering",
            true,
            false,
            (1300, 150),
        ),
        (
            "Drafting: Lessons from Side Projects",
            "Work in progress.",
            strings(&["career"]),
            "career",
            false,
            false,
            (0, 0),
        ),
    ];

    let now = Utc::now();
    samples
        .into_iter()
        .enumerate()
        .map(|(index, (title, excerpt, tags, category, published, featured, (views, likes)))| {
            let published_at = published.then(|| now - Duration::days(7 * (index as i64 + 1)));
            let new = NewBlogPost {
                title: title.to_string(),
                excerpt: excerpt.to_string(),
                content: format!("# {title}\n\n{excerpt}\n\n{}", "Some longer body text. ".repeat(60)),
                category: Some(category.to_string()),
                tags,
                published,
                featured,
                published_at,
                ..Default::default()
            };
            let mut post = BlogPost::from_new(new, slugify(title), &author);
            post.views = views;
            post.likes = likes;
            post.created_at = published_at.unwrap_or(now);
            post.updated_at = post.created_at;
            post
        })
        .collect()
}

/// Inserts the sample content into empty stores only.
pub async fn seed_if_empty<P, B>(projects: &P, posts: &B, owner_name: &str) -> Result<(), AppError>
where
    P: ProjectRepository + ?Sized,
    B: BlogPostRepository + ?Sized,
{
    if projects.list_projects().await?.is_empty() {
        for project in mock_projects() {
            projects.insert_project(&project).await?;
        }
        tracing::info!("Seeded sample projects");
    }

    if posts.list_posts().await?.is_empty() {
        for post in mock_posts(owner_name) {
            posts.insert_post(&post).await?;
        }
        tracing::info!("Seeded sample blog posts");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn mock_slugs_are_unique() {
        let projects = mock_projects();
        let mut slugs: Vec<_> = projects.iter().map(|p| p.slug.as_str()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), projects.len());
    }

    #[test]
    fn mock_posts_include_a_draft() {
        let posts = mock_posts("Owner");
        assert!(posts.iter().any(|p| !p.published));
        assert!(posts.iter().filter(|p| p.published).all(|p| p.published_at.is_some()));
    }

    #[test]
    fn mock_performance_is_valid() {
        for project in mock_projects() {
            assert!(project.performance.validate().is_ok());
        }
    }
}
