//! Process-local storage used when no database is configured, and by the
//! integration tests. Items keep insertion order so "latest" ties are stable.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    entities::{blog_post::BlogPost, project::Project, tag::TagCount},
    errors::AppError,
    repositories::{
        blog_post::{BlogPostRepository, Counter},
        project::ProjectRepository,
    },
};

fn slug_conflict() -> AppError {
    AppError::Conflict("Slug already exists".into())
}

#[derive(Clone, Default)]
pub struct InMemoryProjectRepo {
    projects: Arc<RwLock<Vec<Project>>>,
}

impl InMemoryProjectRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        Ok(self.projects.read().clone())
    }

    async fn get_project(&self, id: &Uuid) -> Result<Project, AppError> {
        self.projects
            .read()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        Ok(self
            .projects
            .read()
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != exclude_id))
    }

    async fn insert_project(&self, project: &Project) -> Result<(), AppError> {
        let mut projects = self.projects.write();
        if projects.iter().any(|p| p.slug == project.slug) {
            return Err(slug_conflict());
        }
        projects.push(project.clone());
        Ok(())
    }

    async fn update_project(&self, project: &Project) -> Result<(), AppError> {
        let mut projects = self.projects.write();
        if projects.iter().any(|p| p.slug == project.slug && p.id != project.id) {
            return Err(slug_conflict());
        }
        let slot = projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or_else(|| AppError::NotFound("Project not found".into()))?;
        *slot = project.clone();
        Ok(())
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let mut projects = self.projects.write();
        let before = projects.len();
        projects.retain(|p| &p.id != id);
        if projects.len() == before {
            return Err(AppError::NotFound("Project not found".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryBlogPostRepo {
    posts: Arc<RwLock<Vec<BlogPost>>>,
}

impl InMemoryBlogPostRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<BlogPost>) -> Self {
        InMemoryBlogPostRepo {
            posts: Arc::new(RwLock::new(posts)),
        }
    }
}

fn post_not_found() -> AppError {
    AppError::NotFound("Blog post not found".into())
}

#[async_trait]
impl BlogPostRepository for InMemoryBlogPostRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>, AppError> {
        Ok(self.posts.read().clone())
    }

    async fn get_post(&self, id: &Uuid) -> Result<BlogPost, AppError> {
        self.posts
            .read()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(post_not_found)
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<BlogPost, AppError> {
        self.posts
            .read()
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or_else(post_not_found)
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        Ok(self
            .posts
            .read()
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != exclude_id))
    }

    async fn insert_post(&self, post: &BlogPost) -> Result<(), AppError> {
        let mut posts = self.posts.write();
        if posts.iter().any(|p| p.slug == post.slug) {
            return Err(slug_conflict());
        }
        posts.push(post.clone());
        Ok(())
    }

    async fn update_post(&self, post: &BlogPost) -> Result<(), AppError> {
        let mut posts = self.posts.write();
        if posts.iter().any(|p| p.slug == post.slug && p.id != post.id) {
            return Err(slug_conflict());
        }
        let slot = posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or_else(post_not_found)?;
        // Counters only move through `increment`.
        let (views, likes) = (slot.views, slot.likes);
        *slot = BlogPost { views, likes, ..post.clone() };
        Ok(())
    }

    async fn delete_post(&self, id: &Uuid) -> Result<(), AppError> {
        let mut posts = self.posts.write();
        let before = posts.len();
        posts.retain(|p| &p.id != id);
        if posts.len() == before {
            return Err(post_not_found());
        }
        Ok(())
    }

    async fn increment(&self, id: &Uuid, counter: Counter) -> Result<BlogPost, AppError> {
        let mut posts = self.posts.write();
        let post = posts
            .iter_mut()
            .find(|p| &p.id == id && p.published)
            .ok_or_else(post_not_found)?;
        match counter {
            Counter::Views => post.views = post.views.saturating_add(1),
            Counter::Likes => post.likes = post.likes.saturating_add(1),
        }
        Ok(post.clone())
    }

    async fn tag_counts(&self, limit: usize) -> Result<Vec<TagCount>, AppError> {
        let posts = self.posts.read();
        Ok(TagCount::aggregate(
            posts.iter().filter(|p| p.published).map(|p| p.tags.as_slice()),
            limit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::blog_post::{Author, NewBlogPost};

    fn post(slug: &str, published: bool, tags: &[&str]) -> BlogPost {
        let new = NewBlogPost {
            title: slug.to_string(),
            content: "word ".repeat(10),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            published,
            ..Default::default()
        };
        BlogPost::from_new(new, slug.to_string(), &Author::default())
    }

    #[actix_rt::test]
    async fn insert_rejects_duplicate_slug() {
        let repo = InMemoryBlogPostRepo::new();
        repo.insert_post(&post("hello", true, &[])).await.unwrap();
        let err = repo.insert_post(&post("hello", true, &[])).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[actix_rt::test]
    async fn increment_ignores_drafts() {
        let repo = InMemoryBlogPostRepo::new();
        let draft = post("draft", false, &[]);
        repo.insert_post(&draft).await.unwrap();
        let err = repo.increment(&draft.id, Counter::Views).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[actix_rt::test]
    async fn update_preserves_counters() {
        let repo = InMemoryBlogPostRepo::new();
        let original = post("live", true, &[]);
        repo.insert_post(&original).await.unwrap();
        repo.increment(&original.id, Counter::Likes).await.unwrap();

        let mut edited = original.clone();
        edited.title = "Edited".into();
        repo.update_post(&edited).await.unwrap();

        let stored = repo.get_post(&original.id).await.unwrap();
        assert_eq!(stored.title, "Edited");
        assert_eq!(stored.likes, 1);
    }

    #[actix_rt::test]
    async fn tag_counts_skip_drafts() {
        let repo = InMemoryBlogPostRepo::with_posts(vec![
            post("a", true, &["rust", "web"]),
            post("b", true, &["rust"]),
            post("c", false, &["rust", "draft-only"]),
        ]);
        let tags = repo.tag_counts(20).await.unwrap();
        assert_eq!(tags[0], TagCount { tag: "rust".into(), count: 2 });
        assert!(tags.iter().all(|t| t.tag != "draft-only"));
    }
}
