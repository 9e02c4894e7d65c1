use std::collections::HashSet;

use validator::Validate;

use crate::{
    entities::blog_post::{Author, BlogPost, BlogPostDetail, BlogPostPatch, BlogPostSummary, NewBlogPost},
    errors::AppError,
    repositories::blog_post::{BlogPostRepository, Counter},
    use_cases::{
        listing::{ListingParams, Page},
        slug::{duplicate_slug, slug_for_create, slug_for_update},
    },
    utils::valid_uuid::valid_uuid,
};

pub struct BlogPostHandler<R>
where
    R: BlogPostRepository,
{
    pub blog_post_repo: R,
    default_author: Author,
}

impl<R> BlogPostHandler<R>
where
    R: BlogPostRepository,
{
    /// `owner_name` becomes the author of posts created without one.
    pub fn new(blog_post_repo: R, owner_name: &str) -> Self {
        BlogPostHandler {
            blog_post_repo,
            default_author: Author {
                name: owner_name.to_string(),
                ..Default::default()
            },
        }
    }

    /// Published posts only, unless an admin asks for drafts.
    pub async fn list_posts(
        &self,
        params: &ListingParams,
        is_admin: bool,
    ) -> Result<Page<BlogPostSummary>, AppError> {
        let criteria = params.blog_criteria(is_admin)?;
        let posts = self.blog_post_repo.list_posts().await?;
        let page = params.paginate(criteria.apply(posts));
        Ok(page.map(|post| post.to_summary()))
    }

    /// Looks up by UUID first, then by slug. Drafts are hidden from
    /// non-admins.
    pub async fn get_post(&self, id_or_slug: &str, is_admin: bool) -> Result<BlogPostDetail, AppError> {
        let post = match uuid::Uuid::parse_str(id_or_slug) {
            Ok(id) => self.blog_post_repo.get_post(&id).await?,
            Err(_) => self.blog_post_repo.get_post_by_slug(id_or_slug).await?,
        };

        if !post.published && !is_admin {
            return Err(AppError::NotFound("Blog post not found".into()));
        }
        Ok(post.into_detail())
    }

    pub async fn create_post(&self, new: NewBlogPost) -> Result<BlogPost, AppError> {
        new.validate()?;
        let slug = slug_for_create(new.slug.as_deref(), &new.title)
            .ok_or_else(|| AppError::field("slug", "Slug could not be derived from the title"))?;
        self.ensure_slug_free(&slug, None).await?;

        let post = BlogPost::from_new(new, slug, &self.default_author);
        self.blog_post_repo.insert_post(&post).await?;
        tracing::info!(post_id = %post.id, slug = %post.slug, published = post.published, "Blog post created");
        Ok(post)
    }

    pub async fn replace_post(&self, id: &str, new: NewBlogPost) -> Result<BlogPost, AppError> {
        new.validate()?;
        let id = valid_uuid(id)?;
        let mut post = self.blog_post_repo.get_post(&id).await?;

        let slug = slug_for_update(new.slug.as_deref(), &post.slug);
        self.ensure_slug_free(&slug, Some(id)).await?;

        post.replace_with(new, slug, &self.default_author);
        self.blog_post_repo.update_post(&post).await?;
        Ok(post)
    }

    pub async fn patch_post(&self, id: &str, patch: BlogPostPatch) -> Result<BlogPost, AppError> {
        patch.validate()?;
        let id = valid_uuid(id)?;
        let mut post = self.blog_post_repo.get_post(&id).await?;

        let slug = slug_for_update(patch.slug.as_deref(), &post.slug);
        self.ensure_slug_free(&slug, Some(id)).await?;

        post.apply_patch(patch, slug);
        self.blog_post_repo.update_post(&post).await?;
        Ok(post)
    }

    pub async fn publish_post(&self, id: &str) -> Result<BlogPost, AppError> {
        let id = valid_uuid(id)?;
        let mut post = self.blog_post_repo.get_post(&id).await?;
        post.publish();
        self.blog_post_repo.update_post(&post).await?;
        tracing::info!(post_id = %post.id, "Blog post published");
        Ok(post)
    }

    /// Copies a post as an unpublished draft.
    pub async fn duplicate_post(&self, id: &str) -> Result<BlogPost, AppError> {
        let id = valid_uuid(id)?;
        let source = self.blog_post_repo.get_post(&id).await?;

        let taken: HashSet<String> = self
            .blog_post_repo
            .list_posts()
            .await?
            .into_iter()
            .map(|p| p.slug)
            .collect();
        let slug = duplicate_slug(&source.slug, |candidate| taken.contains(candidate));

        let copy = source.duplicate(slug);
        self.blog_post_repo.insert_post(&copy).await?;
        Ok(copy)
    }

    pub async fn record_view(&self, id: &str) -> Result<BlogPostSummary, AppError> {
        let id = valid_uuid(id)?;
        let post = self.blog_post_repo.increment(&id, Counter::Views).await?;
        Ok(post.to_summary())
    }

    pub async fn like_post(&self, id: &str) -> Result<BlogPostSummary, AppError> {
        let id = valid_uuid(id)?;
        let post = self.blog_post_repo.increment(&id, Counter::Likes).await?;
        Ok(post.to_summary())
    }

    pub async fn delete_post(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.blog_post_repo.delete_post(&id).await?;
        tracing::info!(post_id = %id, "Blog post deleted");
        Ok(())
    }

    async fn ensure_slug_free(&self, slug: &str, exclude: Option<uuid::Uuid>) -> Result<(), AppError> {
        if self.blog_post_repo.slug_exists(slug, exclude).await? {
            return Err(AppError::Conflict("Slug already exists".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::blog_post::MockBlogPostRepository;

    fn draft(title: &str, slug: &str) -> BlogPost {
        let new = NewBlogPost {
            title: title.to_string(),
            content: "Some **markdown** body".into(),
            ..Default::default()
        };
        BlogPost::from_new(new, slug.to_string(), &Author::default())
    }

    #[actix_rt::test]
    async fn create_uses_owner_as_default_author() {
        let mut repo = MockBlogPostRepository::new();
        repo.expect_slug_exists().returning(|_, _| Ok(false));
        repo.expect_insert_post().times(1).returning(|_| Ok(()));

        let handler = BlogPostHandler::new(repo, "Ada Lovelace");
        let post = handler
            .create_post(NewBlogPost {
                title: "First Post".into(),
                content: "Hello".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(post.slug, "first-post");
        assert_eq!(post.author.name, "Ada Lovelace");
        assert!(!post.published);
    }

    #[actix_rt::test]
    async fn drafts_are_hidden_from_visitors() {
        let post = draft("Secret", "secret");
        let mut repo = MockBlogPostRepository::new();
        let stored = post.clone();
        repo.expect_get_post_by_slug().returning(move |_| Ok(stored.clone()));

        let handler = BlogPostHandler::new(repo, "Owner");
        let err = handler.get_post("secret", false).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let detail = handler.get_post("secret", true).await.unwrap();
        assert!(detail.content_html.contains("<strong>markdown</strong>"));
    }

    #[actix_rt::test]
    async fn get_by_uuid_skips_slug_lookup() {
        let mut post = draft("Live", "live");
        post.publish();
        let id = post.id;
        let mut repo = MockBlogPostRepository::new();
        repo.expect_get_post().returning(move |_| Ok(post.clone()));
        repo.expect_get_post_by_slug().never();

        let handler = BlogPostHandler::new(repo, "Owner");
        let detail = handler.get_post(&id.to_string(), false).await.unwrap();
        assert_eq!(detail.post.slug, "live");
    }

    #[actix_rt::test]
    async fn publish_sets_published_at() {
        let post = draft("Soon", "soon");
        let id = post.id;
        let mut repo = MockBlogPostRepository::new();
        repo.expect_get_post().returning(move |_| Ok(post.clone()));
        repo.expect_update_post().times(1).returning(|_| Ok(()));

        let handler = BlogPostHandler::new(repo, "Owner");
        let published = handler.publish_post(&id.to_string()).await.unwrap();
        assert!(published.published);
        assert!(published.published_at.is_some());
    }

    #[actix_rt::test]
    async fn duplicate_is_an_unpublished_copy() {
        let mut source = draft("Guide", "guide");
        source.publish();
        source.views = 40;
        let id = source.id;

        let mut repo = MockBlogPostRepository::new();
        let lookup = source.clone();
        repo.expect_get_post().returning(move |_| Ok(lookup.clone()));
        let all = vec![source.clone()];
        repo.expect_list_posts().returning(move || Ok(all.clone()));
        repo.expect_insert_post().times(1).returning(|_| Ok(()));

        let handler = BlogPostHandler::new(repo, "Owner");
        let copy = handler.duplicate_post(&id.to_string()).await.unwrap();
        assert_eq!(copy.slug, "guide-copy");
        assert!(!copy.published);
        assert_eq!(copy.views, 0);
    }
}
