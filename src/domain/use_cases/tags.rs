use crate::{
    entities::tag::TagCount,
    errors::AppError,
    repositories::blog_post::BlogPostRepository,
};

pub const TOP_TAGS_LIMIT: usize = 20;

pub struct TagHandler<R>
where
    R: BlogPostRepository,
{
    pub blog_post_repo: R,
}

impl<R> TagHandler<R>
where
    R: BlogPostRepository,
{
    pub fn new(blog_post_repo: R) -> Self {
        TagHandler { blog_post_repo }
    }

    /// Most used tags across published posts.
    pub async fn top_tags(&self) -> Result<Vec<TagCount>, AppError> {
        self.blog_post_repo.tag_counts(TOP_TAGS_LIMIT).await
    }
}
