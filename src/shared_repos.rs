use std::{fmt, sync::Arc};

use crate::{
    db::{postgres::create_pool, seed::seed_if_empty},
    errors::AppError,
    repositories::{
        blog_post::DynBlogPostRepo,
        memory::{InMemoryBlogPostRepo, InMemoryProjectRepo},
        project::DynProjectRepo,
        sqlx_repo::{SqlxBlogPostRepo, SqlxProjectRepo},
    },
    settings::AppConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    InMemory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Postgres => write!(f, "postgres"),
            StorageBackend::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Clone)]
pub struct SharedRepositories {
    pub backend: StorageBackend,
    pub project_repo: DynProjectRepo,
    pub blog_post_repo: DynBlogPostRepo,
}

impl SharedRepositories {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        SharedRepositories {
            backend: StorageBackend::Postgres,
            project_repo: Arc::new(SqlxProjectRepo::new(pool.clone())),
            blog_post_repo: Arc::new(SqlxBlogPostRepo::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        SharedRepositories {
            backend: StorageBackend::InMemory,
            project_repo: Arc::new(InMemoryProjectRepo::new()),
            blog_post_repo: Arc::new(InMemoryBlogPostRepo::new()),
        }
    }

    /// Postgres when `database_url` is set, otherwise process memory.
    /// Sample content is loaded into empty stores when `seed_mock_data`.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let repos = match config.database_url.as_deref() {
            Some(url) => Self::postgres(create_pool(url).await?),
            None => {
                tracing::warn!("No database_url configured; using in-memory storage");
                Self::in_memory()
            }
        };

        if config.seed_mock_data {
            seed_if_empty(&*repos.project_repo, &*repos.blog_post_repo, &config.owner_name).await?;
        }
        Ok(repos)
    }
}
