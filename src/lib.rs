mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod shared_repos;
pub mod startup;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, chat, db, limiter, storage, utils};

use auth::jwt::JwtService;
use chat::openai::HttpCompletionClient;
use limiter::rate_limiter::RateLimiter;
use repositories::{blog_post::DynBlogPostRepo, project::DynProjectRepo};
use shared_repos::{SharedRepositories, StorageBackend};
use storage::images::ImageStore;
use use_cases::{blog::BlogPostHandler, chat::ChatHandler, projects::ProjectHandler, tags::TagHandler};

pub struct AppState {
    pub owner_name: String,
    pub storage_backend: StorageBackend,
    pub project_handler: AppProjectHandler,
    pub blog_handler: AppBlogPostHandler,
    pub tag_handler: AppTagHandler,
    pub chat_handler: AppChatHandler,
    pub chat_configured: bool,
    pub chat_limiter: RateLimiter,
    pub jwt_service: JwtService,
    pub image_store: ImageStore,
    pub trust_x_forwarded_for: bool,
}

pub type AppProjectHandler = ProjectHandler<DynProjectRepo>;
pub type AppBlogPostHandler = BlogPostHandler<DynBlogPostRepo>;
pub type AppTagHandler = TagHandler<DynBlogPostRepo>;
pub type AppChatHandler = ChatHandler<HttpCompletionClient>;

impl AppState {
    pub fn new(config: &settings::AppConfig, repos: SharedRepositories) -> Self {
        let completion_client = HttpCompletionClient::new(config);
        let chat_configured = completion_client.is_configured();
        if !chat_configured {
            tracing::warn!("No chat_api_url configured; chat will answer with canned replies");
        }

        AppState {
            owner_name: config.owner_name.clone(),
            storage_backend: repos.backend,
            project_handler: ProjectHandler::new(repos.project_repo),
            blog_handler: BlogPostHandler::new(repos.blog_post_repo.clone(), &config.owner_name),
            tag_handler: TagHandler::new(repos.blog_post_repo),
            chat_handler: ChatHandler::new(completion_client, &config.owner_name),
            chat_configured,
            chat_limiter: RateLimiter::per_minute(config.chat_rate_limit_per_minute),
            jwt_service: JwtService::new(config),
            image_store: ImageStore::new(config),
            trust_x_forwarded_for: config.trust_x_forwarded_for,
        }
    }
}
