pub mod blog_post;
pub mod completion;
pub mod memory;
pub mod project;
pub mod sqlx_repo;
