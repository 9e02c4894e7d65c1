pub mod blog_post;
pub mod chat;
pub mod option_fields;
pub mod project;
pub mod tag;
pub mod token;
pub mod upload;
pub mod validation;
