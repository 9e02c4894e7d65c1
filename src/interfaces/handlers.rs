pub mod blog_posts;
pub mod chat;
pub mod home;
pub mod json_response;
pub mod projects;
pub mod system;
pub mod tags;
pub mod uploads;
pub mod users;
