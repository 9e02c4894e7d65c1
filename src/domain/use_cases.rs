pub mod blog;
pub mod chat;
pub mod extractors;
pub mod forms;
pub mod listing;
pub mod projects;
pub mod slug;
pub mod tags;
