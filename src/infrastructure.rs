pub mod auth {
    pub mod jwt;
}
pub mod chat {
    pub mod openai;
}
pub mod db {
    pub mod postgres;
    pub mod seed;
}
pub mod limiter {
    pub mod rate_limiter;
}
pub mod storage {
    pub mod images;
}
pub mod utils {
    pub mod get_client_ip;
    pub mod markdown;
    pub mod valid_uuid;
}
