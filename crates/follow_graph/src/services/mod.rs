pub mod follow_service;
pub mod redis_service;
pub mod user_service;
