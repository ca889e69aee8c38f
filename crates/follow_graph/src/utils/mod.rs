pub mod api_errors;
pub mod errors;
pub mod password;
pub mod range;
pub mod redis_keys;
