use uuid::Uuid;

pub struct RedisKeys;

impl RedisKeys {
    // Sorted sets scored by follow time in milliseconds
    pub const FOLLOWING_PREFIX: &'static str = "following:";
    pub const FOLLOWERS_PREFIX: &'static str = "followers:";

    pub fn get_following_key(user_id: Uuid) -> String {
        format!("{}{}", Self::FOLLOWING_PREFIX, user_id)
    }

    pub fn get_followers_key(user_id: Uuid) -> String {
        format!("{}{}", Self::FOLLOWERS_PREFIX, user_id)
    }
}
