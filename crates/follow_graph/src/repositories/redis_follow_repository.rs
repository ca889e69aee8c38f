use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc};
use tracing::warn;
use uuid::Uuid;

use super::FollowStore;
use crate::{
    models::user_follows::FollowStats,
    services::redis_service::RedisService,
    utils::{api_errors::ApiError, range::ListRange, redis_keys::RedisKeys},
};

/// Follow edges kept as two sorted sets per user, `following:{uid}` and
/// `followers:{uid}`, scored by follow time in milliseconds.
pub struct RedisFollowRepository {
    redis: Arc<RedisService>,
}

impl RedisFollowRepository {
    pub fn new(redis: Arc<RedisService>) -> Self {
        Self { redis }
    }

    async fn list(&self, key: &str, range: ListRange) -> Result<Vec<Uuid>, ApiError> {
        let members = self
            .redis
            .zrevrange(key, range.start as isize, range.stop as isize)
            .await?;

        Ok(members
            .into_iter()
            .filter_map(|member| match Uuid::parse_str(&member) {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!("Skipping malformed member {:?} in {}: {}", member, key, e);
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl FollowStore for RedisFollowRepository {
    async fn insert(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<bool, ApiError> {
        let score = created_at.timestamp_millis();
        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("ZADD")
            .arg(RedisKeys::get_following_key(follower_id))
            .arg("NX")
            .arg(score)
            .arg(followed_id.to_string())
            .cmd("ZADD")
            .arg(RedisKeys::get_followers_key(followed_id))
            .arg("NX")
            .arg(score)
            .arg(follower_id.to_string());

        let (added, _): (i64, i64) = self.redis.execute_pipe(pipe).await?;
        Ok(added == 1)
    }

    async fn remove(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, ApiError> {
        let mut pipe = redis::pipe();
        pipe.atomic()
            .zrem(
                RedisKeys::get_following_key(follower_id),
                followed_id.to_string(),
            )
            .zrem(
                RedisKeys::get_followers_key(followed_id),
                follower_id.to_string(),
            );

        let (removed, _): (i64, i64) = self.redis.execute_pipe(pipe).await?;
        Ok(removed > 0)
    }

    async fn contains(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, ApiError> {
        let score = self
            .redis
            .zscore(
                &RedisKeys::get_following_key(follower_id),
                &followed_id.to_string(),
            )
            .await?;

        Ok(score.is_some())
    }

    async fn following(&self, user_id: Uuid, range: ListRange) -> Result<Vec<Uuid>, ApiError> {
        self.list(&RedisKeys::get_following_key(user_id), range)
            .await
    }

    async fn followers(&self, user_id: Uuid, range: ListRange) -> Result<Vec<Uuid>, ApiError> {
        self.list(&RedisKeys::get_followers_key(user_id), range)
            .await
    }

    async fn count_following(&self, user_id: Uuid) -> Result<i64, ApiError> {
        Ok(self
            .redis
            .zcard(&RedisKeys::get_following_key(user_id))
            .await?)
    }

    async fn count_followers(&self, user_id: Uuid) -> Result<i64, ApiError> {
        Ok(self
            .redis
            .zcard(&RedisKeys::get_followers_key(user_id))
            .await?)
    }

    async fn count_many(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, FollowStats>, ApiError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut pipe = redis::pipe();
        for id in user_ids {
            pipe.zcard(RedisKeys::get_following_key(*id))
                .zcard(RedisKeys::get_followers_key(*id));
        }
        let counts: Vec<i64> = self.redis.execute_pipe(pipe).await?;

        Ok(user_ids
            .iter()
            .zip(counts.chunks_exact(2))
            .map(|(id, pair)| {
                let stats = FollowStats {
                    following_count: pair[0],
                    follower_count: pair[1],
                };
                (*id, stats)
            })
            .collect())
    }
}
