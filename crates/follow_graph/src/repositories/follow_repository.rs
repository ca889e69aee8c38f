use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;
use uuid::Uuid;

use super::FollowStore;
use crate::{
    models::user_follows::FollowStats,
    utils::{api_errors::ApiError, range::ListRange},
};

const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

#[derive(Debug, Clone, Copy)]
enum Direction {
    Following,
    Followers,
}

impl Direction {
    fn list_query(self) -> &'static str {
        match self {
            Direction::Following => {
                r#"
                SELECT followed_id FROM social.user_follows
                WHERE follower_id = $1
                ORDER BY created_at DESC, followed_id
                OFFSET $2 LIMIT $3
                "#
            }
            Direction::Followers => {
                r#"
                SELECT follower_id FROM social.user_follows
                WHERE followed_id = $1
                ORDER BY created_at DESC, follower_id
                OFFSET $2 LIMIT $3
                "#
            }
        }
    }

    fn count_query(self) -> &'static str {
        match self {
            Direction::Following => "SELECT COUNT(*) FROM social.user_follows WHERE follower_id = $1",
            Direction::Followers => "SELECT COUNT(*) FROM social.user_follows WHERE followed_id = $1",
        }
    }

    fn grouped_count_query(self) -> &'static str {
        match self {
            Direction::Following => {
                r#"
                SELECT follower_id, COUNT(*) FROM social.user_follows
                WHERE follower_id = ANY($1)
                GROUP BY follower_id
                "#
            }
            Direction::Followers => {
                r#"
                SELECT followed_id, COUNT(*) FROM social.user_follows
                WHERE followed_id = ANY($1)
                GROUP BY followed_id
                "#
            }
        }
    }
}

pub struct FollowRepository {
    db: Arc<PgPool>,
}

impl FollowRepository {
    pub fn new(db: Arc<PgPool>) -> Self {
        FollowRepository { db }
    }

    async fn count(&self, direction: Direction, user_id: Uuid) -> Result<i64, ApiError> {
        let count = sqlx::query_scalar::<_, i64>(direction.count_query())
            .bind(user_id)
            .fetch_one(self.db.as_ref())
            .await?;

        Ok(count)
    }

    async fn grouped_counts(
        &self,
        direction: Direction,
        user_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, i64)>, ApiError> {
        let rows = sqlx::query_as::<_, (Uuid, i64)>(direction.grouped_count_query())
            .bind(user_ids)
            .fetch_all(self.db.as_ref())
            .await?;

        Ok(rows)
    }

    async fn list(
        &self,
        direction: Direction,
        user_id: Uuid,
        range: ListRange,
    ) -> Result<Vec<Uuid>, ApiError> {
        let (offset, limit) = match range.offset_limit() {
            Some(window) => window,
            None => {
                let total = self.count(direction, user_id).await?;
                match range.resolve(total as usize) {
                    Some(window) => (window.start as i64, Some(window.len() as i64)),
                    None => return Ok(Vec::new()),
                }
            }
        };

        if limit == Some(0) {
            return Ok(Vec::new());
        }

        let ids = sqlx::query_scalar::<_, Uuid>(direction.list_query())
            .bind(user_id)
            .bind(offset)
            .bind(limit)
            .fetch_all(self.db.as_ref())
            .await?;

        Ok(ids)
    }
}

#[async_trait]
impl FollowStore for FollowRepository {
    async fn insert(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "INSERT INTO social.user_follows (follower_id, followed_id, created_at) VALUES ($1, $2, $3)
             ON CONFLICT (follower_id, followed_id) DO NOTHING",
        )
        .bind(follower_id)
        .bind(followed_id)
        .bind(created_at)
        .execute(self.db.as_ref())
        .await;

        match result {
            Ok(done) => Ok(done.rows_affected() == 1),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
                debug!("Follow references a deleted user: {}", e);
                Err(ApiError::NoUser)
            }
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(CHECK_VIOLATION) => {
                Err(ApiError::SelfFollow)
            }
            Err(e) => Err(ApiError::DatabaseError(e)),
        }
    }

    async fn remove(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, ApiError> {
        let done = sqlx::query(
            "DELETE FROM social.user_follows WHERE follower_id = $1 AND followed_id = $2",
        )
        .bind(follower_id)
        .bind(followed_id)
        .execute(self.db.as_ref())
        .await?;

        Ok(done.rows_affected() > 0)
    }

    async fn contains(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, ApiError> {
        let query = r#"
        SELECT EXISTS (SELECT 1 FROM social.user_follows WHERE follower_id = $1 AND followed_id = $2)
        "#;
        let exists = sqlx::query_scalar::<_, bool>(query)
            .bind(follower_id)
            .bind(followed_id)
            .fetch_one(self.db.as_ref())
            .await?;

        Ok(exists)
    }

    async fn following(&self, user_id: Uuid, range: ListRange) -> Result<Vec<Uuid>, ApiError> {
        self.list(Direction::Following, user_id, range).await
    }

    async fn followers(&self, user_id: Uuid, range: ListRange) -> Result<Vec<Uuid>, ApiError> {
        self.list(Direction::Followers, user_id, range).await
    }

    async fn count_following(&self, user_id: Uuid) -> Result<i64, ApiError> {
        self.count(Direction::Following, user_id).await
    }

    async fn count_followers(&self, user_id: Uuid) -> Result<i64, ApiError> {
        self.count(Direction::Followers, user_id).await
    }

    async fn count_many(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, FollowStats>, ApiError> {
        let mut stats = HashMap::new();
        if user_ids.is_empty() {
            return Ok(stats);
        }

        for (id, count) in self.grouped_counts(Direction::Following, user_ids).await? {
            stats.entry(id).or_insert_with(FollowStats::default).following_count = count;
        }
        for (id, count) in self.grouped_counts(Direction::Followers, user_ids).await? {
            stats.entry(id).or_insert_with(FollowStats::default).follower_count = count;
        }
        Ok(stats)
    }
}
