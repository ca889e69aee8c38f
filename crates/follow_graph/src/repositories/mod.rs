use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    models::{
        user_follows::FollowStats,
        users::{NewUser, User},
    },
    utils::{api_errors::ApiError, range::ListRange},
};

pub mod follow_repository;
pub mod memory;
pub mod redis_follow_repository;
pub mod user_repository;

/// Owner of user accounts. The follow graph only asks it whether ids exist.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Allocates an id and stores the user. `None` if the username is taken.
    async fn create(&self, user: NewUser) -> Result<Option<User>, ApiError>;

    async fn exists(&self, id: Uuid) -> Result<bool, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError>;

    /// Users for `ids`, in no particular order. Unknown ids are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, ApiError>;
}

/// The set of directed follow edges.
///
/// Listings are ordered most recent follow first.
#[async_trait]
pub trait FollowStore: Send + Sync {
    /// Atomically inserts the edge. Returns `false` if it was already present.
    async fn insert(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<bool, ApiError>;

    /// Returns `false` if there was no such edge.
    async fn remove(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, ApiError>;

    async fn contains(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, ApiError>;

    async fn following(&self, user_id: Uuid, range: ListRange) -> Result<Vec<Uuid>, ApiError>;

    async fn followers(&self, user_id: Uuid, range: ListRange) -> Result<Vec<Uuid>, ApiError>;

    async fn count_following(&self, user_id: Uuid) -> Result<i64, ApiError>;

    async fn count_followers(&self, user_id: Uuid) -> Result<i64, ApiError>;

    /// Counts for several users in one round trip. Users without edges may be
    /// missing from the map.
    async fn count_many(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, FollowStats>, ApiError>;
}
