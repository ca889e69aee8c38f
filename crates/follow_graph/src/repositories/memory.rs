use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{FollowStore, UserStore};
use crate::{
    models::{
        user_follows::{FollowStats, UserFollow},
        users::{NewUser, User},
    },
    utils::{api_errors::ApiError, range::ListRange},
};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    // Insertion order, oldest first.
    follows: Vec<UserFollow>,
}

/// Users and follow edges held in process memory.
///
/// Backs the `memory` storage backend and the test suites.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn list<F>(&self, range: ListRange, select: F) -> Vec<Uuid>
    where
        F: Fn(&UserFollow) -> Option<Uuid>,
    {
        let state = self.state.read().await;
        let mut edges: Vec<&UserFollow> = state
            .follows
            .iter()
            .filter(|edge| select(*edge).is_some())
            .collect();
        // Stable sort keeps later inserts first among equal timestamps.
        edges.reverse();
        edges.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        match range.resolve(edges.len()) {
            Some(window) => edges[window].iter().filter_map(|edge| select(*edge)).collect(),
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create(&self, user: NewUser) -> Result<Option<User>, ApiError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Ok(None);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(Some(user))
    }

    async fn exists(&self, id: Uuid) -> Result<bool, ApiError> {
        Ok(self.state.read().await.users.contains_key(&id))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, ApiError> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl FollowStore for InMemoryStore {
    async fn insert(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<bool, ApiError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&follower_id) || !state.users.contains_key(&followed_id) {
            return Err(ApiError::NoUser);
        }
        if state
            .follows
            .iter()
            .any(|f| f.follower_id == follower_id && f.followed_id == followed_id)
        {
            return Ok(false);
        }

        state.follows.push(UserFollow {
            follower_id,
            followed_id,
            created_at,
        });
        Ok(true)
    }

    async fn remove(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, ApiError> {
        let mut state = self.state.write().await;
        let before = state.follows.len();
        state
            .follows
            .retain(|f| !(f.follower_id == follower_id && f.followed_id == followed_id));
        Ok(state.follows.len() < before)
    }

    async fn contains(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, ApiError> {
        let state = self.state.read().await;
        Ok(state
            .follows
            .iter()
            .any(|f| f.follower_id == follower_id && f.followed_id == followed_id))
    }

    async fn following(&self, user_id: Uuid, range: ListRange) -> Result<Vec<Uuid>, ApiError> {
        Ok(self
            .list(range, |f| (f.follower_id == user_id).then_some(f.followed_id))
            .await)
    }

    async fn followers(&self, user_id: Uuid, range: ListRange) -> Result<Vec<Uuid>, ApiError> {
        Ok(self
            .list(range, |f| (f.followed_id == user_id).then_some(f.follower_id))
            .await)
    }

    async fn count_following(&self, user_id: Uuid) -> Result<i64, ApiError> {
        let state = self.state.read().await;
        Ok(state
            .follows
            .iter()
            .filter(|f| f.follower_id == user_id)
            .count() as i64)
    }

    async fn count_followers(&self, user_id: Uuid) -> Result<i64, ApiError> {
        let state = self.state.read().await;
        Ok(state
            .follows
            .iter()
            .filter(|f| f.followed_id == user_id)
            .count() as i64)
    }

    async fn count_many(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, FollowStats>, ApiError> {
        let state = self.state.read().await;
        let mut stats: HashMap<Uuid, FollowStats> = user_ids
            .iter()
            .map(|id| (*id, FollowStats::default()))
            .collect();
        for edge in &state.follows {
            if let Some(s) = stats.get_mut(&edge.follower_id) {
                s.following_count += 1;
            }
            if let Some(s) = stats.get_mut(&edge.followed_id) {
                s.follower_count += 1;
            }
        }
        Ok(stats)
    }
}
