use chrono::Utc;
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    models::user_follows::FollowStats,
    repositories::{FollowStore, UserStore},
    utils::{api_errors::ApiError, range::ListRange},
};

/// The directed "follows" relation between users.
#[derive(Clone)]
pub struct FollowService {
    user_store: Arc<dyn UserStore>,
    follow_store: Arc<dyn FollowStore>,
}

impl FollowService {
    pub fn new(user_store: Arc<dyn UserStore>, follow_store: Arc<dyn FollowStore>) -> Self {
        Self {
            user_store,
            follow_store,
        }
    }

    fn validate_pair(follower_id: Uuid, followed_id: Uuid) -> Result<(), ApiError> {
        if follower_id.is_nil() || followed_id.is_nil() {
            return Err(ApiError::InvalidUid);
        }
        if follower_id == followed_id {
            return Err(ApiError::SelfFollow);
        }
        Ok(())
    }

    async fn ensure_exists(&self, user_id: Uuid) -> Result<(), ApiError> {
        if !self.user_store.exists(user_id).await? {
            debug!("User {} does not exist", user_id);
            return Err(ApiError::NoUser);
        }
        Ok(())
    }

    /// Makes `follower_id` follow `followed_id`.
    ///
    /// Fails with [`ApiError::SelfFollow`], [`ApiError::NoUser`] or
    /// [`ApiError::AlreadyFollowing`]; the edge set is untouched on failure.
    #[instrument(skip(self))]
    pub async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), ApiError> {
        Self::validate_pair(follower_id, followed_id)?;
        self.ensure_exists(follower_id).await?;
        self.ensure_exists(followed_id).await?;

        let inserted = self
            .follow_store
            .insert(follower_id, followed_id, Utc::now())
            .await?;
        if !inserted {
            return Err(ApiError::AlreadyFollowing);
        }

        debug!("User {} now follows {}", follower_id, followed_id);
        Ok(())
    }

    /// Removes the edge if present. Returns whether an edge was removed.
    #[instrument(skip(self))]
    pub async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, ApiError> {
        Self::validate_pair(follower_id, followed_id)?;

        let removed = self.follow_store.remove(follower_id, followed_id).await?;
        if removed {
            debug!("User {} unfollowed {}", follower_id, followed_id);
        } else {
            debug!("User {} was not following {}", follower_id, followed_id);
        }
        Ok(removed)
    }

    pub async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, ApiError> {
        if follower_id.is_nil() || followed_id.is_nil() {
            return Ok(false);
        }
        self.follow_store.contains(follower_id, followed_id).await
    }

    /// Users followed by `user_id`, most recent first, windowed by `range`.
    pub async fn get_following(&self, user_id: Uuid, range: ListRange) -> Result<Vec<Uuid>, ApiError> {
        if user_id.is_nil() {
            return Ok(Vec::new());
        }
        self.follow_store.following(user_id, range).await
    }

    /// Users following `user_id`, most recent first, windowed by `range`.
    pub async fn get_followers(&self, user_id: Uuid, range: ListRange) -> Result<Vec<Uuid>, ApiError> {
        if user_id.is_nil() {
            return Ok(Vec::new());
        }
        self.follow_store.followers(user_id, range).await
    }

    pub async fn follow_stats(&self, user_id: Uuid) -> Result<FollowStats, ApiError> {
        if user_id.is_nil() {
            return Ok(FollowStats::default());
        }
        Ok(FollowStats {
            following_count: self.follow_store.count_following(user_id).await?,
            follower_count: self.follow_store.count_followers(user_id).await?,
        })
    }

    /// Stats for every id in `user_ids`, zeroed for users without edges.
    pub async fn follow_stats_many(
        &self,
        user_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, FollowStats>, ApiError> {
        let ids: Vec<Uuid> = user_ids.iter().copied().filter(|id| !id.is_nil()).collect();
        let mut stats = self.follow_store.count_many(&ids).await?;
        for id in user_ids {
            stats.entry(*id).or_default();
        }
        Ok(stats)
    }
}
