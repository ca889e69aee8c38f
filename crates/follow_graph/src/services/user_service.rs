use std::{collections::HashMap, sync::Arc};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::follow_service::FollowService;
use crate::{
    models::users::{NewUser, User, UserResponse},
    repositories::UserStore,
    utils::{api_errors::ApiError, password::PasswordHasher},
};

pub const MIN_USERNAME_LENGTH: usize = 2;
pub const MAX_USERNAME_LENGTH: usize = 24;

/// Argon2 is CPU bound, so hashing runs on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))?
}

#[derive(Clone)]
pub struct UserService {
    user_store: Arc<dyn UserStore>,
    follow_service: FollowService,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(user_store: Arc<dyn UserStore>, follow_service: FollowService) -> Self {
        Self::with_hasher(user_store, follow_service, PasswordHasher::default())
    }

    pub fn with_hasher(
        user_store: Arc<dyn UserStore>,
        follow_service: FollowService,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            user_store,
            follow_service,
            hasher,
        }
    }

    #[instrument(skip(self, password))]
    pub async fn create(&self, username: &str, password: Option<&str>) -> Result<User, ApiError> {
        let username = username.trim();
        let length = username.chars().count();
        if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
            return Err(ApiError::InvalidUsername);
        }

        let password_hash = match password {
            Some(password) => {
                let hasher = self.hasher.clone();
                let password = password.to_string();
                Some(run_blocking(move || hasher.hash(&password)).await?)
            }
            None => None,
        };

        let user = self
            .user_store
            .create(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await?
            .ok_or(ApiError::UsernameTaken)?;

        debug!("Created user {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserResponse>, ApiError> {
        let user = match self.user_store.find_by_id(id).await? {
            Some(user) => user,
            None => return Ok(None),
        };
        let stats = self.follow_service.follow_stats(user.id).await?;
        Ok(Some(UserResponse::with_stats(user, stats)))
    }

    /// Users for `ids` in the same order, skipping ids that no longer exist.
    pub async fn get_users(&self, ids: &[Uuid]) -> Result<Vec<UserResponse>, ApiError> {
        let mut users: HashMap<Uuid, User> = self
            .user_store
            .find_many(ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let found: Vec<User> = ids.iter().filter_map(|id| users.remove(id)).collect();
        let ids: Vec<Uuid> = found.iter().map(|user| user.id).collect();
        let stats = self.follow_service.follow_stats_many(&ids).await?;

        Ok(found
            .into_iter()
            .map(|user| {
                let user_stats = stats.get(&user.id).copied().unwrap_or_default();
                UserResponse::with_stats(user, user_stats)
            })
            .collect())
    }

    /// Checks `password` against the stored hash of `username`. The username
    /// is trimmed the same way [`UserService::create`] trims it.
    pub async fn verify_password(&self, username: &str, password: &str) -> Result<bool, ApiError> {
        let user = self.user_store.find_by_username(username.trim()).await?;
        match user.and_then(|user| user.password_hash) {
            Some(hash) => {
                let hasher = self.hasher.clone();
                let password = password.to_string();
                run_blocking(move || hasher.verify(&password, &hash)).await
            }
            None => Ok(false),
        }
    }
}
