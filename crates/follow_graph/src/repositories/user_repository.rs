use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::UserStore;
use crate::{
    models::users::{NewUser, User},
    utils::api_errors::ApiError,
};

pub struct UserRepository {
    db: Arc<PgPool>,
}

impl UserRepository {
    pub fn new(db: Arc<PgPool>) -> Self {
        UserRepository { db }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, user: NewUser) -> Result<Option<User>, ApiError> {
        let query = r#"
        INSERT INTO social.users (id, username, password_hash, created_at)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (username) DO NOTHING
        RETURNING id, username, password_hash, created_at
        "#;
        let user = sqlx::query_as::<_, User>(query)
            .bind(Uuid::new_v4())
            .bind(&user.username)
            .bind(&user.password_hash)
            .fetch_optional(self.db.as_ref())
            .await?;

        Ok(user)
    }

    async fn exists(&self, id: Uuid) -> Result<bool, ApiError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM social.users WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(self.db.as_ref())
        .await?;

        Ok(exists)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM social.users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.db.as_ref())
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM social.users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.db.as_ref())
        .await?;

        Ok(user)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM social.users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(self.db.as_ref())
        .await?;

        Ok(users)
    }
}
