use axum::{http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::user_follows::FollowStats;

#[derive(Clone, Debug, PartialEq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Attributes of a user that has not been given an id yet.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub password_hash: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Default, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub following_count: i64,
    pub follower_count: i64,
}

impl UserResponse {
    pub fn with_stats(user: User, stats: FollowStats) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            following_count: stats.following_count,
            follower_count: stats.follower_count,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse::with_stats(user, FollowStats::default())
    }
}

impl IntoResponse for UserResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}
