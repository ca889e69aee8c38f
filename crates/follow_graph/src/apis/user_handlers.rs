use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::api_models::{
    query::RangeQuery,
    request::{CreateUserRequest, FollowUnfollowUserBody},
    response::{FollowStatusResponse, UnfollowResponse},
};
use crate::{
    models::users::UserResponse,
    utils::errors::{app_error::AppError, error_payload::ErrorPayload},
    AppState,
};

const TAG: &str = "users";

/// Create a user
#[utoipa::path(
    post,
    tag = TAG,
    path = "/",
    operation_id = "createUser",
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid username", body = ErrorPayload),
        (status = 409, description = "Username taken", body = ErrorPayload),
        (status = 500, description = "Internal server error", body = ErrorPayload)
    ),
    request_body = CreateUserRequest
)]
pub(super) async fn create_user(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state
        .user_service
        .create(&body.username, body.password.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Get a user with follow counts
#[utoipa::path(
    get,
    tag = TAG,
    path = "/{id}",
    operation_id = "getUser",
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorPayload),
        (status = 500, description = "Internal server error", body = ErrorPayload)
    ),
    params(
        ("id" = Uuid, Path, description = "User ID")
    )
)]
pub(super) async fn get_user(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .user_service
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
}

/// Follow a user
#[utoipa::path(
    post,
    tag = TAG,
    path = "/{id}/follow",
    operation_id = "followUser",
    responses(
        (status = 200, description = "User followed successfully"),
        (status = 400, description = "Invalid user id or self follow", body = ErrorPayload),
        (status = 404, description = "User not found", body = ErrorPayload),
        (status = 409, description = "User already followed", body = ErrorPayload),
        (status = 500, description = "Internal server error", body = ErrorPayload)
    ),
    params(
        ("id" = Uuid, Path, description = "User ID to follow")
    ),
    request_body = FollowUnfollowUserBody
)]
pub(super) async fn follow_user(
    State(app_state): State<Arc<AppState>>,
    Path(followed_id): Path<Uuid>,
    Json(body): Json<FollowUnfollowUserBody>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .follow_service
        .follow(body.follower_id, followed_id)
        .await?;
    Ok(StatusCode::OK)
}

/// Unfollow a user
#[utoipa::path(
    post,
    tag = TAG,
    path = "/{id}/unfollow",
    operation_id = "unfollowUser",
    responses(
        (status = 200, description = "User unfollowed, or was not followed", body = UnfollowResponse),
        (status = 400, description = "Invalid user id or self unfollow", body = ErrorPayload),
        (status = 500, description = "Internal server error", body = ErrorPayload)
    ),
    params(
        ("id" = Uuid, Path, description = "User ID to unfollow")
    ),
    request_body = FollowUnfollowUserBody
)]
pub(super) async fn unfollow_user(
    State(app_state): State<Arc<AppState>>,
    Path(followed_id): Path<Uuid>,
    Json(body): Json<FollowUnfollowUserBody>,
) -> Result<impl IntoResponse, AppError> {
    let removed = app_state
        .follow_service
        .unfollow(body.follower_id, followed_id)
        .await?;
    Ok((StatusCode::OK, Json(UnfollowResponse { removed })))
}

/// Get the users a user is following
#[utoipa::path(
    get,
    tag = TAG,
    path = "/{id}/following",
    operation_id = "getFollowing",
    responses(
        (status = 200, description = "Followed users, most recent first", body = Vec<UserResponse>),
        (status = 500, description = "Internal server error", body = ErrorPayload)
    ),
    params(
        ("id" = Uuid, Path, description = "User ID"),
        RangeQuery
    )
)]
pub(super) async fn get_following(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Query(range): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let ids = app_state
        .follow_service
        .get_following(user_id, range.into())
        .await?;
    let users = app_state.user_service.get_users(&ids).await?;
    Ok((StatusCode::OK, Json(users)))
}

/// Get followers of a user
#[utoipa::path(
    get,
    tag = TAG,
    path = "/{id}/followers",
    operation_id = "getFollowers",
    responses(
        (status = 200, description = "Followers, most recent first", body = Vec<UserResponse>),
        (status = 500, description = "Internal server error", body = ErrorPayload)
    ),
    params(
        ("id" = Uuid, Path, description = "User ID"),
        RangeQuery
    )
)]
pub(super) async fn get_followers(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Query(range): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let ids = app_state
        .follow_service
        .get_followers(user_id, range.into())
        .await?;
    let users = app_state.user_service.get_users(&ids).await?;
    Ok((StatusCode::OK, Json(users)))
}

/// Check whether a user follows another
#[utoipa::path(
    get,
    tag = TAG,
    path = "/{id}/following/{followed_id}",
    operation_id = "isFollowing",
    responses(
        (status = 200, description = "Follow status", body = FollowStatusResponse),
        (status = 500, description = "Internal server error", body = ErrorPayload)
    ),
    params(
        ("id" = Uuid, Path, description = "Follower ID"),
        ("followed_id" = Uuid, Path, description = "Followed user ID")
    )
)]
pub(super) async fn is_following(
    State(app_state): State<Arc<AppState>>,
    Path((follower_id, followed_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let following = app_state
        .follow_service
        .is_following(follower_id, followed_id)
        .await?;
    Ok((StatusCode::OK, Json(FollowStatusResponse { following })))
}
