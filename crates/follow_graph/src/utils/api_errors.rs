use axum::http::StatusCode;

/// Errors returned by the follow graph, the user store and their backends.
///
/// The `Display` of every domain variant is the localization key shown to
/// forum users, e.g. `[[error:already-following]]`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("[[error:invalid-uid]]")]
    InvalidUid,

    #[error("[[error:you-cant-follow-yourself]]")]
    SelfFollow,

    #[error("[[error:no-user]]")]
    NoUser,

    #[error("[[error:already-following]]")]
    AlreadyFollowing,

    #[error("[[error:invalid-username]]")]
    InvalidUsername,

    #[error("[[error:username-taken]]")]
    UsernameTaken,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn code(&self) -> StatusCode {
        match self {
            ApiError::InvalidUid => StatusCode::BAD_REQUEST,
            ApiError::SelfFollow => StatusCode::BAD_REQUEST,
            ApiError::InvalidUsername => StatusCode::BAD_REQUEST,
            ApiError::NoUser => StatusCode::NOT_FOUND,
            ApiError::AlreadyFollowing => StatusCode::CONFLICT,
            ApiError::UsernameTaken => StatusCode::CONFLICT,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RedisError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Symbolic identifier of the error, without the `[[error:...]]` wrapper.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidUid => "invalid-uid",
            ApiError::SelfFollow => "you-cant-follow-yourself",
            ApiError::NoUser => "no-user",
            ApiError::AlreadyFollowing => "already-following",
            ApiError::InvalidUsername => "invalid-username",
            ApiError::UsernameTaken => "username-taken",
            ApiError::DatabaseError(_) => "database-error",
            ApiError::RedisError(_) => "cache-error",
            ApiError::InternalError(_) => "internal-error",
        }
    }

    /// True for failures caused by the caller rather than by a backend.
    pub fn is_expected(&self) -> bool {
        !matches!(
            self,
            ApiError::DatabaseError(_) | ApiError::RedisError(_) | ApiError::InternalError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_render_localization_keys() {
        assert_eq!(
            ApiError::SelfFollow.to_string(),
            "[[error:you-cant-follow-yourself]]"
        );
        assert_eq!(ApiError::NoUser.to_string(), "[[error:no-user]]");
        assert_eq!(
            ApiError::AlreadyFollowing.to_string(),
            "[[error:already-following]]"
        );
    }

    #[test]
    fn message_wraps_kind() {
        for err in [
            ApiError::InvalidUid,
            ApiError::SelfFollow,
            ApiError::NoUser,
            ApiError::AlreadyFollowing,
            ApiError::InvalidUsername,
            ApiError::UsernameTaken,
        ] {
            assert_eq!(err.to_string(), format!("[[error:{}]]", err.kind()));
            assert!(err.is_expected());
        }
    }

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::SelfFollow.code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NoUser.code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::AlreadyFollowing.code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::InternalError("boom".to_string()).code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(!ApiError::InternalError("boom".to_string()).is_expected());
    }
}
