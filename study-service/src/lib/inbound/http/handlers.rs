use auth::AuthError;
use auth::PasswordError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::plan::errors::PlanError;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

pub mod add_session;
pub mod create_plan;
pub mod create_user;
pub mod delete_session;
pub mod get_current_user;
pub mod get_plan;
pub mod list_plans;
pub mod login;
pub mod plan_data;
pub mod update_session;

/// Body message shared by every rejected bearer token.
pub const UNAUTHENTICATED_MESSAGE: &str = "Invalid or expired token";

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl ApiError {
    pub fn unauthenticated() -> Self {
        ApiError::Unauthorized(UNAUTHENTICATED_MESSAGE.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::UsernameAlreadyExists(_) | UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict(err.to_string())
            }
            UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::Password(PasswordError::EmptyPassword) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            UserError::Password(_) | UserError::DatabaseError(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::PlanNotFound(_) | PlanError::SessionNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            PlanError::InvalidPlanId(_)
            | PlanError::InvalidSessionId(_)
            | PlanError::InvalidTitle(_)
            | PlanError::InvalidDateRange
            | PlanError::InvalidDuration(_)
            | PlanError::InvalidStatus(_) => ApiError::UnprocessableEntity(err.to_string()),
            PlanError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
            }
            AuthError::InvalidToken | AuthError::ExpiredToken | AuthError::UnknownUser => {
                ApiError::unauthenticated()
            }
            AuthError::MissingSecret
            | AuthError::TokenIssuance(_)
            | AuthError::Password(_)
            | AuthError::Store(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Public view of a user. The password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_rejections_share_one_response() {
        let expected = ApiError::Unauthorized(UNAUTHENTICATED_MESSAGE.to_string());

        assert_eq!(ApiError::from(AuthError::InvalidToken), expected);
        assert_eq!(ApiError::from(AuthError::ExpiredToken), expected);
        assert_eq!(ApiError::from(AuthError::UnknownUser), expected);
    }

    #[test]
    fn test_invalid_credentials_message() {
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_store_failure_is_internal() {
        assert!(matches!(
            ApiError::from(AuthError::Store("connection refused".to_string())),
            ApiError::InternalServerError(_)
        ));
    }

    #[test]
    fn test_plan_error_mapping() {
        assert!(matches!(
            ApiError::from(PlanError::PlanNotFound("x".to_string())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(PlanError::InvalidDateRange),
            ApiError::UnprocessableEntity(_)
        ));
    }

    #[test]
    fn test_user_error_mapping() {
        assert!(matches!(
            ApiError::from(UserError::UsernameAlreadyExists("alice".to_string())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::EmailAlreadyExists("a@example.com".to_string())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::DatabaseError("connection refused".to_string())),
            ApiError::InternalServerError(_)
        ));
    }

    #[test]
    fn test_empty_password_is_unprocessable() {
        assert!(matches!(
            ApiError::from(UserError::Password(PasswordError::EmptyPassword)),
            ApiError::UnprocessableEntity(_)
        ));
    }
}
