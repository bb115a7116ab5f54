use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// User-facing error messages shared by handlers and validators.
pub mod msg {
    pub const UNAUTHORIZED: &str = "Unauthorized";
    pub const FORBIDDEN: &str = "Forbidden";
    pub const ADMIN_REQUIRED: &str = "Forbidden: Admin access required";
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

    pub const EMAIL_EXISTS: &str = "Email already exists";
    pub const INVALID_EMAIL_FORMAT: &str = "Invalid email format";
    pub const WEAK_PASSWORD: &str = "Password is too weak";
    pub const EMAIL_REQUIRED: &str = "\"email\" is required";
    pub const PASSWORD_REQUIRED: &str = "\"password\" is required";

    pub const RECIPE_NOT_FOUND: &str = "Recipe not found";
    pub const INGREDIENT_NOT_FOUND: &str = "Ingredient not found";
    pub const REVIEW_NOT_FOUND: &str = "Review not found";
    pub const FAVORITE_NOT_FOUND: &str = "Favorite not found";
    pub const USER_NOT_FOUND: &str = "User not found";
    pub const ALREADY_FAVORITED: &str = "Recipe is already in favorites";

    pub const EMPTY_UPDATE: &str = "At least one field must be provided";
    pub const INVALID_ROLE: &str = "\"role\" must be one of [user, admin]";
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Rate limited: {message}")]
    RateLimited {
        message: &'static str,
        retry_after: &'static str,
        retry_after_secs: u64,
    },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Forbidden: Admin access required")]
    AdminRequired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after: Option<&'static str>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            retry_after: None,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::RateLimited {
                message,
                retry_after,
                retry_after_secs,
            } => {
                let body = ErrorResponse {
                    error: message.to_string(),
                    retry_after: Some(retry_after),
                };
                let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                return response;
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, ErrorResponse::new(msg::UNAUTHORIZED)),
            AppError::Forbidden => (StatusCode::FORBIDDEN, ErrorResponse::new(msg::FORBIDDEN)),
            AppError::AdminRequired => {
                (StatusCode::FORBIDDEN, ErrorResponse::new(msg::ADMIN_REQUIRED))
            }
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new(msg::INVALID_CREDENTIALS),
            ),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, ErrorResponse::new(m)),
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, ErrorResponse::new(m)),
            AppError::Conflict(m) => (StatusCode::CONFLICT, ErrorResponse::new(m)),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                internal()
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                internal()
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {}", e);
                internal()
            }
            AppError::Internal(m) => {
                tracing::error!("Internal error: {}", m);
                internal()
            }
        };

        (status, Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, ErrorResponse) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse::new("Internal server error"),
    )
}

pub type Result<T> = std::result::Result<T, AppError>;
