use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde_json::json;
use std::fmt;

use crate::routes::paths;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Forbidden(String),
    /// Anonymous visitor on a login-only page; `next` is where to come back to.
    LoginRequired { next: String },
    InvalidRequest(String),
    DatabaseError(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(what) => write!(f, "Not found: {}", what),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::LoginRequired { next } => write!(f, "Login required to access {}", next),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::LoginRequired { next } => {
                return (StatusCode::FOUND, [(header::LOCATION, paths::login_with_next(next))])
                    .into_response();
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
