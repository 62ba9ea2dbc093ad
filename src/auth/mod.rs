//! Who is making the request: session cookies, the `Identity` extractor and
//! account storage.

pub mod password;
pub mod policy;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{session, user};
use crate::error::AppError;
use crate::forms::accounts::RegistrationDraft;
use crate::AppState;

pub const SESSION_COOKIE: &str = "sessionid";

/// The caller of a request. Anonymous visitors are first-class: they may
/// browse, vote, comment and pledge.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    Anonymous,
    User(user::Model),
}

impl Identity {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }

    pub fn user(&self) -> Option<&user::Model> {
        match self {
            Identity::User(user) => Some(user),
            Identity::Anonymous => None,
        }
    }

    pub fn id(&self) -> Option<i32> {
        self.user().map(|user| user.id)
    }

    /// The logged-in user, or a redirect to the login page that returns to `next`.
    pub fn require_login(&self, next: &str) -> Result<&user::Model, AppError> {
        self.user().ok_or_else(|| AppError::LoginRequired {
            next: next.to_string(),
        })
    }
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Ok(Identity::Anonymous);
        };

        let found = session::Entity::find_by_id(token)
            .find_also_related(user::Entity)
            .one(&state.db)
            .await?;

        Ok(match found {
            Some((_, Some(user))) => Identity::User(user),
            _ => Identity::Anonymous,
        })
    }
}

/// Value of the session cookie, if the request carries one.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
        .filter(|token| !token.is_empty())
}

pub fn session_cookie(token: &str) -> String {
    format!("{}={}; HttpOnly; Path=/; SameSite=Lax", SESSION_COOKIE, token)
}

pub fn expired_session_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax", SESSION_COOKIE)
}

/// Start a session for `user_id` and return its token.
pub async fn login<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<String, DbErr> {
    let token = Uuid::new_v4().to_string();
    session::ActiveModel {
        token: Set(token.clone()),
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    tracing::info!(user_id, "session started");
    Ok(token)
}

pub async fn logout<C: ConnectionTrait>(db: &C, token: &str) -> Result<(), DbErr> {
    session::Entity::delete_by_id(token.to_string()).exec(db).await?;
    Ok(())
}

/// Check a username/password pair.
pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    username: &str,
    password: &str,
) -> Result<Option<user::Model>, DbErr> {
    let user = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;
    Ok(user.filter(|user| password::verify_password(password, &user.password_hash)))
}

pub async fn username_taken<C: ConnectionTrait>(db: &C, username: &str) -> Result<bool, DbErr> {
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;
    Ok(existing.is_some())
}

/// Store a newly registered account. The email doubles as the username.
pub async fn create_user<C: ConnectionTrait>(
    db: &C,
    draft: &RegistrationDraft,
) -> Result<user::Model, DbErr> {
    let password_hash = password::hash_password(&draft.password)
        .map_err(|e| DbErr::Custom(format!("password hashing failed: {}", e)))?;
    let user = user::ActiveModel {
        username: Set(draft.email.clone()),
        email: Set(draft.email.clone()),
        first_name: Set(draft.first_name.clone()),
        last_name: Set(draft.last_name.clone()),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    tracing::info!(user_id = user.id, "account registered");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn session_token_is_read_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; sessionid=abc-123; lang=pl"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn missing_or_empty_cookie_means_no_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("sessionid="));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn cookies_are_http_only() {
        assert!(session_cookie("t").starts_with("sessionid=t;"));
        assert!(session_cookie("t").contains("HttpOnly"));
        assert!(expired_session_cookie().contains("Max-Age=0"));
    }
}
