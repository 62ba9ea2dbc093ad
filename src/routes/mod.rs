// Export all route modules
pub mod accounts;
pub mod fundraisers;
pub mod pages;

use axum::{
    extract::{FromRequestParts, Path},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// URL builders shared by handlers, redirects and tests.
pub mod paths {
    pub const LIST: &str = "/";
    pub const MY_LIST: &str = "/my-list/";
    pub const CREATE: &str = "/create/";
    pub const LOGIN: &str = "/accounts/login/";
    pub const LOGOUT: &str = "/accounts/logout/";
    pub const REGISTER: &str = "/accounts/register/";
    pub const INDEX: &str = "/";

    pub fn detail(id: i32) -> String {
        format!("/{}/", id)
    }

    pub fn update(id: i32) -> String {
        format!("/update/{}/", id)
    }

    pub fn category(slug: &str) -> String {
        format!("/category/{}/", slug)
    }

    pub fn comment_add(id: i32) -> String {
        format!("/{}/comment/add/", id)
    }

    pub fn transaction_add(id: i32) -> String {
        format!("/{}/transaction/add/", id)
    }

    pub fn vote(id: i32) -> String {
        format!("/{}/vote/", id)
    }

    pub fn static_page(slug: &str) -> String {
        format!("/pages/{}/", slug)
    }

    /// Login page that sends the visitor back to `next` afterwards.
    pub fn login_with_next(next: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("next", next)
            .finish();
        format!("{}?{}", LOGIN, query)
    }

    /// Only same-site absolute paths are followed after login.
    pub fn safe_next(next: Option<&str>) -> &str {
        match next {
            Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => path,
            _ => INDEX,
        }
    }
}

/// Numeric `{id}` path segment. Anything other than plain digits is a
/// missing page, not a bad request.
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub i32);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::NotFound(format!("path: {}", e)))?;
        parse_id(&raw)
            .map(PathId)
            .ok_or_else(|| AppError::NotFound(format!("no page at id {:?}", raw)))
    }
}

fn parse_id(raw: &str) -> Option<i32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// `302 Found` to `location`.
pub fn found(location: impl Into<String>) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.into())]).into_response()
}

#[cfg(test)]
mod tests {
    use super::{parse_id, paths};

    #[test]
    fn ids_are_plain_digits() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id("+1"), None);
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("99999999999"), None);
    }

    #[test]
    fn login_redirect_keeps_the_destination() {
        assert_eq!(paths::login_with_next("/create/"), "/accounts/login/?next=%2Fcreate%2F");
    }

    #[test]
    fn next_must_stay_on_site() {
        assert_eq!(paths::safe_next(Some("/my-list/")), "/my-list/");
        assert_eq!(paths::safe_next(Some("//evil.example/")), "/");
        assert_eq!(paths::safe_next(Some("https://evil.example/")), "/");
        assert_eq!(paths::safe_next(None), "/");
    }
}
