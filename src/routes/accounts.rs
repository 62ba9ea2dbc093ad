use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::{found, paths};
use crate::auth::{self, policy, Identity};
use crate::error::AppError;
use crate::forms::{self, accounts, form_view, FieldErrors, FormView, NON_FIELD_ERRORS};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Where to go after a successful login
    #[serde(default)]
    next: Option<String>,
}

/// Login or registration form page
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountFormPage {
    pub form: FormView,
}

fn account_form(action: String, values: BTreeMap<String, String>, errors: FieldErrors) -> Response {
    (
        StatusCode::OK,
        Json(AccountFormPage {
            form: form_view(action, values, errors),
        }),
    )
        .into_response()
}

fn login_action(next: Option<&str>) -> String {
    match next {
        Some(next) => paths::login_with_next(next),
        None => paths::LOGIN.to_string(),
    }
}

fn with_cookie(mut response: Response, cookie: &str) -> Result<Response, AppError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| AppError::InternalError(format!("invalid cookie header: {}", e)))?;
    response.headers_mut().insert(header::SET_COOKIE, value);
    Ok(response)
}

#[tracing::instrument(skip(identity))]
pub async fn login_form(identity: Identity, Query(query): Query<LoginQuery>) -> Response {
    if !policy::can_authenticate_only(&identity) {
        return found(paths::INDEX);
    }
    account_form(login_action(query.next.as_deref()), BTreeMap::new(), FieldErrors::new())
}

#[tracing::instrument(skip(state, identity, body))]
pub async fn login_submit(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<LoginQuery>,
    body: Bytes,
) -> Result<Response, AppError> {
    if !policy::can_authenticate_only(&identity) {
        return Ok(found(paths::INDEX));
    }

    let raw = forms::parse_body(&body);
    let action = login_action(query.next.as_deref());
    let values = forms::echo(&raw, &["username"]);

    let draft = match accounts::validate_login(&raw) {
        Ok(draft) => draft,
        Err(errors) => return Ok(account_form(action, values, errors)),
    };

    match auth::authenticate(&state.db, &draft.username, &draft.password).await? {
        Some(user) => {
            let token = auth::login(&state.db, user.id).await?;
            tracing::info!(user_id = user.id, "logged in");
            let target = paths::safe_next(query.next.as_deref());
            with_cookie(found(target), &auth::session_cookie(&token))
        }
        None => {
            tracing::info!(username = %draft.username, "failed login");
            let mut errors = FieldErrors::new();
            errors.insert(
                NON_FIELD_ERRORS.to_string(),
                vec!["Please enter a correct username and password.".to_string()],
            );
            Ok(account_form(action, values, errors))
        }
    }
}

#[tracing::instrument(skip(state, identity, headers))]
pub async fn logout(
    State(state): State<AppState>,
    identity: Identity,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let user = identity.require_login(paths::LOGOUT)?;
    if let Some(token) = auth::session_token(&headers) {
        auth::logout(&state.db, &token).await?;
    }
    tracing::info!(user_id = user.id, "logged out");
    with_cookie(found(paths::INDEX), &auth::expired_session_cookie())
}

#[tracing::instrument(skip(identity))]
pub async fn register_form(identity: Identity) -> Response {
    if !policy::can_authenticate_only(&identity) {
        return found(paths::INDEX);
    }
    account_form(paths::REGISTER.to_string(), BTreeMap::new(), FieldErrors::new())
}

/// Create the account and log it in straight away.
#[tracing::instrument(skip(state, identity, body))]
pub async fn register_submit(
    State(state): State<AppState>,
    identity: Identity,
    body: Bytes,
) -> Result<Response, AppError> {
    if !policy::can_authenticate_only(&identity) {
        return Ok(found(paths::INDEX));
    }

    let raw = forms::parse_body(&body);
    match accounts::validate_registration(&raw, &state.db).await? {
        Ok(draft) => {
            let user = auth::create_user(&state.db, &draft).await?;
            let token = auth::login(&state.db, user.id).await?;
            with_cookie(found(paths::INDEX), &auth::session_cookie(&token))
        }
        Err(errors) => Ok(account_form(
            paths::REGISTER.to_string(),
            forms::echo(&raw, accounts::REGISTRATION_ECHO),
            errors,
        )),
    }
}
