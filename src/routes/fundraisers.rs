use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::{found, paths, PathId};
use crate::auth::{policy, Identity};
use crate::entities::{category, comment, fundraiser};
use crate::error::AppError;
use crate::forms::{self, form_view, FieldErrors, FormView};
use crate::store::{self, Vote};
use crate::AppState;

/// A page of fundraisers
#[derive(Debug, Serialize, ToSchema)]
pub struct FundraiserListPage {
    /// Fundraisers, newest first
    #[schema(value_type = Vec<Object>)]
    pub object_list: Vec<fundraiser::Model>,
}

/// Open fundraisers of one category
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryListPage {
    /// The category resolved from the slug
    #[schema(value_type = Object)]
    pub category: category::Model,
    /// Its open fundraisers, newest first
    #[schema(value_type = Vec<Object>)]
    pub object_list: Vec<fundraiser::Model>,
}

/// Unsaved form bound to one fundraiser
#[derive(Debug, Serialize, ToSchema)]
pub struct BoundForm {
    /// Fundraiser the form posts to
    pub fundraiser_id: i32,
    pub form: FormView,
}

/// Fundraiser detail with its comment and pledge forms
#[derive(Debug, Serialize, ToSchema)]
pub struct FundraiserDetailPage {
    #[schema(value_type = Object)]
    pub object: fundraiser::Model,
    /// Whether the fundraiser currently shows on the public list
    pub is_open: bool,
    /// Sum of all pledges, two fraction digits
    #[schema(value_type = String, example = "150.00")]
    pub transaction_sum: Decimal,
    /// Comments, newest first
    #[schema(value_type = Vec<Object>)]
    pub comments: Vec<comment::Model>,
    pub comment_form: BoundForm,
    pub transaction_form: BoundForm,
}

/// Create/update form page
#[derive(Debug, Serialize, ToSchema)]
pub struct FundraiserFormPage {
    pub form: FormView,
    /// The fundraiser being edited (update only)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub object: Option<fundraiser::Model>,
}

/// Public list: active fundraisers inside their date window
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Open fundraisers, newest first", body = FundraiserListPage)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_fundraisers(
    State(state): State<AppState>,
) -> Result<Json<FundraiserListPage>, AppError> {
    let object_list = store::list_open(&state.db).await?;
    Ok(Json(FundraiserListPage { object_list }))
}

/// The caller's own fundraisers, drafts and expired ones included
#[utoipa::path(
    get,
    path = "/my-list/",
    responses(
        (status = 200, description = "Owned fundraisers, newest first", body = FundraiserListPage),
        (status = 302, description = "Not logged in, redirect to login")
    )
)]
#[tracing::instrument(skip(state, identity))]
pub async fn my_fundraisers(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<FundraiserListPage>, AppError> {
    let user = identity.require_login(paths::MY_LIST)?;
    let object_list = store::list_owned(&state.db, user.id).await?;
    Ok(Json(FundraiserListPage { object_list }))
}

#[utoipa::path(
    get,
    path = "/category/{slug}/",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Open fundraisers in the category", body = CategoryListPage),
        (status = 404, description = "No such category")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn category_fundraisers(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryListPage>, AppError> {
    let category = store::find_category_by_slug(&state.db, &slug).await?;
    let object_list = store::list_open_in_category(&state.db, category.id).await?;
    Ok(Json(CategoryListPage {
        category,
        object_list,
    }))
}

#[utoipa::path(
    get,
    path = "/{id}/",
    params(("id" = i32, Path, description = "Fundraiser id")),
    responses(
        (status = 200, description = "Fundraiser with comment and pledge forms", body = FundraiserDetailPage),
        (status = 404, description = "No such fundraiser")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn fundraiser_detail(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<FundraiserDetailPage>, AppError> {
    let object = store::find_fundraiser(&state.db, id).await?;
    let transaction_sum = store::transaction_sum(&state.db, id).await?;
    let comments = store::comments_for(&state.db, id).await?;

    Ok(Json(FundraiserDetailPage {
        is_open: object.is_open_at(Utc::now()),
        comment_form: bound_form(id, paths::comment_add(id)),
        transaction_form: bound_form(id, paths::transaction_add(id)),
        object,
        transaction_sum,
        comments,
    }))
}

fn bound_form(fundraiser_id: i32, action: String) -> BoundForm {
    BoundForm {
        fundraiser_id,
        form: form_view(action, BTreeMap::new(), FieldErrors::new()),
    }
}

// Failed validation is still a 200: the form is redisplayed with its errors
fn form_page(
    action: String,
    values: BTreeMap<String, String>,
    errors: FieldErrors,
    object: Option<fundraiser::Model>,
) -> Response {
    (
        StatusCode::OK,
        Json(FundraiserFormPage {
            form: form_view(action, values, errors),
            object,
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(identity))]
pub async fn create_form(identity: Identity) -> Result<Response, AppError> {
    identity.require_login(paths::CREATE)?;
    Ok(form_page(paths::CREATE.to_string(), BTreeMap::new(), FieldErrors::new(), None))
}

#[tracing::instrument(skip(state, identity, body))]
pub async fn create_submit(
    State(state): State<AppState>,
    identity: Identity,
    body: Bytes,
) -> Result<Response, AppError> {
    let owner = identity.require_login(paths::CREATE)?;
    let raw = forms::parse_body(&body);

    match forms::fundraiser::validate(&raw, &state.db).await? {
        Ok(draft) => {
            let created = store::create_fundraiser(&state.db, draft, owner.id).await?;
            tracing::info!(fundraiser = %created.label(), owner_id = owner.id, "fundraiser created");
            Ok(found(paths::LIST))
        }
        Err(errors) => Ok(form_page(
            paths::CREATE.to_string(),
            forms::fundraiser::submitted(&raw),
            errors,
            None,
        )),
    }
}

/// Login, existence and ownership, in that order.
async fn owned_fundraiser(
    state: &AppState,
    identity: &Identity,
    id: i32,
) -> Result<fundraiser::Model, AppError> {
    identity.require_login(&paths::update(id))?;
    let fundraiser = store::find_fundraiser(&state.db, id).await?;
    if !policy::is_owner(identity, &fundraiser) {
        return Err(AppError::Forbidden(format!(
            "fundraiser {} belongs to another user",
            id
        )));
    }
    Ok(fundraiser)
}

#[tracing::instrument(skip(state, identity))]
pub async fn update_form(
    State(state): State<AppState>,
    identity: Identity,
    PathId(id): PathId,
) -> Result<Response, AppError> {
    let fundraiser = owned_fundraiser(&state, &identity, id).await?;
    let values = forms::fundraiser::initial(&fundraiser);
    Ok(form_page(paths::update(id), values, FieldErrors::new(), Some(fundraiser)))
}

#[tracing::instrument(skip(state, identity, body))]
pub async fn update_submit(
    State(state): State<AppState>,
    identity: Identity,
    PathId(id): PathId,
    body: Bytes,
) -> Result<Response, AppError> {
    let fundraiser = owned_fundraiser(&state, &identity, id).await?;
    let raw = forms::parse_body(&body);

    match forms::fundraiser::validate(&raw, &state.db).await? {
        Ok(draft) => {
            store::update_fundraiser(&state.db, fundraiser, draft).await?;
            tracing::info!(fundraiser_id = id, "fundraiser updated");
            Ok(found(paths::update(id)))
        }
        Err(errors) => Ok(form_page(
            paths::update(id),
            forms::fundraiser::submitted(&raw),
            errors,
            Some(fundraiser),
        )),
    }
}

/// Any visitor may comment. Invalid submissions are dropped without feedback.
#[tracing::instrument(skip(state, identity, body))]
pub async fn comment_add(
    State(state): State<AppState>,
    identity: Identity,
    PathId(fundraiser_id): PathId,
    body: Bytes,
) -> Result<Response, AppError> {
    let fundraiser = store::find_fundraiser(&state.db, fundraiser_id).await?;
    let raw = forms::parse_body(&body);

    match forms::comment::validate(&raw) {
        Ok(draft) => {
            let comment = store::add_comment(&state.db, fundraiser.id, identity.id(), draft).await?;
            tracing::info!(fundraiser_id, comment_id = comment.id, "comment added");
        }
        Err(errors) => {
            tracing::debug!(fundraiser_id, ?errors, "invalid comment dropped");
        }
    }
    Ok(found(paths::detail(fundraiser_id)))
}

/// Any visitor may pledge. Invalid submissions are dropped without feedback.
#[tracing::instrument(skip(state, identity, body))]
pub async fn transaction_add(
    State(state): State<AppState>,
    identity: Identity,
    PathId(fundraiser_id): PathId,
    body: Bytes,
) -> Result<Response, AppError> {
    let fundraiser = store::find_fundraiser(&state.db, fundraiser_id).await?;
    let raw = forms::parse_body(&body);

    match forms::transaction::validate(&raw) {
        Ok(draft) => {
            let transaction =
                store::add_transaction(&state.db, fundraiser.id, identity.id(), draft).await?;
            tracing::info!(fundraiser_id, amount = %transaction.amount(), "pledge recorded");
        }
        Err(errors) => {
            tracing::debug!(fundraiser_id, ?errors, "invalid pledge dropped");
        }
    }
    Ok(found(paths::detail(fundraiser_id)))
}

/// `vote=up` or `vote=down`; any other value changes nothing.
#[utoipa::path(
    post,
    path = "/{id}/vote/",
    params(("id" = i32, Path, description = "Fundraiser id")),
    request_body(content = String, content_type = "application/x-www-form-urlencoded", description = "vote=up|down"),
    responses(
        (status = 302, description = "Back to the fundraiser detail page"),
        (status = 404, description = "No such fundraiser")
    )
)]
#[tracing::instrument(skip(state, body))]
pub async fn vote(
    State(state): State<AppState>,
    PathId(fundraiser_id): PathId,
    body: Bytes,
) -> Result<Response, AppError> {
    let fundraiser = store::find_fundraiser(&state.db, fundraiser_id).await?;
    let raw = forms::parse_body(&body);

    match raw.get("vote").and_then(|value| Vote::parse(value)) {
        Some(ballot) => {
            store::record_vote(&state.db, fundraiser.id, ballot).await?;
            tracing::info!(fundraiser_id, ?ballot, "vote recorded");
        }
        None => tracing::debug!(fundraiser_id, "unrecognised vote ignored"),
    }
    Ok(found(paths::detail(fundraiser_id)))
}
