use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::static_page;
use crate::error::AppError;
use crate::store;
use crate::AppState;

/// Fixed landing page
#[derive(Debug, Serialize, ToSchema)]
pub struct IndexPage {
    pub title: &'static str,
    pub tagline: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StaticPageView {
    #[schema(value_type = Object)]
    pub object: static_page::Model,
}

#[utoipa::path(
    get,
    path = "/pages/",
    responses((status = 200, description = "Landing page", body = IndexPage))
)]
pub async fn index() -> Json<IndexPage> {
    Json(IndexPage {
        title: "Crowdfund",
        tagline: "Start a fundraiser, back the ones you care about.",
    })
}

#[utoipa::path(
    get,
    path = "/pages/{slug}/",
    params(("slug" = String, Path, description = "Page slug")),
    responses(
        (status = 200, description = "The page", body = StaticPageView),
        (status = 404, description = "No such page")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn static_page_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<StaticPageView>, AppError> {
    let object = store::find_static_page(&state.db, &slug).await?;
    Ok(Json(StaticPageView { object }))
}
