use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod forms;
pub mod routes;
pub mod slug;
pub mod store;

use routes::{accounts, fundraisers, pages};

/// Shared per-process state. The database is the only shared mutable resource.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Service is healthy")
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Crowdfund",
        version = "0.1.0",
    ),
    paths(
        health_check,
        fundraisers::list_fundraisers,
        fundraisers::my_fundraisers,
        fundraisers::category_fundraisers,
        fundraisers::fundraiser_detail,
        fundraisers::vote,
        pages::index,
        pages::static_page_detail,
    ),
    components(schemas(
        fundraisers::FundraiserListPage,
        fundraisers::CategoryListPage,
        fundraisers::FundraiserDetailPage,
        fundraisers::FundraiserFormPage,
        fundraisers::BoundForm,
        accounts::AccountFormPage,
        forms::FormView,
        pages::IndexPage,
        pages::StaticPageView,
    ))
)]
struct ApiDoc;

/// Create the application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // Fundraisers live at the site root; POST-only actions answer GET with 405.
    // Sibling routes must share the parameter name, hence `{id}` everywhere.
    let fundraiser_routes = Router::new()
        .route("/", get(fundraisers::list_fundraisers))
        .route("/my-list/", get(fundraisers::my_fundraisers))
        .route("/category/{slug}/", get(fundraisers::category_fundraisers))
        .route("/{id}/", get(fundraisers::fundraiser_detail))
        .route(
            "/create/",
            get(fundraisers::create_form).post(fundraisers::create_submit),
        )
        .route(
            "/update/{id}/",
            get(fundraisers::update_form).post(fundraisers::update_submit),
        )
        .route(
            "/{id}/comment/add/",
            post(fundraisers::comment_add),
        )
        .route("/{id}/vote/", post(fundraisers::vote))
        .route(
            "/{id}/transaction/add/",
            post(fundraisers::transaction_add),
        );

    let account_routes = Router::new()
        .route(
            "/accounts/login/",
            get(accounts::login_form).post(accounts::login_submit),
        )
        .route("/accounts/logout/", get(accounts::logout))
        .route(
            "/accounts/register/",
            get(accounts::register_form).post(accounts::register_submit),
        );

    let page_routes = Router::new()
        .route("/pages/", get(pages::index))
        .route("/pages/{slug}/", get(pages::static_page_detail));

    let docs_router = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(fundraiser_routes)
        .merge(account_routes)
        .merge(page_routes)
        .route("/health", get(health_check))
        .with_state(state)
        .merge(docs_router)
        .layer(TraceLayer::new_for_http())
}
