#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use crowdfund::{
    auth,
    config::Config,
    create_app, db,
    entities::{category, fundraiser, user},
    forms::{accounts::RegistrationDraft, fundraiser::FundraiserDraft},
    store, AppState,
};
use http_body_util::BodyExt; // For Response body handling
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::Once;
use tower::ServiceExt; // For oneshot

// For initializing tracing once
static INIT: Once = Once::new();

pub const PASSWORD: &str = "123456";

/// A router backed by its own migrated in-memory database.
pub struct TestApp {
    pub app: Router,
    pub db: DatabaseConnection,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
    }
}

pub async fn setup() -> TestApp {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });

    let db = db::connect(&Config::in_memory())
        .await
        .expect("in-memory database");
    TestApp {
        app: create_app(AppState::new(db.clone())),
        db,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            headers,
            json,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, cookie: Option<&str>, form: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    pub async fn user(&self, email: &str) -> user::Model {
        let draft = RegistrationDraft {
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password: PASSWORD.to_string(),
        };
        auth::create_user(&self.db, &draft).await.unwrap()
    }

    /// `Cookie` header value for a fresh session of `user`.
    pub async fn cookie_for(&self, user: &user::Model) -> String {
        let token = auth::login(&self.db, user.id).await.unwrap();
        format!("{}={}", auth::SESSION_COOKIE, token)
    }

    pub async fn category(&self, name: &str) -> category::Model {
        store::create_category(&self.db, name).await.unwrap()
    }

    /// An open fundraiser: active, started yesterday, ends tomorrow.
    pub async fn fundraiser(
        &self,
        name: &str,
        owner: &user::Model,
        category: &category::Model,
    ) -> fundraiser::Model {
        let now = Utc::now();
        self.fundraiser_with(name, owner, category, true, now - Duration::days(1), now + Duration::days(1))
            .await
    }

    pub async fn fundraiser_with(
        &self,
        name: &str,
        owner: &user::Model,
        category: &category::Model,
        active: bool,
        start_date: chrono::DateTime<Utc>,
        end_date: chrono::DateTime<Utc>,
    ) -> fundraiser::Model {
        let draft = FundraiserDraft {
            name: name.to_string(),
            description: format!("{} description", name),
            purpose: 1000,
            active,
            start_date,
            end_date,
            category_id: category.id,
        };
        store::create_fundraiser(&self.db, draft, owner.id).await.unwrap()
    }
}

/// Ids from an `object_list` page, in response order.
pub fn listed_ids(json: &Value) -> Vec<i64> {
    json["object_list"]
        .as_array()
        .expect("object_list")
        .iter()
        .map(|item| item["id"].as_i64().expect("id"))
        .collect()
}
