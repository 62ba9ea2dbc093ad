use axum::{http::StatusCode, response::IntoResponse};
use crowdfund::error::AppError;
use http_body_util::BodyExt;
use sea_orm::DbErr;
use serde_json::Value;

async fn body_json(error: AppError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn errors_map_to_status_codes() {
    let cases = [
        (AppError::NotFound("fundraiser 1".into()), StatusCode::NOT_FOUND),
        (AppError::Forbidden("not yours".into()), StatusCode::FORBIDDEN),
        (AppError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST),
        (AppError::DatabaseError("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        (AppError::InternalError("oops".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (error, expected) in cases {
        let message = error.to_string();
        let (status, json) = body_json(error).await;
        assert_eq!(status, expected);
        assert_eq!(json["error"], message);
    }
}

#[tokio::test]
async fn login_required_redirects_to_login() {
    let response = AppError::LoginRequired {
        next: "/create/".to_string(),
    }
    .into_response();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()["location"],
        "/accounts/login/?next=%2Fcreate%2F"
    );
}

#[test]
fn database_errors_convert() {
    let error: AppError = DbErr::Custom("connection lost".into()).into();
    assert!(matches!(error, AppError::DatabaseError(_)));
    assert!(error.to_string().contains("connection lost"));
}
