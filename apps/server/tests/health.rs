use axum::{body::to_bytes, body::Body, http::Request};
use goaltracker_server::{api::app_router, build_state, config::Config};
use tempfile::tempdir;
use tower::ServiceExt;

#[tokio::test]
async fn healthz_works() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("test.db").to_string_lossy().to_string();
    let config = Config::from_lookup(|key| (key == "GT_DB_PATH").then(|| db_path.clone())).unwrap();
    let state = build_state(&config).await.unwrap();
    let app = app_router(state, &config).unwrap();

    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body, "ok".as_bytes());
}

#[tokio::test]
async fn root_serves_welcome_text() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("test.db").to_string_lossy().to_string();
    let config = Config::from_lookup(|key| (key == "GT_DB_PATH").then(|| db_path.clone())).unwrap();
    let state = build_state(&config).await.unwrap();
    let app = app_router(state, &config).unwrap();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&body).starts_with("Welcome"));
}

#[tokio::test]
async fn invalid_cors_origin_is_rejected() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("test.db").to_string_lossy().to_string();
    let config = Config::from_lookup(|key| match key {
        "GT_DB_PATH" => Some(db_path.clone()),
        "GT_CORS_ALLOW_ORIGINS" => Some("http://ok.test,bad\norigin".to_string()),
        _ => None,
    })
    .unwrap();
    let state = build_state(&config).await.unwrap();
    assert!(app_router(state, &config).is_err());
}
