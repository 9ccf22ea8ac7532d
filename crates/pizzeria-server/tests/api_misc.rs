mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{get, send, setup_app};

#[tokio::test]
async fn test_index_banner() {
    let (app, _pool) = setup_app();

    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"<h1>Code challenge</h1>");
}

#[tokio::test]
async fn test_health_check_returns_ok() {
    let (app, _pool) = setup_app();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_json_bodies_are_pretty_printed() {
    let (app, _pool) = setup_app();

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/restaurants/1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "{\n  \"error\": \"Restaurant not found\"\n}\n"
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _pool) = setup_app();

    let (status, _) = send(
        &app,
        Request::builder()
            .uri("/menus")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
