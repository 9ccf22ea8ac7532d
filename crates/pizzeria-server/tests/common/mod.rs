//! Shared setup for the HTTP tests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use pizzeria_db::{open_database, DbPool, DbRuntimeSettings};
use pizzeria_server::{app, AppState};
use serde_json::Value;
use tower::ServiceExt;

/// Router over a fresh in-memory database with the default pool settings.
pub fn setup_app() -> (Router, DbPool) {
    let pool = open_database(":memory:", DbRuntimeSettings::default()).unwrap();
    (app(AppState { pool: pool.clone() }), pool)
}

/// Seeds Restaurant{id=1,"A","X"} and Pizza{id=1,"Cheese","Dough,Cheese"}.
pub fn seed_restaurant_and_pizza(pool: &DbPool) {
    let conn = pool.get().unwrap();
    conn.execute_batch(
        "INSERT INTO restaurants (id, name, address) VALUES (1, 'A', 'X');
         INSERT INTO pizzas (id, name, ingredients) VALUES (1, 'Cheese', 'Dough,Cheese');",
    )
    .unwrap();
}

pub fn count(pool: &DbPool, table: &str) -> i64 {
    let conn = pool.get().unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await;
    (status, serde_json::from_slice(&body).unwrap())
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    send(
        app,
        Request::builder()
            .uri(uri)
            .method("DELETE")
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let (status, body) = send(
        app,
        Request::builder()
            .uri(uri)
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await;
    (status, serde_json::from_slice(&body).unwrap())
}
