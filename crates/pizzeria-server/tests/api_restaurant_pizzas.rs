mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{count, delete, get, post_json, seed_restaurant_and_pizza, send, setup_app};
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_restaurant_pizza_success() {
    let (app, pool) = setup_app();
    seed_restaurant_and_pizza(&pool);

    let (status, body) = post_json(
        &app,
        "/restaurant_pizzas",
        &json!({"price": 10, "restaurant_id": 1, "pizza_id": 1}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "id": 1,
            "price": 10,
            "pizza_id": 1,
            "restaurant_id": 1,
            "pizza": {"id": 1, "name": "Cheese", "ingredients": "Dough,Cheese"},
            "restaurant": {"id": 1, "name": "A", "address": "X"}
        })
    );
    assert_eq!(count(&pool, "restaurant_pizzas"), 1);
}

#[tokio::test]
async fn test_created_link_shows_up_on_restaurant() {
    let (app, pool) = setup_app();
    seed_restaurant_and_pizza(&pool);

    let (status, _) = post_json(
        &app,
        "/restaurant_pizzas",
        &json!({"price": 7, "restaurant_id": 1, "pizza_id": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = get(&app, "/restaurants/1").await;
    assert_eq!(body["restaurant_pizzas"][0]["price"], 7);
    assert_eq!(body["restaurant_pizzas"][0]["pizza"]["name"], "Cheese");
}

#[tokio::test]
async fn test_create_then_delete_twice() {
    let (app, pool) = setup_app();
    seed_restaurant_and_pizza(&pool);

    let (status, body) = post_json(
        &app,
        "/restaurant_pizzas",
        &json!({"price": 10, "restaurant_id": 1, "pizza_id": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["price"], 10);
    assert_eq!(body["restaurant_id"], 1);
    assert_eq!(body["pizza_id"], 1);
    assert_eq!(body["pizza"]["name"], "Cheese");

    let (status, _) = delete(&app, "/restaurants/1").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = delete(&app, "/restaurants/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(count(&pool, "restaurant_pizzas"), 0);
}

#[tokio::test]
async fn test_create_with_unknown_restaurant() {
    let (app, pool) = setup_app();
    seed_restaurant_and_pizza(&pool);

    let (status, body) = post_json(
        &app,
        "/restaurant_pizzas",
        &json!({"price": 10, "restaurant_id": 99, "pizza_id": 1}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"errors": ["Invalid restaurant or pizza ID"]}));
    assert_eq!(count(&pool, "restaurant_pizzas"), 0);
}

#[tokio::test]
async fn test_create_with_unknown_pizza() {
    let (app, pool) = setup_app();
    seed_restaurant_and_pizza(&pool);

    let (status, body) = post_json(
        &app,
        "/restaurant_pizzas",
        &json!({"price": 10, "restaurant_id": 1, "pizza_id": 99}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"errors": ["Invalid restaurant or pizza ID"]}));
    assert_eq!(count(&pool, "restaurant_pizzas"), 0);
}

#[tokio::test]
async fn test_create_with_price_out_of_range() {
    let (app, pool) = setup_app();
    seed_restaurant_and_pizza(&pool);

    for price in [0, 31] {
        let (status, body) = post_json(
            &app,
            "/restaurant_pizzas",
            &json!({"price": price, "restaurant_id": 1, "pizza_id": 1}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"errors": ["Price must be between 1 and 30"]}));
    }
    assert_eq!(count(&pool, "restaurant_pizzas"), 0);
}

#[tokio::test]
async fn test_create_with_missing_field() {
    let (app, pool) = setup_app();
    seed_restaurant_and_pizza(&pool);

    let (status, body) = post_json(
        &app,
        "/restaurant_pizzas",
        &json!({"restaurant_id": 1, "pizza_id": 1}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().expect("errors should be a list");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].as_str().unwrap().contains("price"));
}

#[tokio::test]
async fn test_create_with_malformed_body() {
    let (app, _pool) = setup_app();

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/restaurant_pizzas")
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["errors"].is_array());
}
