mod common;

use axum::http::StatusCode;
use common::{get, setup_app};
use serde_json::json;

#[tokio::test]
async fn test_list_pizzas() {
    let (app, pool) = setup_app();
    {
        let conn = pool.get().unwrap();
        conn.execute_batch(
            "INSERT INTO pizzas (name, ingredients) VALUES ('Cheese', 'Dough,Cheese');
             INSERT INTO pizzas (name, ingredients) VALUES ('Pepperoni', 'Dough,Cheese,Pepperoni');
             INSERT INTO restaurants (name, address) VALUES ('A', 'X');
             INSERT INTO restaurant_pizzas (price, restaurant_id, pizza_id) VALUES (5, 1, 2);",
        )
        .unwrap();
    }

    let (status, body) = get(&app, "/pizzas").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": 1, "name": "Cheese", "ingredients": "Dough,Cheese"},
            {"id": 2, "name": "Pepperoni", "ingredients": "Dough,Cheese,Pepperoni"}
        ])
    );
}

#[tokio::test]
async fn test_list_pizzas_empty() {
    let (app, _pool) = setup_app();

    let (status, body) = get(&app, "/pizzas").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
