//! Association route: link a pizza to a restaurant at a price.

use crate::api::{with_conn, ApiError, PrettyJson};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    http::StatusCode,
};
use pizzeria_models::{create_restaurant_pizza, project};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Nested parents are rendered without their own association lists.
const CREATED_FIELDS: &[&str] = &["id", "price", "pizza", "restaurant"];

/// Request body for `POST /restaurant_pizzas`.
#[derive(Debug, Deserialize)]
pub struct CreateRestaurantPizzaRequest {
    pub price: i64,
    pub restaurant_id: i64,
    pub pizza_id: i64,
}

/// POST /restaurant_pizzas
///
/// Responds `201 Created` with the new association, its nested `pizza` and
/// `restaurant`, and the raw `pizza_id` / `restaurant_id` at top level.
pub async fn create_restaurant_pizza_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<CreateRestaurantPizzaRequest>, JsonRejection>,
) -> Result<(StatusCode, PrettyJson<Value>), ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    let detail = with_conn(&state.pool, "create_restaurant_pizza", move |conn| {
        Ok(create_restaurant_pizza(
            conn,
            payload.price,
            payload.restaurant_id,
            payload.pizza_id,
        )?)
    })
    .await?;

    let mut body = project(&detail.to_record(), Some(CREATED_FIELDS))?;
    if let Value::Object(map) = &mut body {
        map.insert(
            "pizza_id".to_string(),
            detail.restaurant_pizza.pizza_id.into(),
        );
        map.insert(
            "restaurant_id".to_string(),
            detail.restaurant_pizza.restaurant_id.into(),
        );
    }

    tracing::info!(
        restaurant_pizza_id = detail.restaurant_pizza.id,
        restaurant_id = detail.restaurant_pizza.restaurant_id,
        pizza_id = detail.restaurant_pizza.pizza_id,
        "restaurant pizza created"
    );

    Ok((StatusCode::CREATED, PrettyJson(body)))
}
