//! Restaurant routes: list, detail and delete.

use crate::api::{with_conn, ApiError, PrettyJson};
use crate::AppState;
use axum::{
    extract::{rejection::PathRejection, Extension, Path},
    http::StatusCode,
};
use pizzeria_models::{delete_restaurant, get_restaurant_detail, list_restaurants, project};
use serde_json::Value;
use std::sync::Arc;

/// Fields rendered for each entry of `GET /restaurants`.
const LIST_FIELDS: &[&str] = &["id", "name", "address"];

/// Fields rendered by `GET /restaurants/{id}`.
const DETAIL_FIELDS: &[&str] = &[
    "id",
    "name",
    "address",
    "restaurant_pizzas.pizza",
    "restaurant_pizzas.price",
];

/// Non-integer ids cannot name a restaurant, so they miss like unknown ones.
fn restaurant_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    id.map(|Path(id)| id).map_err(|rejection| {
        tracing::debug!(error = %rejection, "unparseable restaurant id");
        ApiError::restaurant_not_found()
    })
}

/// GET /restaurants
pub async fn list_restaurants_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<PrettyJson<Vec<Value>>, ApiError> {
    let restaurants = with_conn(&state.pool, "list_restaurants", |conn| {
        Ok(list_restaurants(conn)?)
    })
    .await?;

    let body = restaurants
        .iter()
        .map(|restaurant| project(&restaurant.to_record(), Some(LIST_FIELDS)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PrettyJson(body))
}

/// GET /restaurants/{id}
pub async fn get_restaurant_handler(
    Extension(state): Extension<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<PrettyJson<Value>, ApiError> {
    let id = restaurant_id(id)?;

    let detail = with_conn(&state.pool, "get_restaurant", move |conn| {
        Ok(get_restaurant_detail(conn, id)?)
    })
    .await?;

    Ok(PrettyJson(project(&detail.to_record(), Some(DETAIL_FIELDS))?))
}

/// DELETE /restaurants/{id}
///
/// Removes the restaurant and its `restaurant_pizzas` rows in one
/// transaction. Responds `204 No Content` with an empty body.
pub async fn delete_restaurant_handler(
    Extension(state): Extension<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = restaurant_id(id)?;

    let links = with_conn(&state.pool, "delete_restaurant", move |conn| {
        Ok(delete_restaurant(conn, id)?)
    })
    .await?;

    tracing::info!(restaurant_id = id, links, "restaurant deleted");
    Ok(StatusCode::NO_CONTENT)
}
