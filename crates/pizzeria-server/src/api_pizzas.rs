//! Pizza routes.

use crate::api::{with_conn, ApiError, PrettyJson};
use crate::AppState;
use axum::extract::Extension;
use pizzeria_models::{list_pizzas, project};
use serde_json::Value;
use std::sync::Arc;

const LIST_FIELDS: &[&str] = &["id", "name", "ingredients"];

/// GET /pizzas
pub async fn list_pizzas_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<PrettyJson<Vec<Value>>, ApiError> {
    let pizzas = with_conn(&state.pool, "list_pizzas", |conn| Ok(list_pizzas(conn)?)).await?;

    let body = pizzas
        .iter()
        .map(|pizza| project(&pizza.to_record(), Some(LIST_FIELDS)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PrettyJson(body))
}
