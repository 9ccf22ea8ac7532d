//! Pizzeria HTTP API library logic.

pub mod api;
pub mod api_pizzas;
pub mod api_restaurant_pizzas;
pub mod api_restaurants;
pub mod config;
pub mod startup;

use axum::{
    extract::DefaultBodyLimit,
    response::Html,
    routing::{get, post},
    Extension, Json, Router,
};
use pizzeria_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Maximum request body size (64 KiB). Every accepted body is a small JSON object.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Index banner.
async fn index() -> Html<&'static str> {
    Html("<h1>Code challenge</h1>")
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route(
            "/restaurants",
            get(api_restaurants::list_restaurants_handler),
        )
        .route(
            "/restaurants/{id}",
            get(api_restaurants::get_restaurant_handler)
                .delete(api_restaurants::delete_restaurant_handler),
        )
        .route("/pizzas", get(api_pizzas::list_pizzas_handler))
        .route(
            "/restaurant_pizzas",
            post(api_restaurant_pizzas::create_restaurant_pizza_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}
