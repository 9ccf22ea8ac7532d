//! Error types for the model layer.

use thiserror::Error;

/// Errors that can occur during model operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A database operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No restaurant exists with the given id.
    #[error("restaurant {0} not found")]
    RestaurantNotFound(i64),

    /// An association referenced a restaurant or pizza that does not exist.
    #[error("invalid reference: restaurant {restaurant_id}, pizza {pizza_id}")]
    InvalidReference {
        /// The requested restaurant id.
        restaurant_id: i64,
        /// The requested pizza id.
        pizza_id: i64,
    },

    /// A field value violated a model constraint.
    #[error("{0}")]
    Validation(String),
}
