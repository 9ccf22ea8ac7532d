//! Persistence models for the pizzeria API.
//!
//! Three record types live here: [`Restaurant`], [`Pizza`] and the
//! price-carrying association [`RestaurantPizza`]. The crate owns their
//! queries (see [`store`]), the price bound enforced when an association is
//! constructed, and the selective serialization used by every endpoint.
//!
//! # Serialization
//!
//! Each entity declares a static [`EntitySchema`]. Loaded rows are turned
//! into a [`Record`] and rendered with [`project`], which accepts an
//! allow-list of field names and dotted relation paths:
//!
//! ```rust,ignore
//! use pizzeria_models::{get_restaurant_detail, project};
//!
//! let detail = get_restaurant_detail(&conn, 1)?;
//! let body = project(
//!     &detail.to_record(),
//!     Some(&["id", "name", "address", "restaurant_pizzas.pizza", "restaurant_pizzas.price"]),
//! )?;
//! ```

mod entity;
mod error;
mod projection;
mod seed;
pub mod store;

pub use entity::{
    NewRestaurantPizza, Pizza, Restaurant, RestaurantDetail, RestaurantPizza,
    RestaurantPizzaDetail, MAX_PRICE, MIN_PRICE, PIZZA, RESTAURANT, RESTAURANT_PIZZA,
};
pub use error::ModelError;
pub use projection::{project, EntitySchema, FieldDef, FieldKind, ProjectionError, Record};
pub use seed::{seed_demo_data, SeedSummary};
pub use store::{
    create_pizza, create_restaurant, create_restaurant_pizza, delete_restaurant, find_pizza,
    find_restaurant, get_restaurant_detail, list_pizzas, list_restaurants,
};
