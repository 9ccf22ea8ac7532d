//! Record types, their serialization schemas, and the association price bound.

use crate::error::ModelError;
use crate::projection::{EntitySchema, FieldDef, Record};

/// Lowest accepted association price.
pub const MIN_PRICE: i64 = 1;
/// Highest accepted association price.
pub const MAX_PRICE: i64 = 30;

/// Serialization schema for [`Restaurant`].
pub static RESTAURANT: EntitySchema = EntitySchema {
    name: "restaurant",
    fields: &[
        FieldDef::scalar("id"),
        FieldDef::scalar("name"),
        FieldDef::scalar("address"),
        FieldDef::to_many("restaurant_pizzas", &RESTAURANT_PIZZA),
    ],
    nested_exclusions: &["restaurant_pizzas.restaurant"],
};

/// Serialization schema for [`Pizza`].
pub static PIZZA: EntitySchema = EntitySchema {
    name: "pizza",
    fields: &[
        FieldDef::scalar("id"),
        FieldDef::scalar("name"),
        FieldDef::scalar("ingredients"),
        FieldDef::to_many("restaurant_pizzas", &RESTAURANT_PIZZA),
    ],
    nested_exclusions: &["restaurant_pizzas.pizza"],
};

/// Serialization schema for [`RestaurantPizza`].
pub static RESTAURANT_PIZZA: EntitySchema = EntitySchema {
    name: "restaurant_pizza",
    fields: &[
        FieldDef::scalar("id"),
        FieldDef::scalar("price"),
        FieldDef::scalar("restaurant_id"),
        FieldDef::scalar("pizza_id"),
        FieldDef::to_one("restaurant", &RESTAURANT),
        FieldDef::to_one("pizza", &PIZZA),
    ],
    nested_exclusions: &["restaurant.restaurant_pizzas", "pizza.restaurant_pizzas"],
};

/// A restaurant row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub address: String,
}

impl Restaurant {
    /// Scalar-only record; relations are attached by the caller.
    pub fn to_record(&self) -> Record {
        Record::new(&RESTAURANT)
            .with_scalar("id", self.id)
            .with_scalar("name", self.name.clone())
            .with_scalar("address", self.address.clone())
    }
}

/// A pizza row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pizza {
    pub id: i64,
    pub name: String,
    pub ingredients: String,
}

impl Pizza {
    pub fn to_record(&self) -> Record {
        Record::new(&PIZZA)
            .with_scalar("id", self.id)
            .with_scalar("name", self.name.clone())
            .with_scalar("ingredients", self.ingredients.clone())
    }
}

/// An association row linking a restaurant to a pizza at a price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantPizza {
    pub id: i64,
    pub price: i64,
    pub restaurant_id: i64,
    pub pizza_id: i64,
}

impl RestaurantPizza {
    pub fn to_record(&self) -> Record {
        Record::new(&RESTAURANT_PIZZA)
            .with_scalar("id", self.id)
            .with_scalar("price", self.price)
            .with_scalar("restaurant_id", self.restaurant_id)
            .with_scalar("pizza_id", self.pizza_id)
    }
}

/// A validated association waiting to be inserted.
///
/// The only way to build one is [`NewRestaurantPizza::new`], so an
/// out-of-range price never reaches the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRestaurantPizza {
    price: i64,
    restaurant_id: i64,
    pizza_id: i64,
}

impl NewRestaurantPizza {
    /// Validates the price bound.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Validation`] if `price` is outside
    /// [`MIN_PRICE`]`..=`[`MAX_PRICE`].
    pub fn new(price: i64, restaurant_id: i64, pizza_id: i64) -> Result<Self, ModelError> {
        if !(MIN_PRICE..=MAX_PRICE).contains(&price) {
            return Err(ModelError::Validation(format!(
                "Price must be between {} and {}",
                MIN_PRICE, MAX_PRICE
            )));
        }
        Ok(Self {
            price,
            restaurant_id,
            pizza_id,
        })
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn restaurant_id(&self) -> i64 {
        self.restaurant_id
    }

    pub fn pizza_id(&self) -> i64 {
        self.pizza_id
    }
}

/// A restaurant together with its associations and their pizzas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantDetail {
    pub restaurant: Restaurant,
    pub menu: Vec<(RestaurantPizza, Pizza)>,
}

impl RestaurantDetail {
    pub fn to_record(&self) -> Record {
        let restaurant_pizzas = self
            .menu
            .iter()
            .map(|(link, pizza)| link.to_record().with_one("pizza", pizza.to_record()))
            .collect();
        self.restaurant
            .to_record()
            .with_many("restaurant_pizzas", restaurant_pizzas)
    }
}

/// A freshly created association with both of its parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantPizzaDetail {
    pub restaurant_pizza: RestaurantPizza,
    pub restaurant: Restaurant,
    pub pizza: Pizza,
}

impl RestaurantPizzaDetail {
    pub fn to_record(&self) -> Record {
        self.restaurant_pizza
            .to_record()
            .with_one("restaurant", self.restaurant.to_record())
            .with_one("pizza", self.pizza.to_record())
    }
}
