//! Queries over the `restaurants`, `pizzas` and `restaurant_pizzas` tables.
//!
//! Reads run on the caller's connection. Mutations open their own
//! transaction so a request either applies fully or leaves storage as it was.
//! Those transactions take the write lock up front, so a concurrent writer
//! makes them wait out the busy timeout instead of failing mid-way.

use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

use crate::entity::{
    NewRestaurantPizza, Pizza, Restaurant, RestaurantDetail, RestaurantPizza,
    RestaurantPizzaDetail,
};
use crate::error::ModelError;

/// Lists every restaurant in storage order.
pub fn list_restaurants(conn: &Connection) -> Result<Vec<Restaurant>, ModelError> {
    let mut stmt = conn.prepare("SELECT id, name, address FROM restaurants ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_row_to_restaurant)?;
    let mut restaurants = Vec::new();
    for row in rows {
        restaurants.push(row?);
    }
    Ok(restaurants)
}

/// Looks up a restaurant by id.
pub fn find_restaurant(conn: &Connection, id: i64) -> Result<Option<Restaurant>, ModelError> {
    let restaurant = conn
        .query_row(
            "SELECT id, name, address FROM restaurants WHERE id = ?1",
            [id],
            map_row_to_restaurant,
        )
        .optional()?;
    Ok(restaurant)
}

/// Loads a restaurant with its associations and their pizzas.
///
/// # Errors
///
/// Returns [`ModelError::RestaurantNotFound`] if no row has this id.
pub fn get_restaurant_detail(conn: &Connection, id: i64) -> Result<RestaurantDetail, ModelError> {
    let restaurant = find_restaurant(conn, id)?.ok_or(ModelError::RestaurantNotFound(id))?;

    let mut stmt = conn.prepare(
        "SELECT rp.id, rp.price, rp.restaurant_id, rp.pizza_id,
                p.id, p.name, p.ingredients
         FROM restaurant_pizzas rp
         JOIN pizzas p ON p.id = rp.pizza_id
         WHERE rp.restaurant_id = ?1
         ORDER BY rp.id ASC",
    )?;
    let rows = stmt.query_map([id], |row| {
        Ok((
            map_row_to_restaurant_pizza(row)?,
            Pizza {
                id: row.get(4)?,
                name: row.get(5)?,
                ingredients: row.get(6)?,
            },
        ))
    })?;
    let mut menu = Vec::new();
    for row in rows {
        menu.push(row?);
    }

    Ok(RestaurantDetail { restaurant, menu })
}

/// Deletes a restaurant and every association that references it.
///
/// Returns the number of association rows removed alongside the restaurant.
///
/// # Errors
///
/// Returns [`ModelError::RestaurantNotFound`] if no row has this id; nothing
/// is modified in that case.
pub fn delete_restaurant(conn: &Connection, id: i64) -> Result<usize, ModelError> {
    let tx = begin_write(conn)?;

    // Must not depend on `foreign_keys = ON` for the cascade.
    let links = tx.execute("DELETE FROM restaurant_pizzas WHERE restaurant_id = ?1", [id])?;
    let count = tx.execute("DELETE FROM restaurants WHERE id = ?1", [id])?;
    if count == 0 {
        // Dropping the transaction rolls it back.
        return Err(ModelError::RestaurantNotFound(id));
    }

    tx.commit()?;
    tracing::debug!(restaurant_id = id, links, "deleted restaurant");
    Ok(links)
}

/// Inserts a restaurant.
pub fn create_restaurant(
    conn: &Connection,
    name: &str,
    address: &str,
) -> Result<Restaurant, ModelError> {
    let restaurant = conn.query_row(
        "INSERT INTO restaurants (name, address) VALUES (?1, ?2)
         RETURNING id, name, address",
        params![name, address],
        map_row_to_restaurant,
    )?;
    Ok(restaurant)
}

/// Lists every pizza in storage order.
pub fn list_pizzas(conn: &Connection) -> Result<Vec<Pizza>, ModelError> {
    let mut stmt = conn.prepare("SELECT id, name, ingredients FROM pizzas ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_row_to_pizza)?;
    let mut pizzas = Vec::new();
    for row in rows {
        pizzas.push(row?);
    }
    Ok(pizzas)
}

/// Looks up a pizza by id.
pub fn find_pizza(conn: &Connection, id: i64) -> Result<Option<Pizza>, ModelError> {
    let pizza = conn
        .query_row(
            "SELECT id, name, ingredients FROM pizzas WHERE id = ?1",
            [id],
            map_row_to_pizza,
        )
        .optional()?;
    Ok(pizza)
}

/// Inserts a pizza.
pub fn create_pizza(conn: &Connection, name: &str, ingredients: &str) -> Result<Pizza, ModelError> {
    let pizza = conn.query_row(
        "INSERT INTO pizzas (name, ingredients) VALUES (?1, ?2)
         RETURNING id, name, ingredients",
        params![name, ingredients],
        map_row_to_pizza,
    )?;
    Ok(pizza)
}

/// Links a restaurant to a pizza at a price.
///
/// Both ids are resolved first; only then is the price validated, so a
/// request with a bad reference and a bad price reports the reference.
///
/// # Errors
///
/// - [`ModelError::InvalidReference`] if either id does not resolve.
/// - [`ModelError::Validation`] if the price is out of range.
pub fn create_restaurant_pizza(
    conn: &Connection,
    price: i64,
    restaurant_id: i64,
    pizza_id: i64,
) -> Result<RestaurantPizzaDetail, ModelError> {
    let tx = begin_write(conn)?;
    let detail = insert_restaurant_pizza(&tx, price, restaurant_id, pizza_id)?;
    tx.commit()?;
    Ok(detail)
}

/// Body of [`create_restaurant_pizza`] for callers that already hold a
/// transaction.
pub(crate) fn insert_restaurant_pizza(
    conn: &Connection,
    price: i64,
    restaurant_id: i64,
    pizza_id: i64,
) -> Result<RestaurantPizzaDetail, ModelError> {
    let restaurant = find_restaurant(conn, restaurant_id)?;
    let pizza = find_pizza(conn, pizza_id)?;
    let (Some(restaurant), Some(pizza)) = (restaurant, pizza) else {
        return Err(ModelError::InvalidReference {
            restaurant_id,
            pizza_id,
        });
    };

    let new = NewRestaurantPizza::new(price, restaurant_id, pizza_id)?;
    let restaurant_pizza = conn.query_row(
        "INSERT INTO restaurant_pizzas (price, restaurant_id, pizza_id) VALUES (?1, ?2, ?3)
         RETURNING id, price, restaurant_id, pizza_id",
        params![new.price(), new.restaurant_id(), new.pizza_id()],
        map_row_to_restaurant_pizza,
    )?;

    Ok(RestaurantPizzaDetail {
        restaurant_pizza,
        restaurant,
        pizza,
    })
}

/// Starts a transaction holding the database write lock.
pub(crate) fn begin_write(conn: &Connection) -> rusqlite::Result<Transaction<'_>> {
    Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
}

fn map_row_to_restaurant(row: &Row) -> rusqlite::Result<Restaurant> {
    Ok(Restaurant {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
    })
}

fn map_row_to_pizza(row: &Row) -> rusqlite::Result<Pizza> {
    Ok(Pizza {
        id: row.get(0)?,
        name: row.get(1)?,
        ingredients: row.get(2)?,
    })
}

fn map_row_to_restaurant_pizza(row: &Row) -> rusqlite::Result<RestaurantPizza> {
    Ok(RestaurantPizza {
        id: row.get(0)?,
        price: row.get(1)?,
        restaurant_id: row.get(2)?,
        pizza_id: row.get(3)?,
    })
}
