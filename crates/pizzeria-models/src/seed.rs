//! Demo data for local development.

use rusqlite::Connection;

use crate::error::ModelError;
use crate::store::{begin_write, create_pizza, create_restaurant, insert_restaurant_pizza};

const RESTAURANTS: &[(&str, &str)] = &[
    ("Karen's Pizza Shack", "address1"),
    ("Sanjay's Pizza", "address2"),
    ("Kiki's Pizza", "address3"),
];

const PIZZAS: &[(&str, &str)] = &[
    ("Emma", "Dough, Tomato Sauce, Cheese"),
    ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
    ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
];

/// (restaurant index, pizza index, price)
const MENU: &[(usize, usize, i64)] = &[(0, 0, 1), (1, 1, 4), (2, 2, 5)];

/// Row counts written by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub restaurants: usize,
    pub pizzas: usize,
    pub restaurant_pizzas: usize,
}

/// Clears all three tables, resets their id counters and inserts a small
/// fixed data set in one transaction.
pub fn seed_demo_data(conn: &Connection) -> Result<SeedSummary, ModelError> {
    let tx = begin_write(conn)?;

    tx.execute_batch(
        "DELETE FROM restaurant_pizzas;
         DELETE FROM restaurants;
         DELETE FROM pizzas;
         DELETE FROM sqlite_sequence
          WHERE name IN ('restaurant_pizzas', 'restaurants', 'pizzas');",
    )?;

    let mut restaurants = Vec::with_capacity(RESTAURANTS.len());
    for (name, address) in RESTAURANTS {
        restaurants.push(create_restaurant(&tx, name, address)?);
    }

    let mut pizzas = Vec::with_capacity(PIZZAS.len());
    for (name, ingredients) in PIZZAS {
        pizzas.push(create_pizza(&tx, name, ingredients)?);
    }

    for &(r, p, price) in MENU {
        insert_restaurant_pizza(&tx, price, restaurants[r].id, pizzas[p].id)?;
    }

    tx.commit()?;

    let summary = SeedSummary {
        restaurants: restaurants.len(),
        pizzas: pizzas.len(),
        restaurant_pizzas: MENU.len(),
    };
    tracing::info!(
        restaurants = summary.restaurants,
        pizzas = summary.pizzas,
        restaurant_pizzas = summary.restaurant_pizzas,
        "seeded demo data"
    );
    Ok(summary)
}
