//! `pizzeria-seed`: resets the configured database and fills it with demo
//! restaurants, pizzas and prices.

use pizzeria_models::seed_demo_data;
use pizzeria_server::startup::{self, StartupError};

fn main() -> Result<(), StartupError> {
    let config = startup::load_process_config()?;
    startup::init_tracing(&config.logging);

    let pool = startup::open_database(&config)?;
    let conn = pool.get()?;
    let summary = seed_demo_data(&conn)?;

    println!(
        "seeded {} restaurants, {} pizzas, {} restaurant pizzas into {}",
        summary.restaurants, summary.pizzas, summary.restaurant_pizzas, config.database.path
    );
    Ok(())
}
