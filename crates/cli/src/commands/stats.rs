//! Table statistics command.

use noahs_query::{Dataset, LoadError, SolverConfig};

/// Load the tables and print their row counts.
///
/// # Errors
///
/// Returns an error if any table fails to load.
#[allow(clippy::print_stdout)]
pub fn run(config: &SolverConfig) -> Result<(), LoadError> {
    let data = Dataset::load_dir(&config.data_dir)?;

    println!("customers\t{}", data.customers.len());
    println!("orders\t{}", data.orders.len());
    println!("orders_items\t{}", data.items.len());
    println!("products\t{}", data.products.len());
    Ok(())
}
