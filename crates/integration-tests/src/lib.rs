//! Integration tests for the Noah's Market solver.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p noahs-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `keypad_resolution` - Keypad puzzle end to end, including ambiguity
//! - `predicates` - Cross-crate predicate properties on loaded rows
//! - `full_edition` - Every puzzle of an edition on a synthetic store
//!
//! Fixtures are written as real CSV files with [`StoreFixture`] and loaded
//! through [`Dataset::load_dir`], so every test also exercises the loader.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::error::Error;
use std::path::Path;

use noahs_query::Dataset;
use tempfile::TempDir;

/// Rows for the four store tables, written out as CSV on demand.
#[derive(Debug, Clone, Default)]
pub struct StoreFixture {
    customers: Vec<[String; 6]>,
    orders: Vec<[String; 6]>,
    items: Vec<[String; 4]>,
    products: Vec<[String; 3]>,
}

impl StoreFixture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a customer.
    #[must_use]
    pub fn customer(
        mut self,
        id: i32,
        name: &str,
        citystatezip: &str,
        birthdate: &str,
        phone: &str,
    ) -> Self {
        self.customers.push([
            id.to_string(),
            name.to_string(),
            format!("{id} Fixture St"),
            citystatezip.to_string(),
            birthdate.to_string(),
            phone.to_string(),
        ]);
        self
    }

    /// Add an order; `shipped` is left empty when `None`.
    #[must_use]
    pub fn order(mut self, id: i32, customer: i32, ordered: &str, shipped: Option<&str>) -> Self {
        self.orders.push([
            id.to_string(),
            customer.to_string(),
            ordered.to_string(),
            shipped.unwrap_or_default().to_string(),
            String::new(),
            String::new(),
        ]);
        self
    }

    /// Add an in-store order, shipped the moment it was placed.
    #[must_use]
    pub fn in_store_order(self, id: i32, customer: i32, at: &str) -> Self {
        self.order(id, customer, at, Some(at))
    }

    /// Add an order line.
    #[must_use]
    pub fn item(mut self, order: i32, sku: &str, qty: u32, unit_price: &str) -> Self {
        self.items.push([
            order.to_string(),
            sku.to_string(),
            qty.to_string(),
            unit_price.to_string(),
        ]);
        self
    }

    /// Add a product.
    #[must_use]
    pub fn product(mut self, sku: &str, desc: &str, wholesale_cost: &str) -> Self {
        self.products.push([
            sku.to_string(),
            desc.to_string(),
            wholesale_cost.to_string(),
        ]);
        self
    }

    /// Write the four CSV files into `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<(), csv::Error> {
        write_csv(
            &dir.join("noahs-customers.csv"),
            &["customerid", "name", "address", "citystatezip", "birthdate", "phone"],
            &self.customers,
        )?;
        write_csv(
            &dir.join("noahs-orders.csv"),
            &["orderid", "customerid", "ordered", "shipped", "items", "total"],
            &self.orders,
        )?;
        write_csv(
            &dir.join("noahs-orders_items.csv"),
            &["orderid", "sku", "qty", "unit_price"],
            &self.items,
        )?;
        write_csv(
            &dir.join("noahs-products.csv"),
            &["sku", "desc", "wholesale_cost"],
            &self.products,
        )
    }

    /// Write the fixture to a fresh temporary directory and load it.
    ///
    /// The directory lives as long as the returned [`TempDir`].
    ///
    /// # Errors
    ///
    /// Returns an error if writing or loading fails.
    pub fn load(&self) -> Result<(TempDir, Dataset), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        self.write_to(dir.path())?;
        let data = Dataset::load_dir(dir.path())?;
        Ok((dir, data))
    }
}

fn write_csv<const N: usize>(
    path: &Path,
    header: &[&str; N],
    rows: &[[String; N]],
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_quotes_city_commas() {
        let (_dir, data) = StoreFixture::new()
            .customer(1, "Ann Lee", "Queens Village, NY 11428", "1970-01-01", "212-555-0100")
            .load()
            .unwrap();
        assert_eq!(
            data.customers.rows().first().unwrap().citystatezip,
            "Queens Village, NY 11428"
        );
    }

    #[test]
    fn test_empty_fixture_loads() {
        let (_dir, data) = StoreFixture::new().load().unwrap();
        assert!(data.customers.is_empty());
        assert!(data.products.is_empty());
    }
}
