//! The four loaded tables, bundled.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use noahs_core::{Customer, CustomerId, Order, OrderItem, Product};

use super::{LoadError, Record, read_table};
use crate::pipeline::Frame;

/// An immutable, ordered table of rows.
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: Vec<T>,
}

impl<T> Table<T> {
    /// Wrap rows, keeping their order.
    #[must_use]
    pub const fn new(rows: Vec<T>) -> Self {
        Self { rows }
    }

    /// Rows in load order.
    #[must_use]
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Start a pipeline over borrowed rows.
    #[must_use]
    pub fn frame(&self) -> Frame<&T> {
        Frame::new(self.rows.iter().collect())
    }
}

impl<T: Record> Table<T> {
    /// Load `T::FILE_NAME` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or fails validation.
    pub fn load_from(dir: &Path) -> Result<Self, LoadError> {
        let path = dir.join(T::FILE_NAME);
        let file = File::open(&path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        read_table(BufReader::new(file)).map(Self::new)
    }
}

/// Customers, orders, order items and products loaded for one run.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub customers: Table<Customer>,
    pub orders: Table<Order>,
    pub items: Table<OrderItem>,
    pub products: Table<Product>,
    customer_index: HashMap<CustomerId, usize>,
}

impl Dataset {
    /// Bundle already loaded tables.
    ///
    /// Customers are de-duplicated on id, keeping the first row, so that
    /// every customer id is unique.
    #[must_use]
    pub fn new(
        customers: Vec<Customer>,
        orders: Vec<Order>,
        items: Vec<OrderItem>,
        products: Vec<Product>,
    ) -> Self {
        let before = customers.len();
        let mut seen = HashSet::new();
        let customers: Vec<Customer> = customers
            .into_iter()
            .filter(|c| seen.insert(c.id))
            .collect();
        if customers.len() != before {
            tracing::warn!(
                dropped = before - customers.len(),
                "Dropped duplicate customer ids"
            );
        }

        let customer_index = customers
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();

        Self {
            customers: Table::new(customers),
            orders: Table::new(orders),
            items: Table::new(items),
            products: Table::new(products),
            customer_index,
        }
    }

    /// Load all four tables from a directory of CSV files.
    ///
    /// # Errors
    ///
    /// Returns the first [`LoadError`] encountered.
    pub fn load_dir(dir: &Path) -> Result<Self, LoadError> {
        tracing::info!(dir = %dir.display(), "Loading tables");

        let customers = Table::<Customer>::load_from(dir)?;
        let orders = Table::<Order>::load_from(dir)?;
        let items = Table::<OrderItem>::load_from(dir)?;
        let products = Table::<Product>::load_from(dir)?;

        let dataset = Self::new(customers.rows, orders.rows, items.rows, products.rows);
        tracing::info!(
            customers = dataset.customers.len(),
            orders = dataset.orders.len(),
            items = dataset.items.len(),
            products = dataset.products.len(),
            "Tables loaded"
        );
        Ok(dataset)
    }

    /// Look up a customer by id.
    #[must_use]
    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customer_index
            .get(&id)
            .and_then(|&i| self.customers.rows().get(i))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use super::*;

    fn write_fixture(dir: &Path) {
        fs::write(
            dir.join("noahs-customers.csv"),
            "customerid,name,address,citystatezip,birthdate,phone\n\
             1,Ann Lee,1 Main St,\"Queens Village, NY 11428\",1970-01-01,212-555-0100\n\
             1,Ann Lee,1 Main St,\"Queens Village, NY 11428\",1970-01-01,212-555-0100\n\
             2,Bob Ray,2 Main St,\"Bronx, NY 10451\",1980-02-02,212-555-0101\n",
        )
        .unwrap();
        fs::write(
            dir.join("noahs-orders.csv"),
            "orderid,customerid,ordered,shipped,items,total\n\
             10,1,2017-01-01 09:00:00,2017-01-01 09:00:00,1,3.00\n",
        )
        .unwrap();
        fs::write(
            dir.join("noahs-orders_items.csv"),
            "orderid,sku,qty,unit_price\n10,BKY0001,1,3.00\n",
        )
        .unwrap();
        fs::write(
            dir.join("noahs-products.csv"),
            "sku,desc,wholesale_cost\nBKY0001,Sesame Bagel,1.00\n",
        )
        .unwrap();
    }

    #[test]
    fn test_load_dir_dedupes_customers() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());

        let data = Dataset::load_dir(dir.path()).unwrap();
        assert_eq!(data.customers.len(), 2);
        assert_eq!(data.orders.len(), 1);
        assert_eq!(
            data.customer(CustomerId::new(2)).unwrap().name,
            "Bob Ray"
        );
        assert!(data.customer(CustomerId::new(3)).is_none());
    }

    #[test]
    fn test_load_dir_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Dataset::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("noahs-customers.csv"));
    }
}
