//! Row types for the four store tables.
//!
//! Rows are immutable snapshots; they are built once by the table loader and
//! only ever borrowed afterwards.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::{CustomerId, OrderId, Phone, Price, Sku};

/// A row of `noahs-customers.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub address: String,
    /// Free text of the form `City, ST 12345`.
    pub citystatezip: String,
    pub birthdate: NaiveDate,
    pub phone: Phone,
}

/// A row of `noahs-orders.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub ordered: NaiveDateTime,
    /// `None` when the order has not shipped.
    pub shipped: Option<NaiveDateTime>,
    pub items: Option<u32>,
    pub total: Option<Price>,
}

/// A row of `noahs-orders_items.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_id: OrderId,
    pub sku: Sku,
    pub qty: u32,
    pub unit_price: Price,
}

/// A row of `noahs-products.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: Sku,
    pub desc: String,
    pub wholesale_cost: Price,
}
