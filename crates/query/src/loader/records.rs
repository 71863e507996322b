//! Schemas for the four store tables.

use noahs_core::{Customer, Order, OrderItem, Price, Product};

use super::{Column, ColumnType, LoadError, Record, Row};

impl Record for Customer {
    const TABLE: &'static str = "customers";
    const FILE_NAME: &'static str = "noahs-customers.csv";
    const SCHEMA: &'static [Column] = &[
        Column::required("customerid", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::required("address", ColumnType::Text),
        Column::required("citystatezip", ColumnType::Text),
        Column::required("birthdate", ColumnType::Date),
        Column::required("phone", ColumnType::Text),
    ];

    fn from_row(row: &Row<'_>) -> Result<Self, LoadError> {
        Ok(Self {
            id: row.integer::<i32>("customerid")?.into(),
            name: row.text("name")?.to_owned(),
            address: row.text("address")?.to_owned(),
            citystatezip: row.text("citystatezip")?.to_owned(),
            birthdate: row.date("birthdate")?,
            phone: row.parse("phone")?,
        })
    }
}

impl Record for Order {
    const TABLE: &'static str = "orders";
    const FILE_NAME: &'static str = "noahs-orders.csv";
    const SCHEMA: &'static [Column] = &[
        Column::required("orderid", ColumnType::Integer),
        Column::required("customerid", ColumnType::Integer),
        Column::required("ordered", ColumnType::Timestamp),
        Column::optional("shipped", ColumnType::Timestamp),
        Column::optional("items", ColumnType::Integer),
        Column::optional("total", ColumnType::Decimal),
    ];

    fn from_row(row: &Row<'_>) -> Result<Self, LoadError> {
        let ordered = row.timestamp("ordered")?;
        let shipped = row.opt_timestamp("shipped")?;
        if shipped.is_some_and(|shipped| shipped < ordered) {
            return Err(row.inconsistent("shipped before it was ordered"));
        }

        Ok(Self {
            id: row.integer::<i32>("orderid")?.into(),
            customer_id: row.integer::<i32>("customerid")?.into(),
            ordered,
            shipped,
            items: row.opt_integer("items")?,
            total: row.opt_decimal("total")?.map(Price::new),
        })
    }
}

impl Record for OrderItem {
    const TABLE: &'static str = "orders_items";
    const FILE_NAME: &'static str = "noahs-orders_items.csv";
    const SCHEMA: &'static [Column] = &[
        Column::required("orderid", ColumnType::Integer),
        Column::required("sku", ColumnType::Text),
        Column::required("qty", ColumnType::Integer),
        Column::required("unit_price", ColumnType::Decimal),
    ];

    fn from_row(row: &Row<'_>) -> Result<Self, LoadError> {
        Ok(Self {
            order_id: row.integer::<i32>("orderid")?.into(),
            sku: row.parse("sku")?,
            qty: row.integer("qty")?,
            unit_price: Price::new(row.decimal("unit_price")?),
        })
    }
}

impl Record for Product {
    const TABLE: &'static str = "products";
    const FILE_NAME: &'static str = "noahs-products.csv";
    const SCHEMA: &'static [Column] = &[
        Column::required("sku", ColumnType::Text),
        Column::required("desc", ColumnType::Text),
        Column::required("wholesale_cost", ColumnType::Decimal),
    ];

    fn from_row(row: &Row<'_>) -> Result<Self, LoadError> {
        Ok(Self {
            sku: row.parse("sku")?,
            desc: row.text("desc")?.to_owned(),
            wholesale_cost: Price::new(row.decimal("wholesale_cost")?),
        })
    }
}
