//! Core types for Noah's Market.
//!
//! This module provides type-safe wrappers for the identifiers and values
//! that appear in the store's tables.

pub mod id;
pub mod phone;
pub mod price;
pub mod sku;

pub use id::*;
pub use phone::{Phone, PhoneError};
pub use price::Price;
pub use sku::{Sku, SkuError};
