//! Noah's Market Core - Shared types library.
//!
//! This crate provides the row types and static lookup tables used by the
//! rest of the workspace:
//! - `query` - Table loading, predicates, the frame pipeline and the puzzles
//! - `cli` - The `hod` command-line solver
//!
//! # Architecture
//!
//! The core crate contains only types and constant tables - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, SKUs, phone numbers and prices
//! - [`records`] - One struct per table row
//! - [`keypad`] - Telephone keypad letter-to-digit table
//! - [`zodiac`] - Western sign boundaries and the Chinese animal cycle

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod keypad;
pub mod records;
pub mod types;
pub mod zodiac;

pub use records::*;
pub use types::*;
