//! Noah's Market query engine.
//!
//! Loads the store's four CSV tables into typed, immutable tables and answers
//! the yearly puzzles with a small relational pipeline:
//!
//! - [`loader`] - Schema-checked CSV loading into [`Dataset`]
//! - [`predicates`] - Pure row-level tests (names, dates, descriptions)
//! - [`pipeline`] - The [`Frame`] filter/join/group/tie-break pipeline
//! - [`resolve`] - Narrowing a frame to exactly one customer
//! - [`reference`] - Zodiac reference data, fetched or built in
//! - [`puzzles`] - The eight puzzles, parameterised per [`Edition`]
//! - [`config`] - Environment configuration
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use noahs_query::{Dataset, Edition, Puzzle, Solver};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = Dataset::load_dir(Path::new("data"))?;
//! let mut solver = Solver::new(&data, Edition::Y5784);
//! let answer = solver.solve(Puzzle::Investigator)?;
//! assert_eq!(answer.puzzle, 1);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod loader;
pub mod pipeline;
pub mod predicates;
pub mod puzzles;
pub mod reference;
pub mod resolve;

pub use config::{ConfigError, HttpConfig, LogFormat, SolverConfig};
pub use loader::{Dataset, LoadError};
pub use pipeline::{Frame, TieBreak};
pub use puzzles::{Answer, Edition, Puzzle, PuzzleError, Solver};
pub use reference::{ReferenceError, ReferenceSource, ZodiacReference};
pub use resolve::ResolveError;
