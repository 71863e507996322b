//! Row-level predicates and derived values.
//!
//! Everything here is a pure function of its inputs; puzzles compose these
//! inside [`Frame::filter`](crate::pipeline::Frame::filter) and friends.

mod calendar;
mod name;
mod text;

pub use calendar::{
    BirthWindow, VisitGranularity, hour_before, is_in_store, shipped_within, visit_key,
};
pub use name::{
    GENERATIONAL_SUFFIXES, has_generational_suffix, initials, last_name, name_spells_phone,
    strip_generational_suffix,
};
pub use text::{ColorVariant, DescriptionMatcher, MatcherError, city, zip_code};
