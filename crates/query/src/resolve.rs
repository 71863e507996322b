//! Collapse a pipeline's output to exactly one customer.

use noahs_core::{Customer, CustomerId, Phone};
use thiserror::Error;

use crate::pipeline::Frame;

/// Errors returned when a frame does not name exactly one customer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Every row was filtered out.
    #[error("no customer matched")]
    NoMatch,

    /// More than one distinct customer survived.
    #[error(
        "ambiguous result: {} customers matched ({})",
        .candidates.len(),
        format_ids(.candidates)
    )]
    Ambiguous {
        /// Distinct customer ids, in frame order.
        candidates: Vec<CustomerId>,
    },
}

fn format_ids(ids: &[CustomerId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The first row of the only customer in `frame`.
///
/// Several rows may belong to that customer (one per order line, say); they
/// are not an ambiguity.
///
/// # Errors
///
/// Returns [`ResolveError::NoMatch`] for an empty frame and
/// [`ResolveError::Ambiguous`] when more than one customer id remains.
pub fn resolve_by<R>(frame: Frame<R>, id: impl Fn(&R) -> CustomerId) -> Result<R, ResolveError> {
    let candidates = frame.keys(&id);
    match candidates.len() {
        0 => Err(ResolveError::NoMatch),
        1 => frame.first().ok_or(ResolveError::NoMatch),
        _ => Err(ResolveError::Ambiguous { candidates }),
    }
}

/// The only customer in `frame`.
///
/// # Errors
///
/// See [`resolve_by`].
pub fn resolve_customer<'a>(frame: Frame<&'a Customer>) -> Result<&'a Customer, ResolveError> {
    resolve_by(frame, |c| c.id)
}

/// Phone number of the only customer in `frame`.
///
/// # Errors
///
/// See [`resolve_by`].
pub fn resolve_phone(frame: Frame<&Customer>) -> Result<Phone, ResolveError> {
    resolve_customer(frame).map(|c| c.phone.clone())
}
