//! The eight puzzles of each edition.
//!
//! Every puzzle is a pipeline over the loaded [`Dataset`](crate::loader::Dataset)
//! that ends in exactly one customer. Editions share the pipelines and differ
//! only in their [`EditionParams`].

mod edition;
mod solver;

use core::fmt;

use noahs_core::{CustomerId, Phone};
use serde::Serialize;
use thiserror::Error;

pub use edition::{
    CatLadyParams, CollectorParams, ContractorParams, EarlyBirdParams, Edition, EditionParams,
    ItemRule, NameRule, NeighborParams, PriceRule,
};
pub use solver::Solver;

use crate::resolve::ResolveError;

/// Errors raised while solving a puzzle.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// The pipeline did not narrow to one customer.
    #[error("puzzle {puzzle}: {source}")]
    Resolve {
        puzzle: Puzzle,
        #[source]
        source: ResolveError,
    },

    /// The puzzle builds on an answer that has not been found yet.
    #[error("puzzle {puzzle} needs the answer to puzzle {needs}")]
    MissingPrerequisite { puzzle: Puzzle, needs: Puzzle },

    /// The puzzle needs zodiac data that was not supplied.
    #[error("puzzle {0} needs zodiac reference data")]
    MissingReference(Puzzle),

    /// An order points at a customer that is not on file.
    #[error("order references unknown customer {0}")]
    UnknownCustomer(CustomerId),

    /// A name pattern does not compile.
    #[error("invalid name pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// The eight puzzles, in solving order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Puzzle {
    Investigator,
    Contractor,
    Neighbor,
    EarlyBird,
    CatLady,
    BargainHunter,
    MeetCute,
    Collector,
}

impl Puzzle {
    pub const ALL: [Self; 8] = [
        Self::Investigator,
        Self::Contractor,
        Self::Neighbor,
        Self::EarlyBird,
        Self::CatLady,
        Self::BargainHunter,
        Self::MeetCute,
        Self::Collector,
    ];

    /// Puzzle number, 1-8.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Investigator => 1,
            Self::Contractor => 2,
            Self::Neighbor => 3,
            Self::EarlyBird => 4,
            Self::CatLady => 5,
            Self::BargainHunter => 6,
            Self::MeetCute => 7,
            Self::Collector => 8,
        }
    }

    /// Puzzle by number.
    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.number() == number)
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Investigator => "The Investigator",
            Self::Contractor => "The Contractor",
            Self::Neighbor => "The Neighbor",
            Self::EarlyBird => "The Early Bird",
            Self::CatLady => "The Cat Lady",
            Self::BargainHunter => "The Bargain Hunter",
            Self::MeetCute => "The Meet Cute",
            Self::Collector => "The Collector",
        }
    }

    /// The puzzle whose answer this one starts from.
    #[must_use]
    pub const fn prerequisite(self) -> Option<Self> {
        match self {
            Self::Neighbor => Some(Self::Contractor),
            Self::MeetCute => Some(Self::BargainHunter),
            _ => None,
        }
    }

    /// Whether solving needs zodiac reference data.
    #[must_use]
    pub const fn needs_zodiac(self) -> bool {
        matches!(self, Self::Neighbor)
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

/// The customer a puzzle points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub edition: Edition,
    pub puzzle: u8,
    pub title: &'static str,
    pub customer_id: CustomerId,
    pub name: String,
    pub phone: Phone,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_puzzle_numbers() {
        for (i, puzzle) in Puzzle::ALL.into_iter().enumerate() {
            assert_eq!(usize::from(puzzle.number()), i + 1);
            assert_eq!(Puzzle::from_number(puzzle.number()), Some(puzzle));
        }
        assert_eq!(Puzzle::from_number(0), None);
        assert_eq!(Puzzle::from_number(9), None);
    }

    #[test]
    fn test_prerequisites_come_first() {
        for puzzle in Puzzle::ALL {
            if let Some(needs) = puzzle.prerequisite() {
                assert!(needs < puzzle);
            }
        }
    }

    #[test]
    fn test_error_messages() {
        let err = PuzzleError::MissingPrerequisite {
            puzzle: Puzzle::Neighbor,
            needs: Puzzle::Contractor,
        };
        assert_eq!(
            err.to_string(),
            "puzzle 3 (The Neighbor) needs the answer to puzzle 2 (The Contractor)"
        );
    }

    /// Which puzzle, if any, an error names.
    const fn failing_puzzle(err: &PuzzleError) -> Option<Puzzle> {
        match err {
            PuzzleError::Resolve { puzzle, .. }
            | PuzzleError::MissingPrerequisite { puzzle, .. }
            | PuzzleError::MissingReference(puzzle) => Some(*puzzle),
            PuzzleError::UnknownCustomer(_) | PuzzleError::Pattern(_) => None,
        }
    }

    #[test]
    fn test_errors_are_solver_failures() {
        let errors = [
            PuzzleError::Resolve {
                puzzle: Puzzle::Investigator,
                source: ResolveError::NoMatch,
            },
            PuzzleError::MissingReference(Puzzle::Neighbor),
            PuzzleError::UnknownCustomer(CustomerId::new(7)),
        ];
        let named: Vec<Option<Puzzle>> = errors.iter().map(failing_puzzle).collect();
        assert_eq!(
            named,
            vec![Some(Puzzle::Investigator), Some(Puzzle::Neighbor), None]
        );
        assert_eq!(
            errors[2].to_string(),
            "order references unknown customer 7"
        );
    }
}
