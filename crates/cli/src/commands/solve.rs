//! Puzzle solving command.
//!
//! # Usage
//!
//! ```bash
//! hod solve --edition 5784
//! hod solve --edition 5785 --puzzle 7 --format json
//! ```
//!
//! # Environment Variables
//!
//! - `HOD_DATA_DIR` - Directory holding the CSV tables
//! - `HOD_OFFLINE` - Skip fetching zodiac reference pages

use noahs_query::{
    Answer, Dataset, Edition, LoadError, Puzzle, PuzzleError, ReferenceError, ReferenceSource,
    Solver, SolverConfig,
};
use thiserror::Error;

use crate::OutputFormat;

/// Errors that can occur while solving.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The tables could not be loaded.
    #[error("Failed to load tables: {0}")]
    Load(#[from] LoadError),

    /// Zodiac reference data could not be obtained.
    #[error("Failed to fetch reference data: {0}")]
    Reference(#[from] ReferenceError),

    /// A puzzle did not resolve.
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),

    /// Answers could not be serialized.
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Solve `puzzle` (or every puzzle) of `edition` and print the answers.
///
/// # Errors
///
/// Returns the first load, reference or puzzle error.
pub async fn run(
    config: &SolverConfig,
    edition: Edition,
    puzzle: Option<Puzzle>,
    format: OutputFormat,
) -> Result<(), SolveError> {
    let data = Dataset::load_dir(&config.data_dir)?;
    let mut solver = Solver::new(&data, edition);

    let needs_zodiac = puzzle.is_none_or(Puzzle::needs_zodiac);
    if needs_zodiac {
        let source = ReferenceSource::from_config(config)?;
        let (sign, animal) = solver.zodiac_query();
        let reference = source.lookup(sign, animal).await?;
        solver = solver.with_zodiac(reference);
    }

    let answers = match puzzle {
        Some(puzzle) => solver
            .solve_through(puzzle)?
            .into_iter()
            .filter(|a| a.puzzle == puzzle.number())
            .collect(),
        None => solver.solve_all()?,
    };
    tracing::info!(%edition, answers = answers.len(), "Finished solving");

    print_answers(&answers, format)
}

#[allow(clippy::print_stdout)]
fn print_answers(answers: &[Answer], format: OutputFormat) -> Result<(), SolveError> {
    match format {
        OutputFormat::Text => {
            for answer in answers {
                println!("{}", answer.phone);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(answers)?),
    }
    Ok(())
}
