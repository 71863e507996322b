//! Zodiac reference data for the birthday puzzles.
//!
//! Two sources produce the same [`ZodiacReference`]: [`ReferenceClient`]
//! scrapes the public encyclopedia articles, [`BuiltinReference`] derives the
//! data from static tables. [`ReferenceSource`] picks one at start-up.

mod builtin;
mod client;
pub mod html;

use std::collections::BTreeSet;
use std::sync::LazyLock;

use noahs_core::zodiac::{ChineseZodiac, MonthDay, SignWindow, ZodiacSign};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

pub use builtin::BuiltinReference;
pub use client::ReferenceClient;

use crate::config::SolverConfig;
use crate::predicates::BirthWindow;
use html::{HtmlTable, extract_tables};

/// Title of the article listing the Western sign dates.
pub const SIGN_ARTICLE: &str = "Astrological_sign";

/// Errors fetching or parsing reference documents.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// Transport failure, including timeouts.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// A reference URL could not be built.
    #[error("invalid reference URL: {0}")]
    Url(#[from] url::ParseError),

    /// No table in the document has the expected column.
    #[error("no table with a {column:?} column in {document}")]
    MissingTable {
        document: String,
        column: &'static str,
    },

    /// The table has no row for the requested label.
    #[error("no row for {label} in {document}")]
    MissingRow { document: String, label: String },

    /// A cell that should hold a date does not.
    #[error("unparseable date {value:?} in {document}")]
    UnparseableDate { document: String, value: String },
}

impl ReferenceError {
    /// Whether another attempt could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// A Western sign window and the years belonging to a Chinese animal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZodiacReference {
    pub sign: ZodiacSign,
    pub animal: ChineseZodiac,
    pub window: SignWindow,
    pub animal_years: BTreeSet<i32>,
}

impl ZodiacReference {
    /// The birth window restricted to `birth_years`.
    ///
    /// Animal years nobody was born in are dropped, which keeps the window
    /// tied to the customers actually on file.
    #[must_use]
    pub fn birth_window(&self, birth_years: impl IntoIterator<Item = i32>) -> BirthWindow {
        let present: BTreeSet<i32> = birth_years.into_iter().collect();
        BirthWindow::new(
            self.window,
            self.animal_years.intersection(&present).copied(),
        )
    }
}

/// Where zodiac data comes from for a run.
#[derive(Debug, Clone)]
pub enum ReferenceSource {
    Builtin(BuiltinReference),
    Remote(ReferenceClient),
}

impl ReferenceSource {
    /// The source selected by `config.offline`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &SolverConfig) -> Result<Self, ReferenceError> {
        if config.offline {
            tracing::info!("Using built-in zodiac tables");
            Ok(Self::Builtin(BuiltinReference))
        } else {
            Ok(Self::Remote(ReferenceClient::new(&config.http)?))
        }
    }

    /// Look up `sign` and `animal`.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote document cannot be fetched or parsed.
    pub async fn lookup(
        &self,
        sign: ZodiacSign,
        animal: ChineseZodiac,
    ) -> Result<ZodiacReference, ReferenceError> {
        match self {
            Self::Builtin(builtin) => Ok(builtin.lookup(sign, animal)),
            Self::Remote(client) => client.lookup(sign, animal).await,
        }
    }
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// `21 March` or `March 21`.
static DAY_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(\d{1,2})\s+(january|february|march|april|may|june|july|august|september|october|november|december)|(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2}))\b",
    )
    .expect("Invalid regex")
});

fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == name)
        .and_then(|i| u32::try_from(i + 1).ok())
}

/// Every month/day mentioned in `text`, in order.
fn month_days(text: &str) -> Vec<MonthDay> {
    DAY_MONTH_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let (day, month) = match (caps.get(1), caps.get(2)) {
                (Some(day), Some(month)) => (day, month),
                _ => (caps.get(4)?, caps.get(3)?),
            };
            let day: u32 = day.as_str().parse().ok()?;
            let month = month_number(month.as_str())?;
            (1..=31).contains(&day).then(|| MonthDay::new(month, day))
        })
        .collect()
}

fn find_table<'a>(
    tables: &'a [HtmlTable],
    document: &str,
    column: &'static str,
) -> Result<(&'a HtmlTable, usize), ReferenceError> {
    tables
        .iter()
        .find_map(|t| t.column(column).map(|i| (t, i)))
        .ok_or_else(|| ReferenceError::MissingTable {
            document: document.to_string(),
            column,
        })
}

/// Read the tropical date window of `sign` from the sign article.
///
/// The sign's row is located through the `Sign` column; its sun-date cells
/// must mention at least two `day month` dates, the first two being the
/// window's start and end.
///
/// # Errors
///
/// Returns an error if the table, the row or two dates are missing.
pub fn parse_sign_window(
    html: &str,
    document: &str,
    sign: ZodiacSign,
) -> Result<SignWindow, ReferenceError> {
    let tables = extract_tables(html);
    let (table, sign_col) = find_table(&tables, document, "sign")?;

    let row = table
        .rows
        .iter()
        .find(|row| {
            row.get(sign_col).is_some_and(|cell| {
                cell.split_whitespace()
                    .any(|word| word.eq_ignore_ascii_case(sign.name()))
            })
        })
        .ok_or_else(|| ReferenceError::MissingRow {
            document: document.to_string(),
            label: sign.name().to_string(),
        })?;

    let sun_columns = table.columns("sun");
    let text = if sun_columns.is_empty() {
        row.join(" ")
    } else {
        sun_columns
            .iter()
            .filter_map(|&i| row.get(i).map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    };

    match month_days(&text).as_slice() {
        [start, end, ..] => Ok(SignWindow::new(*start, *end)),
        _ => Err(ReferenceError::UnparseableDate {
            document: document.to_string(),
            value: text,
        }),
    }
}

/// Read the start years of an animal from its article.
///
/// Every cell of the `Start date` column must end in a four-digit year.
///
/// # Errors
///
/// Returns an error if the column is missing or a cell has no year.
pub fn parse_animal_years(html: &str, document: &str) -> Result<BTreeSet<i32>, ReferenceError> {
    let tables = extract_tables(html);
    let (table, col) = find_table(&tables, document, "start date")?;

    table
        .column_values(col)
        .filter(|cell| !cell.is_empty())
        .map(|cell| {
            cell.char_indices()
                .rev()
                .nth(3)
                .and_then(|(i, _)| cell.get(i..))
                .and_then(|year| year.parse::<i32>().ok())
                .ok_or_else(|| ReferenceError::UnparseableDate {
                    document: document.to_string(),
                    value: cell.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    const SIGNS_PAGE: &str = r#"
        <table class="wikitable">
          <tr><th>Sign</th><th>Symbol</th><th>Sun (tropical)</th><th>Sun (sidereal)</th></tr>
          <tr><td>Aries</td><td>&#9800;</td><td>21 March &ndash; 20 April</td><td>14 April &ndash; 14 May</td></tr>
          <tr><td>Libra</td><td>&#9806;</td><td>23 September &ndash; 22 October</td><td>17 October &ndash; 15 November</td></tr>
          <tr><td>Capricorn</td><td>&#9809;</td><td>December 22 &ndash; January 19</td><td>15 January &ndash; 12 February</td></tr>
        </table>
    "#;

    const GOAT_PAGE: &str = r"
        <table class='infobox'><tr><th>Earthly Branch</th><td>Wei</td></tr></table>
        <table class='wikitable'>
          <tr><th>Start date</th><th>End date</th><th>Heavenly branch</th></tr>
          <tr><td>13 February 1907</td><td>1 February 1908</td><td>Fire Goat</td></tr>
          <tr><td>1 February 1919</td><td>19 February 1920</td><td>Earth Goat</td></tr>
          <tr><td>17 February 1931</td><td>5 February 1932</td><td>Metal Goat</td></tr>
        </table>
    ";

    #[test]
    fn test_parse_sign_window() {
        let window = parse_sign_window(SIGNS_PAGE, "signs", ZodiacSign::Libra).unwrap();
        assert_eq!(window.start, MonthDay::new(9, 23));
        assert_eq!(window.end, MonthDay::new(10, 22));
    }

    #[test]
    fn test_parse_sign_window_month_first() {
        let window = parse_sign_window(SIGNS_PAGE, "signs", ZodiacSign::Capricorn).unwrap();
        assert_eq!(window.start, MonthDay::new(12, 22));
        assert_eq!(window.end, MonthDay::new(1, 19));
        assert!(window.wraps());
    }

    #[test]
    fn test_parse_sign_window_missing_row() {
        let err = parse_sign_window(SIGNS_PAGE, "signs", ZodiacSign::Leo).unwrap_err();
        assert!(matches!(err, ReferenceError::MissingRow { ref label, .. } if label == "Leo"));
    }

    #[test]
    fn test_parse_sign_window_missing_table() {
        let err = parse_sign_window(GOAT_PAGE, "goat", ZodiacSign::Aries).unwrap_err();
        assert!(matches!(err, ReferenceError::MissingTable { column: "sign", .. }));
    }

    #[test]
    fn test_parse_animal_years() {
        let years = parse_animal_years(GOAT_PAGE, "goat").unwrap();
        assert_eq!(years.into_iter().collect::<Vec<_>>(), vec![1907, 1919, 1931]);
    }

    #[test]
    fn test_parse_animal_years_bad_cell() {
        let html = "<table><tr><th>Start date</th></tr><tr><td>sometime</td></tr></table>";
        let err = parse_animal_years(html, "rat").unwrap_err();
        assert!(matches!(err, ReferenceError::UnparseableDate { .. }));
    }

    #[test]
    fn test_birth_window_intersects_birth_years() {
        let reference = ZodiacReference {
            sign: ZodiacSign::Libra,
            animal: ChineseZodiac::Goat,
            window: ZodiacSign::Libra.window(),
            animal_years: [1907, 1919, 1931].into_iter().collect(),
        };
        let window = reference.birth_window([1919, 1950, 1931]);
        assert_eq!(window.years().iter().copied().collect::<Vec<_>>(), vec![1919, 1931]);
        assert!(window.contains(NaiveDate::from_ymd_opt(1931, 10, 1).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(1907, 10, 1).unwrap()));
    }

    #[test]
    fn test_transient_statuses() {
        let status = |status| ReferenceError::Status {
            url: String::new(),
            status,
        };
        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(404).is_transient());
    }
}
