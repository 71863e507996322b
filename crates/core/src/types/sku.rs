//! Stock-keeping unit type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Sku`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SkuError {
    /// The input string is empty.
    #[error("sku cannot be empty")]
    Empty,
    /// The input does not start with a three-letter category.
    #[error("sku must start with a three-letter category, got {0:?}")]
    MissingCategory(String),
}

/// A product stock-keeping unit such as `BKY1573`.
///
/// The first three upper-case letters name the product category (`BKY` for
/// bakery, `COL` for collectibles, `PET` for pet supplies and so on).
///
/// ## Examples
///
/// ```
/// use noahs_core::Sku;
///
/// let sku = Sku::parse("BKY1573").unwrap();
/// assert_eq!(sku.category(), "BKY");
/// assert!(Sku::parse("").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Length of the category prefix.
    pub const CATEGORY_LEN: usize = 3;

    /// Parse a `Sku`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or does not begin with three
    /// ASCII upper-case letters.
    pub fn parse(s: &str) -> Result<Self, SkuError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SkuError::Empty);
        }

        let prefix_ok = s.len() >= Self::CATEGORY_LEN
            && s.bytes()
                .take(Self::CATEGORY_LEN)
                .all(|b| b.is_ascii_uppercase());
        if !prefix_ok {
            return Err(SkuError::MissingCategory(s.to_owned()));
        }

        Ok(Self(s.to_owned()))
    }

    /// The three-letter category prefix.
    #[must_use]
    pub fn category(&self) -> &str {
        self.0.get(..Self::CATEGORY_LEN).unwrap_or_default()
    }

    /// Whether the sku belongs to `category`.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category() == category
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Sku {
    type Err = SkuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
