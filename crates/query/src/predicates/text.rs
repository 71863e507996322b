use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Errors building a [`DescriptionMatcher`].
#[derive(Debug, Error)]
pub enum MatcherError {
    /// The pattern is not a valid regular expression.
    #[error("invalid description pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone)]
enum Term {
    /// Lower-cased needle.
    Substring(String),
    Pattern(Regex),
}

impl Term {
    fn is_match(&self, text: &str, lowered: &str) -> bool {
        match self {
            Self::Substring(needle) => lowered.contains(needle.as_str()),
            Self::Pattern(re) => re.is_match(text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combine {
    Any,
    All,
}

/// Case-insensitive test of a free-text field such as a product description.
///
/// ```
/// use noahs_query::predicates::DescriptionMatcher;
///
/// let bagels = DescriptionMatcher::contains("bagel");
/// assert!(bagels.is_match("Sesame BAGEL"));
///
/// let breakfast = DescriptionMatcher::all_of(&["coffee", "drip"]);
/// assert!(breakfast.is_match("Coffee, Drip"));
/// assert!(!breakfast.is_match("Coffee, Espresso"));
/// ```
#[derive(Debug, Clone)]
pub struct DescriptionMatcher {
    terms: Vec<Term>,
    combine: Combine,
}

impl DescriptionMatcher {
    /// Matches text containing `needle`.
    #[must_use]
    pub fn contains(needle: &str) -> Self {
        Self::any_of(&[needle])
    }

    /// Matches text containing at least one of `needles`.
    #[must_use]
    pub fn any_of(needles: &[&str]) -> Self {
        Self {
            terms: needles
                .iter()
                .map(|n| Term::Substring(n.to_lowercase()))
                .collect(),
            combine: Combine::Any,
        }
    }

    /// Matches text containing every one of `needles`.
    #[must_use]
    pub fn all_of(needles: &[&str]) -> Self {
        Self {
            combine: Combine::All,
            ..Self::any_of(needles)
        }
    }

    /// Matches text against a case-insensitive regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::Pattern`] if `pattern` does not compile.
    pub fn pattern(pattern: &str) -> Result<Self, MatcherError> {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| MatcherError::Pattern {
                pattern: pattern.to_owned(),
                source,
            })?;
        Ok(Self {
            terms: vec![Term::Pattern(re)],
            combine: Combine::Any,
        })
    }

    /// Whether `text` matches.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        match self.combine {
            Combine::Any => self.terms.iter().any(|t| t.is_match(text, &lowered)),
            Combine::All => self.terms.iter().all(|t| t.is_match(text, &lowered)),
        }
    }
}

/// A product description that names a colour, e.g. `Manual Mixer (orange)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorVariant<'a> {
    /// Description without the colour, e.g. `Manual Mixer`.
    pub base: &'a str,
    /// The colour, e.g. `orange`.
    pub color: &'a str,
}

impl<'a> ColorVariant<'a> {
    /// Split a description into base name and colour.
    ///
    /// Only a trailing parenthesised word starting with a lower-case letter
    /// counts as a colour; `Noah's Ark Model (HO Scale)` is not a variant.
    #[must_use]
    pub fn parse(desc: &'a str) -> Option<Self> {
        let desc = desc.trim_end();
        let inner_start = desc.rfind(" (")?;
        let base = desc.get(..inner_start)?.trim_end();
        let color = desc.get(inner_start + 2..)?.strip_suffix(')')?;

        let is_color = color.chars().next().is_some_and(|c| c.is_ascii_lowercase())
            && color.chars().all(|c| c.is_alphabetic() || c == ' ');
        (is_color && !base.is_empty()).then_some(Self { base, color })
    }
}

/// Five-digit zip code at the end of a `City, ST 12345` string.
#[must_use]
pub fn zip_code(citystatezip: &str) -> &str {
    let s = citystatezip.trim_end();
    s.char_indices()
        .rev()
        .nth(4)
        .and_then(|(i, _)| s.get(i..))
        .unwrap_or(s)
}

/// City part of a `City, ST 12345` string.
#[must_use]
pub fn city(citystatezip: &str) -> &str {
    citystatezip
        .split(',')
        .next()
        .map(str::trim)
        .unwrap_or_default()
}
