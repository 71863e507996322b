//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input does not have the `NNN-NNN-NNNN` shape.
    #[error("phone number must look like NNN-NNN-NNNN, got {0:?}")]
    Malformed(String),
}

/// A ten-digit North American phone number.
///
/// Stored in its dialable `NNN-NNN-NNNN` form, which is also the form the
/// customers table uses and the form every puzzle answer is reported in.
///
/// ## Examples
///
/// ```
/// use noahs_core::Phone;
///
/// let phone = Phone::parse("767-365-7269").unwrap();
/// assert_eq!(phone.digits(), "7673657269");
///
/// assert!(Phone::parse("7673657269").is_err());
/// assert!(Phone::parse("767-365-726").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from its `NNN-NNN-NNNN` form.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or not exactly three, three
    /// and four ASCII digits separated by dashes.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let groups: Vec<&str> = s.split('-').collect();
        let well_formed = matches!(groups.as_slice(), [a, b, c]
            if a.len() == 3 && b.len() == 3 && c.len() == 4
                && groups.iter().all(|g| g.bytes().all(|b| b.is_ascii_digit())));

        if !well_formed {
            return Err(PhoneError::Malformed(s.to_owned()));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the ten digits without separators.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Phone::parse("212-555-0100").is_ok());
        assert!(Phone::parse(" 212-555-0100 ").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            Phone::parse("2125550100"),
            Err(PhoneError::Malformed(_))
        ));
        assert!(matches!(
            Phone::parse("21a-555-0100"),
            Err(PhoneError::Malformed(_))
        ));
        assert!(matches!(
            Phone::parse("212-5550-100"),
            Err(PhoneError::Malformed(_))
        ));
    }

    #[test]
    fn test_digits() {
        let phone = Phone::parse("212-555-0100").unwrap();
        assert_eq!(phone.digits(), "2125550100");
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = Phone::parse("212-555-0100").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"212-555-0100\"");
    }
}
