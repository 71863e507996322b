use noahs_core::Phone;
use noahs_core::keypad;

/// Suffixes that follow a surname and would otherwise be mistaken for it.
pub const GENERATIONAL_SUFFIXES: &[&str] = &["II", "III", "IV", "Jr."];

/// `name` without its final suffix token, if it has one.
fn split_suffix(name: &str) -> Option<&str> {
    GENERATIONAL_SUFFIXES.iter().find_map(|s| {
        name.strip_suffix(s)
            .filter(|rest| rest.is_empty() || rest.ends_with(' '))
    })
}

/// Whether the last token of `name` is a generational suffix.
#[must_use]
pub fn has_generational_suffix(name: &str) -> bool {
    split_suffix(name.trim_end()).is_some()
}

/// `name` with any trailing generational suffixes removed.
#[must_use]
pub fn strip_generational_suffix(name: &str) -> &str {
    let mut name = name.trim_end();
    while let Some(stripped) = split_suffix(name) {
        name = stripped.trim_end();
    }
    name
}

/// Last whitespace-separated token of `name`.
#[must_use]
pub fn last_name(name: &str) -> &str {
    name.split_whitespace().next_back().unwrap_or_default()
}

/// First letters of the first and last name, upper-cased, ignoring suffixes.
#[must_use]
pub fn initials(name: &str) -> String {
    let name = strip_generational_suffix(name);
    let mut tokens = name.split_whitespace();
    let first = tokens.next().and_then(|t| t.chars().next());
    let last = tokens.next_back().and_then(|t| t.chars().next());
    first
        .into_iter()
        .chain(last)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Whether the customer's last name, dialled on a keypad, is their phone
/// number. Names with a generational suffix never match.
#[must_use]
pub fn name_spells_phone(name: &str, phone: &Phone) -> bool {
    if has_generational_suffix(name) {
        return false;
    }
    keypad::encode(last_name(name)) == phone.digits()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_detection() {
        assert!(has_generational_suffix("Robert Moore II"));
        assert!(has_generational_suffix("Robert Moore III"));
        assert!(has_generational_suffix("Robert Moore IV"));
        assert!(has_generational_suffix("Robert Moore Jr."));
        assert!(!has_generational_suffix("Robert Moore"));
    }

    #[test]
    fn test_strip_suffix() {
        assert_eq!(strip_generational_suffix("Robert Moore III"), "Robert Moore");
        assert_eq!(strip_generational_suffix("Sam Hill Jr."), "Sam Hill");
        assert_eq!(strip_generational_suffix("Sam Hill"), "Sam Hill");
        // Only whole tokens are suffixes.
        assert_eq!(strip_generational_suffix("Ann DAVII"), "Ann DAVII");
    }

    #[test]
    fn test_suffix_must_be_whole_token() {
        for name in ["Ann DAVII", "Rob SlyJr.", "Mo CIV", "Robert Moore III", "Sam Hill Jr."] {
            let stripped = strip_generational_suffix(name) != name;
            assert_eq!(has_generational_suffix(name), stripped, "{name}");
        }
        assert!(!has_generational_suffix("Ann DAVII"));
        assert!(!has_generational_suffix("Rob SlyJr."));
    }

    #[test]
    fn test_strip_suffix_idempotent() {
        for name in ["Robert Moore III", "Sam Hill Jr.", "Ann Lee"] {
            let once = strip_generational_suffix(name);
            assert_eq!(strip_generational_suffix(once), once);
        }
    }

    #[test]
    fn test_filtering_idempotent() {
        let names = ["Ann Lee", "Bo Dee II", "Cy Fox Jr.", "Di Poe"];
        let once: Vec<_> = names
            .iter()
            .filter(|n| !has_generational_suffix(n))
            .collect();
        let twice: Vec<_> = once
            .iter()
            .filter(|n| !has_generational_suffix(n))
            .copied()
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Jeremy Davis"), "JD");
        assert_eq!(initials("Jeremy Paul Davis Jr."), "JD");
        assert_eq!(initials("cher"), "C");
    }

    #[test]
    fn test_name_spells_phone() {
        // "Tannenbaum" on a keypad.
        let phone = Phone::parse("826-636-2286").unwrap();
        assert!(name_spells_phone("Sam Tannenbaum", &phone));
        assert!(!name_spells_phone("Sam Tannenbaum Jr.", &phone));
        assert!(!name_spells_phone("Sam Tannen", &phone));
    }
}
