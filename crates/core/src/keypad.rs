//! Telephone keypad letter-to-digit encoding.
//!
//! Uses the classic layout printed on North American handsets:
//! `2=ABC 3=DEF 4=GHI 5=JKL 6=MNO 7=PQRS 8=TUV 9=WXYZ`.

/// Keypad digit for each letter `a..=z`.
const KEYPAD: [u8; 26] = [
    b'2', b'2', b'2', // a b c
    b'3', b'3', b'3', // d e f
    b'4', b'4', b'4', // g h i
    b'5', b'5', b'5', // j k l
    b'6', b'6', b'6', // m n o
    b'7', b'7', b'7', b'7', // p q r s
    b'8', b'8', b'8', // t u v
    b'9', b'9', b'9', b'9', // w x y z
];

/// Keypad digit for a single character.
///
/// ASCII letters of either case map to `'2'..='9'`; anything else is
/// returned unchanged.
#[must_use]
pub fn key_for(c: char) -> char {
    if !c.is_ascii_alphabetic() {
        return c;
    }
    let offset = usize::from(c.to_ascii_lowercase() as u8 - b'a');
    KEYPAD.get(offset).map_or(c, |&d| char::from(d))
}

/// Encode `text` as the digits dialled to spell it.
///
/// ```
/// use noahs_core::keypad::encode;
///
/// assert_eq!(encode("hello"), "43556");
/// assert_eq!(encode("Tuv-1"), "888-1");
/// ```
#[must_use]
pub fn encode(text: &str) -> String {
    text.chars().map(key_for).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_letter_maps_to_keypad_digit() {
        for c in ('a'..='z').chain('A'..='Z') {
            let d = key_for(c);
            assert!(('2'..='9').contains(&d), "{c} mapped to {d}");
        }
    }

    #[test]
    fn test_layout() {
        assert_eq!(encode("abcdefghijklmnopqrstuvwxyz"), "22233344455566677778889999");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(encode("Noah"), encode("noah"));
    }

    #[test]
    fn test_non_letters_pass_through() {
        assert_eq!(encode("a1 -.é"), "21 -.é");
    }

    #[test]
    fn test_deterministic() {
        let name = "Carpenter";
        assert_eq!(encode(name), encode(name));
    }
}
