//! Western and Chinese zodiac lookup tables.
//!
//! Sign boundaries follow the tropical sun-sign dates; the Chinese animals
//! follow the plain 12-year cycle anchored at 1900 (a Rat year). Both are
//! static so puzzles can run without network access.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A month/day pair with no year attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthDay {
    /// Month, 1-12.
    pub month: u32,
    /// Day of month, 1-31.
    pub day: u32,
}

impl MonthDay {
    /// Create a month/day pair.
    #[must_use]
    pub const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// An inclusive, recurring month/day interval.
///
/// When `end` falls before `start` the window crosses New Year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignWindow {
    /// First day of the window.
    pub start: MonthDay,
    /// Last day of the window (inclusive).
    pub end: MonthDay,
}

impl SignWindow {
    /// Create a window.
    #[must_use]
    pub const fn new(start: MonthDay, end: MonthDay) -> Self {
        Self { start, end }
    }

    /// Whether the window crosses New Year.
    #[must_use]
    pub fn wraps(&self) -> bool {
        self.end < self.start
    }
}

/// Western zodiac signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

const fn window(sm: u32, sd: u32, em: u32, ed: u32) -> SignWindow {
    SignWindow::new(MonthDay::new(sm, sd), MonthDay::new(em, ed))
}

impl ZodiacSign {
    /// All signs in calendar order starting at the vernal equinox.
    pub const ALL: [Self; 12] = [
        Self::Aries,
        Self::Taurus,
        Self::Gemini,
        Self::Cancer,
        Self::Leo,
        Self::Virgo,
        Self::Libra,
        Self::Scorpio,
        Self::Sagittarius,
        Self::Capricorn,
        Self::Aquarius,
        Self::Pisces,
    ];

    /// The sign's name as it appears in reference tables.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    /// Tropical sun-sign dates.
    #[must_use]
    pub const fn window(self) -> SignWindow {
        match self {
            Self::Aries => window(3, 21, 4, 20),
            Self::Taurus => window(4, 21, 5, 21),
            Self::Gemini => window(5, 22, 6, 21),
            Self::Cancer => window(6, 22, 7, 22),
            Self::Leo => window(7, 23, 8, 22),
            Self::Virgo => window(8, 23, 9, 22),
            Self::Libra => window(9, 23, 10, 22),
            Self::Scorpio => window(10, 23, 11, 22),
            Self::Sagittarius => window(11, 23, 12, 21),
            Self::Capricorn => window(12, 22, 1, 20),
            Self::Aquarius => window(1, 21, 2, 19),
            Self::Pisces => window(2, 20, 3, 20),
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ZodiacSign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sign| sign.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid zodiac sign: {s}"))
    }
}

/// Chinese zodiac animals, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChineseZodiac {
    Rat,
    Ox,
    Tiger,
    Rabbit,
    Dragon,
    Snake,
    Horse,
    Goat,
    Monkey,
    Rooster,
    Dog,
    Pig,
}

impl ChineseZodiac {
    /// All animals in cycle order.
    pub const ALL: [Self; 12] = [
        Self::Rat,
        Self::Ox,
        Self::Tiger,
        Self::Rabbit,
        Self::Dragon,
        Self::Snake,
        Self::Horse,
        Self::Goat,
        Self::Monkey,
        Self::Rooster,
        Self::Dog,
        Self::Pig,
    ];

    /// A year known to belong to the Rat.
    const CYCLE_ANCHOR: i32 = 1900;

    /// The animal's English name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rat => "Rat",
            Self::Ox => "Ox",
            Self::Tiger => "Tiger",
            Self::Rabbit => "Rabbit",
            Self::Dragon => "Dragon",
            Self::Snake => "Snake",
            Self::Horse => "Horse",
            Self::Goat => "Goat",
            Self::Monkey => "Monkey",
            Self::Rooster => "Rooster",
            Self::Dog => "Dog",
            Self::Pig => "Pig",
        }
    }

    /// Title of the animal's reference article, e.g. `Goat_(zodiac)`.
    #[must_use]
    pub fn article_title(self) -> String {
        format!("{}_(zodiac)", self.name())
    }

    /// The animal whose year begins in calendar year `year`.
    #[must_use]
    pub fn for_year(year: i32) -> Self {
        let idx = (year - Self::CYCLE_ANCHOR).rem_euclid(12);
        usize::try_from(idx)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(Self::Rat)
    }
}

impl fmt::Display for ChineseZodiac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ChineseZodiac {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|animal| animal.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid chinese zodiac animal: {s}"))
    }
}
