//! Yearly puzzle sets and the knobs that distinguish them.

use core::fmt;

use noahs_core::zodiac::{ChineseZodiac, ZodiacSign};
use serde::{Deserialize, Serialize};

use crate::pipeline::TieBreak;
use crate::predicates::VisitGranularity;

/// One yearly set of eight puzzles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Edition {
    /// Hebrew year 5783 (December 2022).
    #[serde(rename = "5783")]
    Y5783,
    /// Hebrew year 5784 (December 2023).
    #[serde(rename = "5784")]
    Y5784,
    /// The harder 5784 speed-run, played on a different data set.
    #[serde(rename = "5784-speedrun")]
    Speedrun5784,
    /// Hebrew year 5785 (December 2024).
    #[serde(rename = "5785")]
    Y5785,
}

impl Edition {
    pub const ALL: [Self; 4] = [Self::Y5783, Self::Y5784, Self::Speedrun5784, Self::Y5785];

    /// Identifier used on the command line and in JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Y5783 => "5783",
            Self::Y5784 => "5784",
            Self::Speedrun5784 => "5784-speedrun",
            Self::Y5785 => "5785",
        }
    }

    /// Parameters for this edition's puzzles.
    #[must_use]
    pub fn params(self) -> EditionParams {
        match self {
            Self::Y5783 => EditionParams {
                contractor: ContractorParams {
                    name: NameRule::Initials("JD"),
                    year: 2017,
                    items: ItemRule::AnyItem(&["coffee, drip", "bagel"]),
                    shipped_within_secs: None,
                },
                neighbor: NeighborParams {
                    sign: ZodiacSign::Aries,
                    animal: ChineseZodiac::Dog,
                },
                early_bird: EarlyBirdParams::PASTRY_HOARDER,
                cat_lady: CatLadyParams {
                    city: Some("Queens Village"),
                    needle: "cat",
                },
                bargain: PriceRule::CheapestLineAtOrBelowCost,
                meet_cute: VisitGranularity::Hour,
                collector: CollectorParams { desc: None },
                tie_break: TieBreak::FirstEncountered,
            },
            Self::Y5784 => EditionParams {
                contractor: ContractorParams {
                    name: NameRule::Initials("JP"),
                    year: 2017,
                    items: ItemRule::AnyItem(&["coffee, drip", "bagel"]),
                    shipped_within_secs: None,
                },
                neighbor: NeighborParams {
                    sign: ZodiacSign::Cancer,
                    animal: ChineseZodiac::Rabbit,
                },
                early_bird: EarlyBirdParams::PASTRY_HOARDER,
                cat_lady: CatLadyParams {
                    city: Some("Staten Island"),
                    needle: "senior cat",
                },
                bargain: PriceRule::CheapestLineAtOrBelowCost,
                meet_cute: VisitGranularity::Minute,
                collector: CollectorParams { desc: None },
                tie_break: TieBreak::FirstEncountered,
            },
            Self::Speedrun5784 => EditionParams {
                contractor: ContractorParams {
                    name: NameRule::Initials("DS"),
                    year: 2017,
                    items: ItemRule::AnyItem(&["coffee"]),
                    shipped_within_secs: Some(60),
                },
                neighbor: NeighborParams {
                    sign: ZodiacSign::Libra,
                    animal: ChineseZodiac::Goat,
                },
                early_bird: EarlyBirdParams::PASTRY_HOARDER,
                cat_lady: CatLadyParams {
                    city: None,
                    needle: "senior cat",
                },
                bargain: PriceRule::CheapestLineAtOrBelowCost,
                meet_cute: VisitGranularity::Minute,
                collector: CollectorParams { desc: None },
                tie_break: TieBreak::FirstEncountered,
            },
            Self::Y5785 => EditionParams {
                contractor: ContractorParams {
                    name: NameRule::Pattern(r"^D.*\sS.*$"),
                    year: 2017,
                    items: ItemRule::SameVisit(&["coffee", "bagel", "clean"]),
                    shipped_within_secs: None,
                },
                neighbor: NeighborParams {
                    sign: ZodiacSign::Libra,
                    animal: ChineseZodiac::Goat,
                },
                early_bird: EarlyBirdParams {
                    min_qty: None,
                    ..EarlyBirdParams::PASTRY_HOARDER
                },
                cat_lady: CatLadyParams {
                    city: None,
                    needle: "senior cat",
                },
                bargain: PriceRule::BelowCost,
                meet_cute: VisitGranularity::Minute,
                collector: CollectorParams { desc: Some("Noah") },
                tie_break: TieBreak::FirstEncountered,
            },
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Edition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("invalid edition: {s} (expected 5783, 5784, 5784-speedrun or 5785)")
            })
    }
}

/// How the contractor's name is recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    /// First and last initials, e.g. `JD`.
    Initials(&'static str),
    /// A case-sensitive regular expression over the full name.
    Pattern(&'static str),
}

/// Which purchases identify the contractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRule {
    /// Any purchased item matches one of the needles.
    AnyItem(&'static [&'static str]),
    /// A single visit covers every needle.
    SameVisit(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractorParams {
    pub name: NameRule,
    /// Calendar year of the order.
    pub year: i32,
    pub items: ItemRule,
    /// Only count orders shipped within this many seconds.
    pub shipped_within_secs: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborParams {
    pub sign: ZodiacSign,
    pub animal: ChineseZodiac,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarlyBirdParams {
    /// Sku category of the pastries.
    pub category: &'static str,
    /// Ordered and shipped strictly before this hour.
    pub before_hour: u32,
    /// Minimum quantity on the line, if any.
    pub min_qty: Option<u32>,
}

impl EarlyBirdParams {
    /// Bakery lines of more than one item, ordered and shipped before 5am.
    pub const PASTRY_HOARDER: Self = Self {
        category: "BKY",
        before_hour: 5,
        min_qty: Some(2),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatLadyParams {
    /// City the customer lives in, when the clue names one.
    pub city: Option<&'static str>,
    /// Case-insensitive product description fragment.
    pub needle: &'static str,
}

/// What makes a purchase a bargain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRule {
    /// The cheapest unit price of a sku within an order is at most cost.
    CheapestLineAtOrBelowCost,
    /// The unit price is below cost.
    BelowCost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectorParams {
    /// Case-sensitive description fragment of the collectibles.
    pub desc: Option<&'static str>,
}

/// Everything that varies between editions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditionParams {
    pub contractor: ContractorParams,
    pub neighbor: NeighborParams,
    pub early_bird: EarlyBirdParams,
    pub cat_lady: CatLadyParams,
    pub bargain: PriceRule,
    /// How close two in-store purchases must be to count as one moment.
    pub meet_cute: VisitGranularity,
    pub collector: CollectorParams,
    pub tie_break: TieBreak,
}
