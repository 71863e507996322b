use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use noahs_core::zodiac::{ChineseZodiac, ZodiacSign};

use super::ZodiacReference;

/// Years the static animal cycle is expanded over.
const CYCLE_YEARS: RangeInclusive<i32> = 1900..=2100;

/// Offline zodiac data: tropical sign boundaries and the 12-year animal cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinReference;

impl BuiltinReference {
    /// Years in `years` that begin a year of `animal`.
    #[must_use]
    pub fn animal_years(animal: ChineseZodiac, years: RangeInclusive<i32>) -> BTreeSet<i32> {
        years
            .filter(|&y| ChineseZodiac::for_year(y) == animal)
            .collect()
    }

    /// Reference data for `sign` and `animal`.
    #[must_use]
    pub fn lookup(self, sign: ZodiacSign, animal: ChineseZodiac) -> ZodiacReference {
        ZodiacReference {
            sign,
            animal,
            window: sign.window(),
            animal_years: Self::animal_years(animal, CYCLE_YEARS),
        }
    }
}
