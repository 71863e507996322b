use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use noahs_core::Order;
use noahs_core::zodiac::SignWindow;

/// A recurring sign window applied to a set of candidate years.
///
/// A date is a member when it falls inside the window anchored at one of the
/// years. Windows that cross New Year (Capricorn) start in the anchor year and
/// end in the following one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthWindow {
    window: SignWindow,
    years: BTreeSet<i32>,
}

impl BirthWindow {
    /// Build a window over `years`.
    #[must_use]
    pub fn new(window: SignWindow, years: impl IntoIterator<Item = i32>) -> Self {
        Self {
            window,
            years: years.into_iter().collect(),
        }
    }

    /// The month/day window.
    #[must_use]
    pub const fn window(&self) -> SignWindow {
        self.window
    }

    /// The anchor years, ascending.
    #[must_use]
    pub const fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    /// Inclusive date span anchored at `year`, if the boundaries exist that year.
    #[must_use]
    pub fn span(&self, year: i32) -> Option<(NaiveDate, NaiveDate)> {
        let SignWindow { start, end } = self.window;
        let end_year = if self.window.wraps() { year + 1 } else { year };
        let from = NaiveDate::from_ymd_opt(year, start.month, start.day)?;
        let to = NaiveDate::from_ymd_opt(end_year, end.month, end.day)?;
        Some((from, to))
    }

    /// Whether `date` falls in the window for any anchor year.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        // Only the date's own year, or the year before for wrapping windows,
        // can anchor a span containing it.
        let candidates = [date.year(), date.year() - 1];
        candidates
            .into_iter()
            .filter(|y| self.years.contains(y))
            .filter_map(|y| self.span(y))
            .any(|(from, to)| from <= date && date <= to)
    }
}

/// Whether `ts` is strictly before `hour` o'clock.
#[must_use]
pub fn hour_before(ts: NaiveDateTime, hour: u32) -> bool {
    ts.hour() < hour
}

/// Whether the order was handed over at the counter: shipped the moment it
/// was ordered.
#[must_use]
pub fn is_in_store(order: &Order) -> bool {
    order.shipped == Some(order.ordered)
}

/// Whether the order shipped no later than `tolerance` after it was placed.
///
/// An order that shipped before it was placed never qualifies.
#[must_use]
pub fn shipped_within(order: &Order, tolerance: Duration) -> bool {
    order.shipped.is_some_and(|shipped| {
        let delay = shipped - order.ordered;
        delay >= Duration::zero() && delay <= tolerance
    })
}

/// Resolution used to decide that two purchases happened together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitGranularity {
    /// Same calendar hour.
    Hour,
    /// Same calendar minute.
    #[default]
    Minute,
}

/// `ts` truncated to `granularity`.
#[must_use]
pub fn visit_key(ts: NaiveDateTime, granularity: VisitGranularity) -> NaiveDateTime {
    let truncated = match granularity {
        VisitGranularity::Hour => ts.with_minute(0).and_then(|t| t.with_second(0)),
        VisitGranularity::Minute => ts.with_second(0),
    };
    truncated
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use noahs_core::zodiac::{MonthDay, ZodiacSign};
    use noahs_core::{CustomerId, OrderId};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn order(ordered: &str, shipped: Option<&str>) -> Order {
        Order {
            id: OrderId::new(1),
            customer_id: CustomerId::new(1),
            ordered: ts(ordered),
            shipped: shipped.map(ts),
            items: None,
            total: None,
        }
    }

    #[test]
    fn test_january_window_membership() {
        let window = SignWindow::new(MonthDay::new(1, 1), MonthDay::new(1, 31));
        let birth = BirthWindow::new(window, [2000]);
        assert!(birth.contains(date(2000, 1, 15)));
        assert!(!birth.contains(date(2000, 2, 1)));
        assert!(!birth.contains(date(1999, 1, 15)));
    }

    #[test]
    fn test_boundaries_inclusive() {
        let birth = BirthWindow::new(ZodiacSign::Libra.window(), [1967]);
        assert!(birth.contains(date(1967, 9, 23)));
        assert!(birth.contains(date(1967, 10, 22)));
        assert!(!birth.contains(date(1967, 9, 22)));
        assert!(!birth.contains(date(1967, 10, 23)));
    }

    #[test]
    fn test_union_over_years() {
        let birth = BirthWindow::new(ZodiacSign::Aries.window(), [1958, 1970]);
        assert!(birth.contains(date(1958, 4, 1)));
        assert!(birth.contains(date(1970, 4, 1)));
        assert!(!birth.contains(date(1964, 4, 1)));
    }

    #[test]
    fn test_wrapping_window() {
        let birth = BirthWindow::new(ZodiacSign::Capricorn.window(), [1960]);
        assert!(birth.contains(date(1960, 12, 25)));
        assert!(birth.contains(date(1961, 1, 10)));
        assert!(!birth.contains(date(1960, 1, 10)));
    }

    #[test]
    fn test_hour_before() {
        assert!(hour_before(ts("2019-06-01 04:59:59"), 5));
        assert!(!hour_before(ts("2019-06-01 05:00:00"), 5));
    }

    #[test]
    fn test_in_store() {
        assert!(is_in_store(&order("2019-06-01 10:00:00", Some("2019-06-01 10:00:00"))));
        assert!(!is_in_store(&order("2019-06-01 10:00:00", Some("2019-06-02 10:00:00"))));
        assert!(!is_in_store(&order("2019-06-01 10:00:00", None)));
    }

    #[test]
    fn test_shipped_within() {
        let o = order("2019-06-01 10:00:00", Some("2019-06-01 10:00:45"));
        assert!(shipped_within(&o, Duration::seconds(60)));
        assert!(!shipped_within(&o, Duration::seconds(30)));
    }

    #[test]
    fn test_shipped_before_ordered_is_rejected() {
        let early = order("2019-06-01 10:00:00", Some("2019-06-01 09:59:30"));
        assert!(!shipped_within(&early, Duration::seconds(60)));
        assert!(!shipped_within(&order("2019-06-01 10:00:00", None), Duration::seconds(60)));
    }

    #[test]
    fn test_visit_key() {
        let t = ts("2019-06-01 10:42:17");
        assert_eq!(visit_key(t, VisitGranularity::Minute), ts("2019-06-01 10:42:00"));
        assert_eq!(visit_key(t, VisitGranularity::Hour), ts("2019-06-01 10:00:00"));
    }
}
