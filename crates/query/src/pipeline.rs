//! A small, order-preserving relational pipeline.
//!
//! A [`Frame`] is an ordered bag of rows, usually borrowed from a loaded
//! [`Table`](crate::loader::Table) or tuples of such borrows produced by
//! joins. Every stage consumes the frame and returns a new one; nothing is
//! mutated in place and no stage reorders rows unless its name says so.
//!
//! Grouping stages report groups in the order their key was first seen, which
//! is what makes [`TieBreak::FirstEncountered`] well-defined.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// How to pick a winner when several groups share the largest count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// The tied key seen first in frame order.
    #[default]
    FirstEncountered,
    /// The smallest tied key.
    LowestKey,
}

/// An ordered collection of rows flowing through a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<R> {
    rows: Vec<R>,
}

impl<R> Default for Frame<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R> FromIterator<R> for Frame<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<R> IntoIterator for Frame<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<R> Frame<R> {
    /// Wrap rows, keeping their order.
    #[must_use]
    pub const fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    /// Rows in frame order.
    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the frame is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    /// First row, if any.
    #[must_use]
    pub fn first(self) -> Option<R> {
        self.rows.into_iter().next()
    }

    /// Keep rows matching `pred`.
    #[must_use]
    pub fn filter(mut self, mut pred: impl FnMut(&R) -> bool) -> Self {
        self.rows.retain(|r| pred(r));
        self
    }

    /// Transform every row.
    #[must_use]
    pub fn map<S>(self, f: impl FnMut(R) -> S) -> Frame<S> {
        Frame::new(self.rows.into_iter().map(f).collect())
    }

    /// Inner join against `right`.
    ///
    /// Rows are matched when `left_key` and `right_key` agree. Left rows
    /// without a match are dropped. Output follows left order; a left row
    /// with several matches yields them in right order.
    #[must_use]
    pub fn join<S, K, O>(
        self,
        right: impl IntoIterator<Item = S>,
        left_key: impl Fn(&R) -> K,
        right_key: impl Fn(&S) -> K,
        mut combine: impl FnMut(R, &S) -> O,
    ) -> Frame<O>
    where
        R: Clone,
        K: Eq + Hash,
    {
        let mut index: HashMap<K, Vec<S>> = HashMap::new();
        for s in right {
            index.entry(right_key(&s)).or_default().push(s);
        }

        let mut out = Vec::with_capacity(self.rows.len());
        for r in self.rows {
            let Some(matches) = index.get(&left_key(&r)) else {
                continue;
            };
            if let Some((last, rest)) = matches.split_last() {
                for s in rest {
                    out.push(combine(r.clone(), s));
                }
                out.push(combine(r, last));
            }
        }
        Frame::new(out)
    }

    /// Keep rows whose key is in `keys`.
    #[must_use]
    pub fn semi_join<K: Eq + Hash>(self, keys: &HashSet<K>, key: impl Fn(&R) -> K) -> Self {
        self.filter(|r| keys.contains(&key(r)))
    }

    /// Keep rows whose key is not in `keys`.
    #[must_use]
    pub fn anti_join<K: Eq + Hash>(self, keys: &HashSet<K>, key: impl Fn(&R) -> K) -> Self {
        self.filter(|r| !keys.contains(&key(r)))
    }

    /// Keep the first row for each key.
    #[must_use]
    pub fn distinct_by<K: Eq + Hash>(self, key: impl Fn(&R) -> K) -> Self {
        let mut seen = HashSet::new();
        self.filter(|r| seen.insert(key(r)))
    }

    /// Distinct keys in first-seen order.
    #[must_use]
    pub fn keys<K: Eq + Hash + Clone>(&self, key: impl Fn(&R) -> K) -> Vec<K> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(key)
            .filter(|k| seen.insert(k.clone()))
            .collect()
    }

    /// Group rows by key, groups in first-seen order, rows in frame order.
    #[must_use]
    pub fn group_by<K: Eq + Hash + Clone>(self, key: impl Fn(&R) -> K) -> Vec<(K, Vec<R>)> {
        let mut slots: HashMap<K, usize> = HashMap::new();
        let mut groups: Vec<(K, Vec<R>)> = Vec::new();
        for r in self.rows {
            let k = key(&r);
            if let Some(&slot) = slots.get(&k) {
                if let Some((_, rows)) = groups.get_mut(slot) {
                    rows.push(r);
                }
            } else {
                slots.insert(k.clone(), groups.len());
                groups.push((k, vec![r]));
            }
        }
        groups
    }

    /// Row count per key, in first-seen order.
    #[must_use]
    pub fn count_by<K: Eq + Hash + Clone>(&self, key: impl Fn(&R) -> K) -> Vec<(K, usize)> {
        let mut slots: HashMap<K, usize> = HashMap::new();
        let mut counts: Vec<(K, usize)> = Vec::new();
        for r in &self.rows {
            let k = key(r);
            if let Some(&slot) = slots.get(&k) {
                if let Some((_, n)) = counts.get_mut(slot) {
                    *n += 1;
                }
            } else {
                slots.insert(k.clone(), counts.len());
                counts.push((k, 1));
            }
        }
        counts
    }

    /// The `k` largest groups, largest first.
    ///
    /// Groups with equal counts are ordered by `tie_break`.
    #[must_use]
    pub fn top_by_count<K: Eq + Hash + Clone + Ord>(
        &self,
        key: impl Fn(&R) -> K,
        k: usize,
        tie_break: TieBreak,
    ) -> Vec<(K, usize)> {
        let mut counts = self.count_by(key);
        match tie_break {
            // Stable sort keeps first-seen order among equal counts.
            TieBreak::FirstEncountered => counts.sort_by(|a, b| b.1.cmp(&a.1)),
            TieBreak::LowestKey => {
                counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            }
        }
        counts.truncate(k);
        counts
    }

    /// The most frequent key, or `None` for an empty frame.
    #[must_use]
    pub fn mode<K: Eq + Hash + Clone + Ord>(
        &self,
        key: impl Fn(&R) -> K,
        tie_break: TieBreak,
    ) -> Option<K> {
        self.top_by_count(key, 1, tie_break)
            .into_iter()
            .next()
            .map(|(k, _)| k)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct A {
        id: u32,
        b: u32,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct B {
        id: u32,
        c: u32,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct C {
        id: u32,
        label: &'static str,
    }

    fn fixture() -> (Vec<A>, Vec<B>, Vec<C>) {
        let a = vec![
            A { id: 1, b: 10 },
            A { id: 2, b: 20 },
            A { id: 3, b: 99 },
            A { id: 4, b: 10 },
        ];
        let b = vec![B { id: 10, c: 100 }, B { id: 20, c: 200 }, B { id: 30, c: 100 }];
        let c = vec![C { id: 100, label: "x" }, C { id: 200, label: "y" }];
        (a, b, c)
    }

    #[test]
    fn test_join_is_inner_and_left_ordered() {
        let (a, b, _) = fixture();
        let joined = Frame::new(a.iter().collect()).join(
            b.iter(),
            |r| r.b,
            |s| s.id,
            |r, s| (r.id, s.c),
        );
        assert_eq!(joined.rows(), &[(1, 100), (2, 200), (4, 100)]);
    }

    #[test]
    fn test_join_many_matches_follow_right_order() {
        let left = Frame::new(vec![1_u32]);
        let right = vec![(1_u32, "first"), (2, "other"), (1, "second")];
        let joined = left.join(right, |l| *l, |r| r.0, |_, r| r.1);
        assert_eq!(joined.rows(), &["first", "second"]);
    }

    #[test]
    fn test_join_associative_on_unique_keys() {
        let (a, b, c) = fixture();

        let left_first = Frame::new(a.iter().collect())
            .join(b.iter(), |r| r.b, |s| s.id, |r, s| (r, *s))
            .join(c.iter(), |(_, s)| s.c, |t| t.id, |(r, s), t| (r.id, s.id, t.label));

        let bc = Frame::new(b.iter().collect()).join(c.iter(), |s| s.c, |t| t.id, |s, t| (s, *t));
        let right_first = Frame::new(a.iter().collect())
            .join(bc, |r| r.b, |(s, _)| s.id, |r, (s, t)| (r.id, s.id, t.label));

        assert_eq!(left_first, right_first);
        assert_eq!(left_first.len(), 3);
    }

    #[test]
    fn test_mode_tie_first_encountered() {
        let frame = Frame::new(vec![7_u32, 3, 3, 7, 5]);
        for _ in 0..10 {
            assert_eq!(frame.mode(|x| *x, TieBreak::FirstEncountered), Some(7));
        }
    }

    #[test]
    fn test_mode_tie_lowest_key() {
        let frame = Frame::new(vec![7_u32, 3, 3, 7, 5]);
        assert_eq!(frame.mode(|x| *x, TieBreak::LowestKey), Some(3));
    }

    #[test]
    fn test_mode_empty() {
        let frame: Frame<u32> = Frame::default();
        assert_eq!(frame.mode(|x| *x, TieBreak::default()), None);
    }

    #[test]
    fn test_top_by_count() {
        let frame = Frame::new(vec!["a", "b", "b", "c", "c", "c"]);
        let top = frame.top_by_count(|s| *s, 2, TieBreak::FirstEncountered);
        assert_eq!(top, vec![("c", 3), ("b", 2)]);
    }

    #[test]
    fn test_count_by_first_seen_order() {
        let frame = Frame::new(vec![2_u8, 1, 2, 3]);
        assert_eq!(frame.count_by(|x| *x), vec![(2, 2), (1, 1), (3, 1)]);
    }

    #[test]
    fn test_group_by_keeps_row_order() {
        let frame = Frame::new(vec![(1, 'a'), (2, 'b'), (1, 'c')]);
        let groups = frame.group_by(|r| r.0);
        assert_eq!(groups, vec![(1, vec![(1, 'a'), (1, 'c')]), (2, vec![(2, 'b')])]);
    }

    #[test]
    fn test_distinct_and_keys() {
        let frame = Frame::new(vec![(1, 'a'), (2, 'b'), (1, 'c')]);
        assert_eq!(frame.keys(|r| r.0), vec![1, 2]);
        assert_eq!(frame.distinct_by(|r| r.0).rows(), &[(1, 'a'), (2, 'b')]);
    }

    #[test]
    fn test_semi_and_anti_join() {
        let keys: HashSet<u32> = [2, 3].into_iter().collect();
        let frame = Frame::new(vec![1_u32, 2, 3, 4]);
        assert_eq!(frame.clone().semi_join(&keys, |x| *x).rows(), &[2, 3]);
        assert_eq!(frame.anti_join(&keys, |x| *x).rows(), &[1, 4]);
    }

    #[test]
    fn test_filter_then_first() {
        let frame = Frame::new(vec![1, 2, 3, 4]);
        assert_eq!(frame.filter(|x| x % 2 == 0).first(), Some(2));
    }
}
