//! # Adjacency lists
//!
//! Columns and rows store their nonzero coefficients as a list of entries, each referring to the
//! partner object on the other side of the matrix. An entry is *linked* when the partner stores
//! the same coefficient and both entries know each other's position.
//!
//! The entries are split in two partitions. The first `nr_lp` entries are linked to partners that
//! are currently in the LP, the remaining entries are everything else. Each partition can be
//! sorted by partner independently.
//!
//! Whether a partition is sorted is tracked exactly by counting the descents (adjacent pairs that
//! are out of order) in each partition. Every primitive edit only touches a constant number of
//! adjacent pairs, so the counts are updated in constant time.
//!
//! Moving an entry changes the position that its partner refers to. The primitives return those
//! changes as `Fixup`s, which the matrix applies to the other side.
use std::fmt::Debug;
use std::ops::Range;

use enum_map::{Enum, EnumMap};
use itertools::{izip, Itertools};
use num_traits::Zero;

use crate::data::number_types::exact::Exact;

/// The two parts of an adjacency list.
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum Partition {
    /// Entries linked to a partner that is in the LP.
    Lp,
    /// All other entries.
    Other,
}

/// The entry of `partner` at `partner_position` should now refer to `position`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Fixup<K> {
    /// Object on the other side of the matrix.
    pub partner: K,
    /// Position of the entry in the partner's adjacency list.
    pub partner_position: usize,
    /// New position of the entry in this adjacency list.
    pub position: usize,
}

/// Entries of a column or row.
#[derive(Clone, Debug)]
pub struct Adjacency<K> {
    partners: Vec<K>,
    values: Vec<Exact>,
    links: Vec<Option<usize>>,
    nr_lp: usize,
    nr_unlinked: usize,
    descents: EnumMap<Partition, usize>,
}

impl<K: Copy + Ord + Debug> Adjacency<K> {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            partners: Vec::new(),
            values: Vec::new(),
            links: Vec::new(),
            nr_lp: 0,
            nr_unlinked: 0,
            descents: EnumMap::default(),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.partners.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    /// Number of entries linked to a partner in the LP.
    #[must_use]
    pub fn nr_lp(&self) -> usize {
        self.nr_lp
    }

    /// Number of entries without a counterpart on the partner side.
    #[must_use]
    pub fn nr_unlinked(&self) -> usize {
        self.nr_unlinked
    }

    /// Partner of the entry at `position`.
    #[must_use]
    pub fn partner(&self, position: usize) -> K {
        self.partners[position]
    }

    /// Coefficient of the entry at `position`.
    #[must_use]
    pub fn value(&self, position: usize) -> &Exact {
        &self.values[position]
    }

    /// Position of the counterpart of the entry at `position` in the partner's list.
    #[must_use]
    pub fn link(&self, position: usize) -> Option<usize> {
        self.links[position]
    }

    /// Iterate over `(partner, coefficient, link)` triples.
    pub fn iter(&self) -> impl Iterator<Item=(K, &Exact, Option<usize>)> + '_ {
        izip!(&self.partners, &self.values, &self.links).map(|(&partner, value, &link)| (partner, value, link))
    }

    /// Positions of the entries in a partition.
    #[must_use]
    pub fn range(&self, partition: Partition) -> Range<usize> {
        match partition {
            Partition::Lp => 0..self.nr_lp,
            Partition::Other => self.nr_lp..self.len(),
        }
    }

    /// Whether a partition is ordered by ascending partner.
    #[must_use]
    pub fn is_sorted(&self, partition: Partition) -> bool {
        self.descents[partition] == 0
    }

    fn partition_of(&self, position: usize) -> Partition {
        if position < self.nr_lp { Partition::Lp } else { Partition::Other }
    }

    /// Whether the pair `(position, position + 1)` lies within one partition and is out of order.
    fn is_descent(&self, position: usize) -> bool {
        position + 1 < self.len()
            && self.partition_of(position) == self.partition_of(position + 1)
            && self.partners[position] > self.partners[position + 1]
    }

    /// Apply `change` while keeping the descent counts of the given pairs up to date.
    ///
    /// Pairs not in `pairs` should not be affected by the change.
    fn with_pairs<T>(&mut self, mut pairs: Vec<usize>, change: impl FnOnce(&mut Self) -> T) -> T {
        pairs.sort_unstable();
        pairs.dedup();

        for &pair in &pairs {
            if self.is_descent(pair) {
                let partition = self.partition_of(pair);
                self.descents[partition] -= 1;
            }
        }
        let result = change(self);
        for &pair in &pairs {
            if self.is_descent(pair) {
                let partition = self.partition_of(pair);
                self.descents[partition] += 1;
            }
        }

        result
    }

    /// Append an entry to the end of the list, in the `Other` partition.
    ///
    /// # Return value
    ///
    /// Position of the new entry.
    pub fn push(&mut self, partner: K, value: Exact, link: Option<usize>) -> usize {
        debug_assert!(!value.is_zero());

        let position = self.len();
        self.with_pairs(around(position), |list| {
            list.partners.push(partner);
            list.values.push(value);
            list.links.push(link);
        });
        if link.is_none() {
            self.nr_unlinked += 1;
        }

        position
    }

    /// Exchange two entries.
    ///
    /// # Return value
    ///
    /// Updates for the partners of the moved entries that are linked.
    pub fn swap(&mut self, first: usize, second: usize) -> Vec<Fixup<K>> {
        if first == second {
            return Vec::new();
        }

        let mut pairs = around(first);
        pairs.extend(around(second));
        self.with_pairs(pairs, |list| {
            list.partners.swap(first, second);
            list.values.swap(first, second);
            list.links.swap(first, second);
        });

        [first, second].into_iter()
            .filter_map(|position| self.fixup(position))
            .collect()
    }

    fn fixup(&self, position: usize) -> Option<Fixup<K>> {
        self.links[position].map(|partner_position| Fixup {
            partner: self.partners[position],
            partner_position,
            position,
        })
    }

    /// Move the boundary between the two partitions.
    pub fn set_nr_lp(&mut self, nr_lp: usize) {
        debug_assert!(nr_lp <= self.len());

        let low = self.nr_lp.min(nr_lp).saturating_sub(1);
        let high = self.nr_lp.max(nr_lp);
        self.with_pairs((low..=high).collect(), |list| list.nr_lp = nr_lp);
    }

    /// Remove the entry at `position`.
    ///
    /// The hole is filled by the last entry of the same partition, and if that was the `Lp`
    /// partition, the hole that leaves is filled by the last entry overall.
    ///
    /// # Return value
    ///
    /// The removed `(partner, coefficient, link)` and the updates for the partners of the moved
    /// entries. No update refers to the removed entry.
    pub fn remove(&mut self, position: usize) -> ((K, Exact, Option<usize>), Vec<Fixup<K>>) {
        debug_assert!(position < self.len());

        let link = self.links[position].take();
        if link.is_some() {
            self.nr_unlinked += 1;
        }

        let mut fixups = Vec::new();
        let mut hole = position;
        if hole < self.nr_lp {
            let last_lp = self.nr_lp - 1;
            fixups.extend(self.swap(hole, last_lp));
            self.set_nr_lp(last_lp);
            hole = last_lp;
        }
        let last = self.len() - 1;
        fixups.extend(self.swap(hole, last));

        let (partner, value) = self.with_pairs(around(last), |list| {
            list.links.pop();
            (list.partners.pop(), list.values.pop())
        });
        self.nr_unlinked -= 1;

        debug_assert!(fixups.iter().all(|fixup| fixup.position < self.len()));
        match (partner, value) {
            (Some(partner), Some(value)) => ((partner, value, link), fixups),
            _ => unreachable!("the list was not empty"),
        }
    }

    /// Overwrite the coefficient of an entry.
    pub fn set_value(&mut self, position: usize, value: Exact) {
        debug_assert!(!value.is_zero());

        self.values[position] = value;
    }

    /// Set or clear the link of an entry, keeping the count of unlinked entries.
    pub fn set_link(&mut self, position: usize, link: Option<usize>) {
        match (self.links[position].is_some(), link.is_some()) {
            (false, true) => self.nr_unlinked -= 1,
            (true, false) => self.nr_unlinked += 1,
            _ => {},
        }
        self.links[position] = link;
    }

    /// Apply an update produced by the partner side.
    pub fn relink(&mut self, position: usize, link: usize) {
        debug_assert!(self.links[position].is_some());

        self.links[position] = Some(link);
    }

    /// Sort a partition by ascending partner.
    ///
    /// # Return value
    ///
    /// Updates for the partners of all moved entries that are linked.
    pub fn sort(&mut self, partition: Partition) -> Vec<Fixup<K>> {
        if self.is_sorted(partition) {
            return Vec::new();
        }

        let range = self.range(partition);
        let order = range.clone()
            .sorted_by_key(|&position| self.partners[position])
            .collect::<Vec<_>>();

        let partners = order.iter().map(|&old| self.partners[old]).collect::<Vec<_>>();
        let values = order.iter().map(|&old| self.values[old].clone()).collect::<Vec<_>>();
        let links = order.iter().map(|&old| self.links[old]).collect::<Vec<_>>();
        self.partners[range.clone()].copy_from_slice(&partners);
        self.links[range.clone()].copy_from_slice(&links);
        for (target, value) in self.values[range.clone()].iter_mut().zip(values) {
            *target = value;
        }
        self.descents[partition] = 0;

        order.into_iter().enumerate()
            .filter(|&(offset, old)| range.start + offset != old)
            .filter_map(|(offset, _)| self.fixup(range.start + offset))
            .collect()
    }

    /// Find the entry of a partner in a sorted partition.
    #[must_use]
    pub fn find(&self, partition: Partition, partner: K) -> Option<usize> {
        debug_assert!(self.is_sorted(partition));

        let range = self.range(partition);
        self.partners[range.clone()].binary_search(&partner)
            .ok()
            .map(|offset| range.start + offset)
    }

    /// Sort all entries, sum the coefficients of duplicate partners and drop the zero sums.
    ///
    /// Only valid when no entry is linked.
    pub fn merge(&mut self) {
        debug_assert_eq!(self.nr_unlinked, self.len());
        debug_assert_eq!(self.nr_lp, 0);

        let partners = std::mem::take(&mut self.partners);
        let values = std::mem::take(&mut self.values);
        let (partners, values): (Vec<_>, Vec<_>) = partners.into_iter().zip(values)
            .sorted_by_key(|&(partner, _)| partner)
            .coalesce(|(first, first_value), (second, second_value)| {
                if first == second {
                    Ok((first, first_value + second_value))
                } else {
                    Err(((first, first_value), (second, second_value)))
                }
            })
            .filter(|(_, value)| !value.is_zero())
            .unzip();

        self.links = vec![None; partners.len()];
        self.nr_unlinked = partners.len();
        self.partners = partners;
        self.values = values;
        self.descents = EnumMap::default();
    }

    fn count_descents(&self) -> EnumMap<Partition, usize> {
        let mut descents = EnumMap::default();
        for position in (0..self.len()).filter(|&position| self.is_descent(position)) {
            descents[self.partition_of(position)] += 1;
        }
        descents
    }

    /// Whether the cached counts agree with the entries.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        [
            self.partners.len() == self.values.len(),
            self.partners.len() == self.links.len(),
            self.nr_lp <= self.len(),
            self.nr_unlinked == self.links.iter().filter(|link| link.is_none()).count(),
            self.links[..self.nr_lp].iter().all(Option::is_some),
            self.descents == self.count_descents(),
            self.values.iter().all(|value| !value.is_zero()),
        ].iter().all(|v| *v)
    }
}

impl<K: Copy + Ord + Debug> Default for Adjacency<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// The adjacent pairs that contain `position`, identified by their first position.
fn around(position: usize) -> Vec<usize> {
    match position.checked_sub(1) {
        Some(previous) => vec![previous, position],
        None => vec![position],
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::adjacency::{Adjacency, Fixup, Partition};
    use crate::R;

    fn list(partners: &[usize]) -> Adjacency<usize> {
        let mut list = Adjacency::new();
        for &partner in partners {
            list.push(partner, R!(partner as i64 + 1), None);
        }
        list
    }

    #[test]
    fn push_tracks_order() {
        let mut adjacency = list(&[1, 3, 5]);
        assert!(adjacency.is_sorted(Partition::Other));
        assert_eq!(adjacency.nr_unlinked(), 3);

        adjacency.push(2, R!(1), None);
        assert!(!adjacency.is_sorted(Partition::Other));
        assert!(adjacency.is_consistent());
    }

    #[test]
    fn swap_reports_linked_entries() {
        let mut adjacency = Adjacency::new();
        adjacency.push(4, R!(1), Some(7));
        adjacency.push(2, R!(2), None);

        let fixups = adjacency.swap(0, 1);
        assert_eq!(fixups, vec![Fixup { partner: 4, partner_position: 7, position: 1 }]);
        assert!(adjacency.is_sorted(Partition::Other));
        assert!(adjacency.is_consistent());
    }

    #[test]
    fn partitions() {
        let mut adjacency = Adjacency::new();
        adjacency.push(5, R!(1), Some(0));
        adjacency.push(3, R!(1), Some(0));
        adjacency.push(1, R!(1), None);
        assert!(!adjacency.is_sorted(Partition::Other));

        adjacency.set_nr_lp(2);
        assert!(!adjacency.is_sorted(Partition::Lp));
        assert!(adjacency.is_sorted(Partition::Other));
        assert!(adjacency.is_consistent());

        let fixups = adjacency.sort(Partition::Lp);
        assert_eq!(fixups.len(), 2);
        assert!(adjacency.is_sorted(Partition::Lp));
        assert_eq!(adjacency.find(Partition::Lp, 5), Some(1));
        assert_eq!(adjacency.find(Partition::Lp, 1), None);
        assert_eq!(adjacency.find(Partition::Other, 1), Some(2));
        assert!(adjacency.is_consistent());
    }

    #[test]
    fn remove_from_lp_partition() {
        let mut adjacency = Adjacency::new();
        adjacency.push(1, R!(1), Some(10));
        adjacency.push(2, R!(2), Some(20));
        adjacency.push(3, R!(3), None);
        adjacency.set_nr_lp(2);

        let ((partner, value, link), fixups) = adjacency.remove(0);
        assert_eq!((partner, value, link), (1, R!(1), Some(10)));
        assert_eq!(adjacency.nr_lp(), 1);
        assert_eq!(adjacency.len(), 2);
        assert_eq!(adjacency.partner(0), 2);
        assert_eq!(adjacency.partner(1), 3);
        assert_eq!(fixups, vec![Fixup { partner: 2, partner_position: 20, position: 0 }]);
        assert_eq!(adjacency.nr_unlinked(), 1);
        assert!(adjacency.is_consistent());
    }

    #[test]
    fn merge() {
        let mut adjacency = Adjacency::new();
        adjacency.push(3, R!(1), None);
        adjacency.push(1, R!(2), None);
        adjacency.push(3, R!(-1), None);
        adjacency.push(1, R!(1, 2), None);
        adjacency.merge();

        assert_eq!(adjacency.len(), 1);
        assert_eq!(adjacency.partner(0), 1);
        assert_eq!(adjacency.value(0), &R!(5, 2));
        assert!(adjacency.is_consistent());
    }
}
