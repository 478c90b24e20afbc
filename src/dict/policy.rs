//! Eviction policies decide which entry leaves a full [`StaticDict`](crate::StaticDict) to make
//! room for a new key.
//!
//! A policy never touches the dictionary directly. It is shown a read-only [`Candidates`] view
//! and answers with a [`Victim`] taken from that view, or an error. The dictionary removes the
//! victim itself, so a policy that fails leaves every entry in place.
//!
//! Custom policies implement [`EvictionPolicy`]:
//!
//! ```rust
//! use static_dict::policy::{Candidates, EvictionPolicy, Victim};
//! use static_dict::{Error, StaticDict};
//!
//! /// Evicts the most recently written entry.
//! struct EvictNewest;
//!
//! impl<K, V> EvictionPolicy<K, V> for EvictNewest {
//!     fn name(&self) -> &'static str {
//!         "evict-newest"
//!     }
//!
//!     fn select_victim<'a>(&self, candidates: &Candidates<'a, K, V>) -> Result<Victim<'a>, Error> {
//!         candidates.newest().ok_or(Error::NoVictim { policy: "evict-newest" })
//!     }
//! }
//!
//! let mut dict = StaticDict::with_policy(2, Box::new(EvictNewest)).unwrap();
//! dict.insert("a", 1).unwrap();
//! dict.insert("b", 2).unwrap();
//! dict.insert("c", 3).unwrap();
//!
//! assert_eq!(dict.keys().copied().collect::<Vec<_>>(), vec!["a", "c"]);
//! ```

use crate::dict::entry::Entry;
use crate::dict::order_list::OrderList;
use crate::error::Error;
use std::collections::hash_map;
use std::marker::PhantomData;

/// Strategy invoked when an insert of a new key finds the dictionary full.
///
/// Policies are `Send` so a dictionary can move between threads behind a lock.
pub trait EvictionPolicy<K, V>: Send {
    /// Short identifier used in errors and log records.
    fn name(&self) -> &'static str;

    /// Picks exactly one of `candidates` for removal.
    ///
    /// Returning an error aborts the insert. The dictionary is not modified.
    fn select_victim<'a>(&self, candidates: &Candidates<'a, K, V>) -> Result<Victim<'a>, Error>;
}

/// Handle to an entry chosen for eviction.
///
/// Only obtainable from a [`Candidates`] view and cannot outlive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Victim<'a> {
    slot: usize,
    _view: PhantomData<fn(&'a ()) -> &'a ()>,
}

impl Victim<'_> {
    fn new(slot: usize) -> Self {
        Self {
            slot,
            _view: PhantomData,
        }
    }

    pub(crate) fn slot(&self) -> usize {
        self.slot
    }
}

/// Read-only view of a full dictionary handed to [`EvictionPolicy::select_victim`].
pub struct Candidates<'a, K, V> {
    order: &'a OrderList<Entry<K, V>>,
    entry_pointers: hash_map::Iter<'a, K, usize>,
}

impl<'a, K, V> Candidates<'a, K, V> {
    pub(crate) fn new(
        order: &'a OrderList<Entry<K, V>>,
        entry_pointers: hash_map::Iter<'a, K, usize>,
    ) -> Self {
        Self {
            order,
            entry_pointers,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.len() == 0
    }

    /// The entry least recently inserted or updated.
    pub fn oldest(&self) -> Option<Victim<'a>> {
        self.order.front().map(Victim::new)
    }

    /// The entry most recently inserted or updated.
    pub fn newest(&self) -> Option<Victim<'a>> {
        self.order.back().map(Victim::new)
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = (Victim<'a>, &'a K, &'a V)> + 'a {
        self.order
            .iter()
            .map(|(slot, entry)| (Victim::new(slot), entry.key(), entry.value()))
    }

    /// Entries in the enumeration order of the underlying hash map.
    ///
    /// That order is unspecified and changes with the hasher's seed.
    pub fn unordered(&self) -> impl Iterator<Item = (Victim<'a>, &'a K, &'a V)> + 'a {
        let order = self.order;
        self.entry_pointers.clone().filter_map(move |(key, &slot)| {
            let entry = order.get(slot)?;
            Some((Victim::new(slot), key, entry.value()))
        })
    }
}

/// Evicts the entry least recently inserted or updated. This is the default policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FifoEviction;

impl<K, V> EvictionPolicy<K, V> for FifoEviction {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn select_victim<'a>(&self, candidates: &Candidates<'a, K, V>) -> Result<Victim<'a>, Error> {
        candidates.oldest().ok_or(Error::NoVictim { policy: "fifo" })
    }
}

/// Would evict whichever entry the underlying hash map enumerates first.
///
/// That order is undefined, so this policy is left unimplemented: selecting it makes every insert
/// into a full dictionary fail with [`Error::NotImplemented`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropFirstEviction;

impl<K, V> EvictionPolicy<K, V> for DropFirstEviction {
    fn name(&self) -> &'static str {
        "drop-first"
    }

    fn select_victim<'a>(&self, _candidates: &Candidates<'a, K, V>) -> Result<Victim<'a>, Error> {
        Err(Error::NotImplemented {
            policy: "drop-first",
        })
    }
}

/// Would evict a uniformly random entry.
///
/// Not implemented: selecting it makes every insert into a full dictionary fail with
/// [`Error::NotImplemented`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropRandomEviction;

impl<K, V> EvictionPolicy<K, V> for DropRandomEviction {
    fn name(&self) -> &'static str {
        "drop-random"
    }

    fn select_victim<'a>(&self, _candidates: &Candidates<'a, K, V>) -> Result<Victim<'a>, Error> {
        Err(Error::NotImplemented {
            policy: "drop-random",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    type Fixture = (
        OrderList<Entry<&'static str, u32>>,
        HashMap<&'static str, usize>,
    );

    fn fixture(keys: &[&'static str]) -> Fixture {
        let mut order = OrderList::with_capacity(keys.len());
        let mut entry_pointers = HashMap::new();
        for (value, key) in keys.iter().enumerate() {
            let slot = order.push_back(Entry::new(*key, value as u32));
            entry_pointers.insert(*key, slot);
        }
        (order, entry_pointers)
    }

    #[test]
    fn it_selects_the_oldest_entry_for_fifo() {
        // given
        let (order, entry_pointers) = fixture(&["a", "b", "c"]);
        let candidates = Candidates::new(&order, entry_pointers.iter());

        // when
        let victim = FifoEviction.select_victim(&candidates).unwrap();

        // then
        assert_eq!(victim.slot(), entry_pointers["a"]);
    }

    #[test]
    fn it_fails_fifo_on_an_empty_view() {
        // given
        let (order, entry_pointers) = fixture(&[]);
        let candidates = Candidates::new(&order, entry_pointers.iter());

        // when
        let result = FifoEviction.select_victim(&candidates);

        // then
        assert_eq!(result, Err(Error::NoVictim { policy: "fifo" }));
    }

    #[test]
    fn it_refuses_to_drop_first() {
        // given
        let (order, entry_pointers) = fixture(&["a", "b"]);
        let candidates = Candidates::new(&order, entry_pointers.iter());

        // when
        let result = DropFirstEviction.select_victim(&candidates);

        // then
        assert_eq!(
            result,
            Err(Error::NotImplemented {
                policy: "drop-first"
            })
        );
    }

    #[test]
    fn it_refuses_to_drop_random() {
        // given
        let (order, entry_pointers) = fixture(&["a", "b"]);
        let candidates = Candidates::new(&order, entry_pointers.iter());

        // when
        let result = DropRandomEviction.select_victim(&candidates);

        // then
        assert_eq!(
            result,
            Err(Error::NotImplemented {
                policy: "drop-random"
            })
        );
    }

    #[test]
    fn it_exposes_entries_in_recency_order() {
        // given
        let (order, entry_pointers) = fixture(&["a", "b", "c"]);
        let candidates = Candidates::new(&order, entry_pointers.iter());

        // when
        let keys: Vec<_> = candidates.iter().map(|(_, key, _)| *key).collect();
        let newest = candidates.newest().unwrap();

        // then
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(newest.slot(), entry_pointers["c"]);
        assert_eq!(candidates.len(), 3);
        assert!(!candidates.is_empty());
    }

    #[test]
    fn it_exposes_every_entry_unordered() {
        // given
        let (order, entry_pointers) = fixture(&["a", "b", "c"]);
        let candidates = Candidates::new(&order, entry_pointers.iter());

        // when
        let mut keys: Vec<_> = candidates.unordered().map(|(_, key, _)| *key).collect();
        keys.sort_unstable();

        // then
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
