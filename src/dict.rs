use crate::Stats;
use crate::error::Error;
use entry::Entry;
use order_list::OrderList;
use policy::{Candidates, EvictionPolicy, FifoEviction};
use stats::Counters;
use std::borrow::Borrow;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::time::Instant;

mod entry;
mod order_list;
pub mod policy;
pub(crate) mod stats;

pub(crate) type RandomState = ahash::RandomState;

// Capacity is an upper bound, so only this many slots are reserved up front.
const MAX_PREALLOCATED_ENTRIES: usize = 1024;

/// Dictionary with a fixed maximum number of entries.
///
/// Keys are kept in the order they were last inserted or updated. When an insert of a new key
/// finds the dictionary full, the active [`EvictionPolicy`] picks one entry to drop first. The
/// default policy is [`FifoEviction`], which drops the entry that was written longest ago.
/// Reads never change the order.
///
/// The dictionary is single-threaded. Share it between threads only behind a lock of your
/// choosing.
pub struct StaticDict<K, V, S = RandomState> {
    capacity: usize,
    entry_pointers: HashMap<K, usize, S>,
    order: OrderList<Entry<K, V>>,
    eviction_policy: Box<dyn EvictionPolicy<K, V>>,
    counters: Counters,
    metrics_last_accessed: Cell<Instant>,
}

impl<K, V> StaticDict<K, V, RandomState>
where
    K: Clone + Eq + Hash,
{
    /// Creates an empty dictionary holding at most `capacity` entries, evicting in FIFO order.
    ///
    /// Fails with [`Error::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<StaticDict<K, V, RandomState>, Error> {
        StaticDict::with_capacity_and_hasher(capacity, Default::default())
    }

    /// Creates an empty dictionary holding at most `capacity` entries, evicting with `policy`.
    pub fn with_policy(
        capacity: usize,
        policy: Box<dyn EvictionPolicy<K, V>>,
    ) -> Result<StaticDict<K, V, RandomState>, Error> {
        StaticDict::with_policy_and_hasher(capacity, policy, Default::default())
    }
}

impl<K, V, S> StaticDict<K, V, S>
where
    K: Clone + Eq + Hash,
    S: BuildHasher,
{
    /// Creates an empty FIFO dictionary using `hash_builder` to hash the keys.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Result<Self, Error> {
        Self::with_policy_and_hasher(capacity, Box::new(FifoEviction), hash_builder)
    }

    /// Creates an empty dictionary evicting with `policy` and hashing keys with `hash_builder`.
    ///
    /// Fails with [`Error::InvalidCapacity`] if `capacity` is zero.
    pub fn with_policy_and_hasher(
        capacity: usize,
        policy: Box<dyn EvictionPolicy<K, V>>,
        hash_builder: S,
    ) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }

        let preallocated = capacity.min(MAX_PREALLOCATED_ENTRIES);

        Ok(Self {
            capacity,
            entry_pointers: HashMap::with_capacity_and_hasher(preallocated, hash_builder),
            order: OrderList::with_capacity(preallocated),
            eviction_policy: policy,
            counters: Counters::default(),
            metrics_last_accessed: Cell::new(Instant::now()),
        })
    }

    /// Inserts a key-value pair into the dictionary.
    ///
    /// If the dictionary did not have this key present, [`None`] is returned. When it is full, the
    /// eviction policy removes one entry before the new key is added.
    ///
    /// If the dictionary did have this key present, the value is updated, the key becomes the
    /// most recently written one, and the old value is returned. Nothing is evicted.
    ///
    /// Errors from the eviction policy are returned unchanged. The dictionary is not modified in
    /// that case.
    #[doc(alias = "insert_or_update")]
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        if let Some(&index) = self.entry_pointers.get(&key) {
            let entry = self
                .order
                .get_mut(index)
                .expect("an entry must exist for an entry pointer");
            let previous = entry.replace_value(value);
            self.order.move_to_back(index);
            return Ok(Some(previous));
        }

        if self.order.len() >= self.capacity {
            self.evict()?;
        }

        let index = self.order.push_back(Entry::new(key.clone(), value));
        self.entry_pointers.insert(key, index);

        Ok(None)
    }

    fn evict(&mut self) -> Result<(), Error> {
        let policy = self.eviction_policy.name();

        let selected = {
            let candidates = Candidates::new(&self.order, self.entry_pointers.iter());
            self.eviction_policy
                .select_victim(&candidates)
                .map(|victim| victim.slot())
        };

        let index = match selected {
            Ok(index) => index,
            Err(err) => {
                log::warn!("eviction with the {policy} policy failed, insert aborted: {err}");
                return Err(err);
            }
        };

        let entry = self.order.remove(index).ok_or(Error::NoVictim { policy })?;
        self.entry_pointers.remove(entry.key());
        self.counters.increment_eviction_count();

        log::debug!(
            "evicted one entry with the {policy} policy ({}/{} entries)",
            self.order.len(),
            self.capacity
        );

        Ok(())
    }

    /// Returns the value corresponding to the key, or [`None`] if it is absent.
    ///
    /// Lookups do not change the eviction order.
    #[doc(alias = "find")]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let value = self
            .entry_pointers
            .get(key)
            .and_then(|&index| self.order.get(index))
            .map(Entry::value);

        match value {
            Some(_) => self.counters.increment_hit_count(),
            None => self.counters.increment_miss_count(),
        }

        value
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).is_some()
    }

    /// Removes a key from the dictionary, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.entry_pointers.remove(key)?;
        self.order.remove(index).map(Entry::into_value)
    }

    /// Copies the current entries into a new map.
    ///
    /// The copy is detached: later writes to the dictionary do not show up in it.
    pub fn snapshot(&self) -> HashMap<K, V, S>
    where
        V: Clone,
        S: Clone,
    {
        let mut snapshot =
            HashMap::with_capacity_and_hasher(self.len(), self.entry_pointers.hasher().clone());
        snapshot.extend(self.iter().map(|(key, value)| (key.clone(), value.clone())));
        snapshot
    }
}

impl<K, V, S> StaticDict<K, V, S> {
    pub const FIFO_EVICTION_POLICY: policy::FifoEviction = policy::FifoEviction;
    pub const DROP_FIRST_EVICTION_POLICY: policy::DropFirstEviction = policy::DropFirstEviction;
    pub const DROP_RANDOM_EVICTION_POLICY: policy::DropRandomEviction =
        policy::DropRandomEviction;

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of entries in the dictionary.
    #[doc(alias = "count")]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.len() == 0
    }

    /// Removes every entry. The capacity and the eviction policy are kept.
    #[doc(alias = "remove_all")]
    pub fn clear(&mut self) {
        self.entry_pointers.clear();
        self.order.clear();
        log::trace!("cleared dictionary");
    }

    /// Replaces the eviction policy used by later inserts. [`None`] restores [`FifoEviction`].
    ///
    /// Entries already in the dictionary are neither reordered nor evicted.
    pub fn set_eviction_policy(&mut self, policy: Option<Box<dyn EvictionPolicy<K, V>>>) {
        self.eviction_policy = policy.unwrap_or_else(|| Box::new(FifoEviction));
        log::trace!("eviction policy set to {}", self.eviction_policy.name());
    }

    /// Name of the active eviction policy.
    pub fn eviction_policy(&self) -> &'static str {
        self.eviction_policy.name()
    }

    /// Iterates over the entries from least to most recently written.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order
            .iter()
            .map(|(_, entry)| (entry.key(), entry.value()))
    }

    /// Iterates over the keys from least to most recently written.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns the counters collected since the previous call and resets them.
    pub fn stats(&self) -> Stats {
        let now = Instant::now();
        let last_accessed = self.metrics_last_accessed.replace(now);

        let stats = Stats {
            hit_count: self.counters.hit_count(),
            miss_count: self.counters.miss_count(),
            eviction_count: self.counters.eviction_count(),
            millis_elapsed: now.duration_since(last_accessed).as_millis(),
        };
        self.counters.reset();

        stats
    }
}

impl<K, V, S> fmt::Debug for StaticDict<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticDict")
            .field("capacity", &self.capacity)
            .field("eviction_policy", &self.eviction_policy.name())
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a, K, V, S>(&'a StaticDict<K, V, S>);

impl<K, V, S> fmt::Debug for DebugEntries<'_, K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}
