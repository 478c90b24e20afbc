use std::cell::Cell;

/// Counters collected since the previous call to [`crate::StaticDict::stats`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Stats {
    pub miss_count: u64,
    pub hit_count: u64,
    pub eviction_count: u64,
    pub millis_elapsed: u128,
}

// Lookups only take `&self`, so the counters need interior mutability.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    hit_count: Cell<u64>,
    miss_count: Cell<u64>,
    eviction_count: Cell<u64>,
}

impl Counters {
    pub(crate) fn hit_count(&self) -> u64 {
        self.hit_count.get()
    }

    pub(crate) fn miss_count(&self) -> u64 {
        self.miss_count.get()
    }

    pub(crate) fn eviction_count(&self) -> u64 {
        self.eviction_count.get()
    }

    pub(crate) fn increment_hit_count(&self) {
        self.hit_count.set(self.hit_count.get().saturating_add(1));
    }

    pub(crate) fn increment_miss_count(&self) {
        self.miss_count.set(self.miss_count.get().saturating_add(1));
    }

    pub(crate) fn increment_eviction_count(&self) {
        self.eviction_count
            .set(self.eviction_count.get().saturating_add(1));
    }

    pub(crate) fn reset(&self) {
        self.hit_count.set(0);
        self.miss_count.set(0);
        self.eviction_count.set(0);
    }
}
