use std::collections::{HashMap, VecDeque};
use std::mem::size_of;
use std::sync::{Arc, Mutex};

use log::debug;

use crate::algorithms::lazy_fst::{CacheStatus, FstCache};
use crate::config::FstConfig;
use crate::semirings::Semiring;
use crate::tr::Tr;
use crate::trs::Trs;
use crate::{StateId, TrsVec, EPS_LABEL};

/// Bounded cache with garbage collection. Once the resident transitions
/// exceed the byte budget, unpinned states are evicted in insertion order; a
/// state is pinned while a `TrsVec` handed out by `get_trs` is still alive
/// (a live iterator holds one). A zero budget disables transition caching
/// altogether; evicted states are simply recomputed on the next access.
#[derive(Debug)]
pub struct GcCache<W: Semiring> {
    start: Mutex<CacheStatus<Option<StateId>>>,
    data: Mutex<GcCacheData<W>>,
    gc: bool,
    limit: usize,
}

#[derive(Debug)]
struct GcCacheData<W: Semiring> {
    trs: HashMap<StateId, CachedTrs<W>>,
    final_weights: HashMap<StateId, Option<W>>,
    insert_order: VecDeque<StateId>,
    cache_size: usize,
}

#[derive(Debug)]
struct CachedTrs<W: Semiring> {
    trs: TrsVec<W>,
    niepsilons: usize,
    noepsilons: usize,
}

impl<W: Semiring> CachedTrs<W> {
    fn byte_size(&self) -> usize {
        self.trs.len() * size_of::<Tr<W>>()
    }

    /// The cache itself holds one handle; any further one pins the state.
    fn is_pinned(&self) -> bool {
        Arc::strong_count(&self.trs.0) > 1
    }
}

impl<W: Semiring> GcCache<W> {
    pub fn new(gc: bool, limit: usize) -> Self {
        Self {
            start: Mutex::new(CacheStatus::NotComputed),
            data: Mutex::new(GcCacheData {
                trs: HashMap::new(),
                final_weights: HashMap::new(),
                insert_order: VecDeque::new(),
                cache_size: 0,
            }),
            gc,
            limit,
        }
    }

    pub fn from_config(config: &FstConfig) -> Self {
        Self::new(config.cache_gc, config.cache_gc_limit)
    }

    /// Bytes currently occupied by resident transitions.
    pub fn cache_size(&self) -> usize {
        self.data.lock().unwrap().cache_size
    }

    pub fn gc(&self) -> bool {
        self.gc
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl<W: Semiring> Default for GcCache<W> {
    fn default() -> Self {
        Self::from_config(&FstConfig::default())
    }
}

impl<W: Semiring> GcCacheData<W> {
    fn garbage_collect(&mut self, limit: usize) {
        let mut scanned = 0;
        let queue_len = self.insert_order.len();
        while self.cache_size > limit && scanned < queue_len {
            scanned += 1;
            let id = match self.insert_order.pop_front() {
                Some(id) => id,
                None => break,
            };
            let pinned = self.trs.get(&id).map(|c| c.is_pinned()).unwrap_or(false);
            if pinned {
                self.insert_order.push_back(id);
                continue;
            }
            if let Some(evicted) = self.trs.remove(&id) {
                self.cache_size -= evicted.byte_size();
                debug!("Cache GC : evicted state {}", id);
            }
        }
    }
}

impl<W: Semiring> FstCache<W> for GcCache<W> {
    fn get_start(&self) -> CacheStatus<Option<StateId>> {
        *self.start.lock().unwrap()
    }

    fn insert_start(&self, id: Option<StateId>) {
        *self.start.lock().unwrap() = CacheStatus::Computed(id);
    }

    fn get_trs(&self, id: StateId) -> CacheStatus<TrsVec<W>> {
        match self.data.lock().unwrap().trs.get(&id) {
            Some(cached) => CacheStatus::Computed(cached.trs.shallow_clone()),
            None => CacheStatus::NotComputed,
        }
    }

    fn insert_trs(&self, id: StateId, trs: TrsVec<W>) {
        if self.limit == 0 {
            return;
        }
        let niepsilons = trs.trs().iter().filter(|tr| tr.ilabel == EPS_LABEL).count();
        let noepsilons = trs.trs().iter().filter(|tr| tr.olabel == EPS_LABEL).count();
        let cached = CachedTrs {
            trs,
            niepsilons,
            noepsilons,
        };
        let new_size = cached.byte_size();
        let mut data = self.data.lock().unwrap();
        match data.trs.insert(id, cached) {
            Some(old) => data.cache_size -= old.byte_size(),
            None => data.insert_order.push_back(id),
        }
        data.cache_size += new_size;
        if self.gc && data.cache_size > self.limit {
            data.garbage_collect(self.limit);
        }
    }

    fn get_final_weight(&self, id: StateId) -> CacheStatus<Option<W>> {
        match self.data.lock().unwrap().final_weights.get(&id) {
            Some(weight) => CacheStatus::Computed(weight.clone()),
            None => CacheStatus::NotComputed,
        }
    }

    fn insert_final_weight(&self, id: StateId, weight: Option<W>) {
        self.data.lock().unwrap().final_weights.insert(id, weight);
    }

    fn num_known_states(&self) -> usize {
        let data = self.data.lock().unwrap();
        let n_trs = data.trs.keys().map(|id| *id as usize + 1).max().unwrap_or(0);
        let n_final = data
            .final_weights
            .keys()
            .map(|id| *id as usize + 1)
            .max()
            .unwrap_or(0);
        n_trs.max(n_final)
    }

    fn num_trs(&self, id: StateId) -> Option<usize> {
        self.data.lock().unwrap().trs.get(&id).map(|c| c.trs.len())
    }

    fn num_input_epsilons(&self, id: StateId) -> Option<usize> {
        self.data.lock().unwrap().trs.get(&id).map(|c| c.niepsilons)
    }

    fn num_output_epsilons(&self, id: StateId) -> Option<usize> {
        self.data.lock().unwrap().trs.get(&id).map(|c| c.noepsilons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::TropicalWeight;

    fn trs_of_len(n: usize, nextstate: StateId) -> TrsVec<TropicalWeight> {
        let trs: Vec<_> = (0..n)
            .map(|idx| Tr::new(idx as i32 + 1, idx as i32 + 1, TropicalWeight::one(), nextstate))
            .collect();
        trs.into()
    }

    #[test]
    fn test_gc_cache_fifo_eviction() {
        // Budget sized to hold exactly 3 states of 2 transitions each.
        let tr_bytes = size_of::<Tr<TropicalWeight>>();
        let cache = GcCache::<TropicalWeight>::new(true, 3 * 2 * tr_bytes);
        for state in 0..5 {
            cache.insert_trs(state, trs_of_len(2, state));
            assert!(cache.cache_size() <= 3 * 2 * tr_bytes);
        }
        // FIFO: states 0 and 1 evicted, 2..=4 resident.
        assert!(!cache.get_trs(0).is_computed());
        assert!(!cache.get_trs(1).is_computed());
        for state in 2..5 {
            assert!(cache.get_trs(state).is_computed());
        }
    }

    #[test]
    fn test_gc_cache_never_evicts_pinned() {
        let tr_bytes = size_of::<Tr<TropicalWeight>>();
        let cache = GcCache::<TropicalWeight>::new(true, 2 * tr_bytes);
        cache.insert_trs(0, trs_of_len(2, 0));
        // Live handle on state 0, as an iterator would hold.
        let pinned = cache.get_trs(0).into_option().unwrap();
        for state in 1..4 {
            cache.insert_trs(state, trs_of_len(2, state));
        }
        assert!(cache.get_trs(0).is_computed());
        assert_eq!(pinned.len(), 2);
    }

    #[test]
    fn test_gc_cache_zero_limit_disables_caching() {
        let cache = GcCache::<TropicalWeight>::new(true, 0);
        cache.insert_trs(0, trs_of_len(2, 0));
        assert!(!cache.get_trs(0).is_computed());
        assert_eq!(cache.cache_size(), 0);
    }

    #[test]
    fn test_gc_cache_zero_limit_disables_caching_without_gc() {
        // A zero budget wins even when garbage collection is off.
        let cache = GcCache::<TropicalWeight>::new(false, 0);
        cache.insert_trs(0, trs_of_len(2, 0));
        assert!(!cache.get_trs(0).is_computed());
        assert_eq!(cache.cache_size(), 0);
    }
}
