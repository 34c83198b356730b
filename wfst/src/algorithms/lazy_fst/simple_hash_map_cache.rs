use std::collections::HashMap;
use std::sync::Mutex;

use crate::algorithms::lazy_fst::{CacheStatus, FstCache};
use crate::semirings::Semiring;
use crate::trs::Trs;
use crate::{StateId, TrsVec, EPS_LABEL};

/// Unbounded cache over hash maps. Never evicts; suited to delayed FSTs whose
/// reachable state set is small.
#[derive(Debug)]
pub struct SimpleHashMapCache<W: Semiring> {
    start: Mutex<CacheStatus<Option<StateId>>>,
    trs: Mutex<HashMap<StateId, CachedTrs<W>>>,
    final_weights: Mutex<HashMap<StateId, Option<W>>>,
}

#[derive(Debug)]
struct CachedTrs<W: Semiring> {
    trs: TrsVec<W>,
    niepsilons: usize,
    noepsilons: usize,
}

impl<W: Semiring> SimpleHashMapCache<W> {
    pub fn new() -> Self {
        Self {
            start: Mutex::new(CacheStatus::NotComputed),
            trs: Mutex::new(HashMap::new()),
            final_weights: Mutex::new(HashMap::new()),
        }
    }
}

impl<W: Semiring> Default for SimpleHashMapCache<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Semiring> FstCache<W> for SimpleHashMapCache<W> {
    fn get_start(&self) -> CacheStatus<Option<StateId>> {
        *self.start.lock().unwrap()
    }

    fn insert_start(&self, id: Option<StateId>) {
        *self.start.lock().unwrap() = CacheStatus::Computed(id);
    }

    fn get_trs(&self, id: StateId) -> CacheStatus<TrsVec<W>> {
        match self.trs.lock().unwrap().get(&id) {
            Some(cached) => CacheStatus::Computed(cached.trs.shallow_clone()),
            None => CacheStatus::NotComputed,
        }
    }

    fn insert_trs(&self, id: StateId, trs: TrsVec<W>) {
        let niepsilons = trs.trs().iter().filter(|tr| tr.ilabel == EPS_LABEL).count();
        let noepsilons = trs.trs().iter().filter(|tr| tr.olabel == EPS_LABEL).count();
        self.trs.lock().unwrap().insert(
            id,
            CachedTrs {
                trs,
                niepsilons,
                noepsilons,
            },
        );
    }

    fn get_final_weight(&self, id: StateId) -> CacheStatus<Option<W>> {
        match self.final_weights.lock().unwrap().get(&id) {
            Some(weight) => CacheStatus::Computed(weight.clone()),
            None => CacheStatus::NotComputed,
        }
    }

    fn insert_final_weight(&self, id: StateId, weight: Option<W>) {
        self.final_weights.lock().unwrap().insert(id, weight);
    }

    fn num_known_states(&self) -> usize {
        let mut n = 0;
        n = n.max(
            self.trs
                .lock()
                .unwrap()
                .keys()
                .map(|id| *id as usize + 1)
                .max()
                .unwrap_or(0),
        );
        n = n.max(
            self.final_weights
                .lock()
                .unwrap()
                .keys()
                .map(|id| *id as usize + 1)
                .max()
                .unwrap_or(0),
        );
        n
    }

    fn num_trs(&self, id: StateId) -> Option<usize> {
        self.trs.lock().unwrap().get(&id).map(|c| c.trs.len())
    }

    fn num_input_epsilons(&self, id: StateId) -> Option<usize> {
        self.trs.lock().unwrap().get(&id).map(|c| c.niepsilons)
    }

    fn num_output_epsilons(&self, id: StateId) -> Option<usize> {
        self.trs.lock().unwrap().get(&id).map(|c| c.noepsilons)
    }
}
