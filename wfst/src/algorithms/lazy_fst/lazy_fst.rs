use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::Result;

use crate::algorithms::lazy_fst::{CacheStatus, FstCache, FstOp};
use crate::fst_properties::FstProperties;
use crate::fst_traits::MutableFst;
use crate::semirings::Semiring;
use crate::trs::Trs;
use crate::{StateId, SymbolTable, TrsVec};

/// Delayed FST: states are computed by `Op` on first access and memoized by
/// `Cache`. Accesses are synchronous; an access that triggers expansion
/// blocks until the expansion is done.
#[derive(Debug)]
pub struct LazyFst<W: Semiring, Op: FstOp<W>, Cache: FstCache<W>> {
    cache: Cache,
    op: Op,
    isymt: Option<Arc<SymbolTable>>,
    osymt: Option<Arc<SymbolTable>>,
    w: PhantomData<W>,
}

impl<W: Semiring, Op: FstOp<W>, Cache: FstCache<W>> LazyFst<W, Op, Cache> {
    pub fn from_op_and_cache(
        op: Op,
        cache: Cache,
        isymt: Option<Arc<SymbolTable>>,
        osymt: Option<Arc<SymbolTable>>,
    ) -> Self {
        Self {
            cache,
            op,
            isymt,
            osymt,
            w: PhantomData,
        }
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn start(&self) -> Result<Option<StateId>> {
        match self.cache.get_start() {
            CacheStatus::Computed(start) => Ok(start),
            CacheStatus::NotComputed => {
                let start = self.op.compute_start()?;
                self.cache.insert_start(start);
                Ok(start)
            }
        }
    }

    pub fn final_weight(&self, state_id: StateId) -> Result<Option<W>> {
        match self.cache.get_final_weight(state_id) {
            CacheStatus::Computed(weight) => Ok(weight),
            CacheStatus::NotComputed => {
                let weight = self.op.compute_final_weight(state_id)?;
                self.cache.insert_final_weight(state_id, weight.clone());
                Ok(weight)
            }
        }
    }

    pub fn get_trs(&self, state_id: StateId) -> Result<TrsVec<W>> {
        match self.cache.get_trs(state_id) {
            CacheStatus::Computed(trs) => Ok(trs),
            CacheStatus::NotComputed => {
                let trs = self.op.compute_trs(state_id)?;
                self.cache.insert_trs(state_id, trs.shallow_clone());
                Ok(trs)
            }
        }
    }

    pub fn num_trs(&self, state_id: StateId) -> Result<usize> {
        match self.cache.num_trs(state_id) {
            Some(n) => Ok(n),
            None => Ok(self.get_trs(state_id)?.len()),
        }
    }

    pub fn properties(&self) -> FstProperties {
        self.op.properties()
    }

    pub fn input_symbols(&self) -> Option<&Arc<SymbolTable>> {
        self.isymt.as_ref()
    }

    pub fn output_symbols(&self) -> Option<&Arc<SymbolTable>> {
        self.osymt.as_ref()
    }

    /// Materializes the whole reachable part of the machine into a mutable
    /// representation.
    pub fn compute<F2: MutableFst<W>>(&self) -> Result<F2> {
        let mut fst_out = F2::new();
        let start_state = match self.start()? {
            Some(s) => s,
            None => return Ok(fst_out),
        };

        let mut known = vec![];
        let mut frontier = VecDeque::new();
        frontier.push_back(start_state);
        let ensure_state = |fst_out: &mut F2, known: &mut Vec<bool>, s: StateId| {
            while fst_out.num_states() <= s as usize {
                fst_out.add_state();
                known.push(false);
            }
        };
        ensure_state(&mut fst_out, &mut known, start_state);
        known[start_state as usize] = true;

        while let Some(state) = frontier.pop_front() {
            for tr in self.get_trs(state)?.iter() {
                ensure_state(&mut fst_out, &mut known, tr.nextstate);
                if !known[tr.nextstate as usize] {
                    known[tr.nextstate as usize] = true;
                    frontier.push_back(tr.nextstate);
                }
                fst_out.add_tr(state, tr.clone())?;
            }
            if let Some(final_weight) = self.final_weight(state)? {
                fst_out.set_final(state, final_weight)?;
            }
        }

        fst_out.set_start(start_state)?;
        if let Some(isymt) = &self.isymt {
            fst_out.set_input_symbols(Arc::clone(isymt));
        }
        if let Some(osymt) = &self.osymt {
            fst_out.set_output_symbols(Arc::clone(osymt));
        }
        Ok(fst_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::lazy_fst::GcCache;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::{CoreFst, ExpandedFst};
    use crate::semirings::TropicalWeight;
    use crate::Tr;

    /// Delayed chain of `n` states, expanded on demand.
    #[derive(Debug)]
    struct ChainOp {
        n: StateId,
    }

    impl FstOp<TropicalWeight> for ChainOp {
        fn compute_start(&self) -> Result<Option<StateId>> {
            Ok(Some(0))
        }

        fn compute_trs(&self, id: StateId) -> Result<TrsVec<TropicalWeight>> {
            if id + 1 < self.n {
                Ok(vec![Tr::new(1, 1, TropicalWeight::new(1.0), id + 1)].into())
            } else {
                Ok(TrsVec::default())
            }
        }

        fn compute_final_weight(&self, id: StateId) -> Result<Option<TropicalWeight>> {
            if id + 1 == self.n {
                Ok(Some(TropicalWeight::one()))
            } else {
                Ok(None)
            }
        }

        fn properties(&self) -> FstProperties {
            FstProperties::empty()
        }
    }

    #[test]
    fn test_lazy_fst_compute() -> Result<()> {
        let lazy = LazyFst::from_op_and_cache(
            ChainOp { n: 4 },
            GcCache::<TropicalWeight>::default(),
            None,
            None,
        );
        let fst: VectorFst<TropicalWeight> = lazy.compute()?;
        assert_eq!(fst.num_states(), 4);
        assert_eq!(fst.start(), Some(0));
        assert_eq!(fst.final_weight(3)?, Some(TropicalWeight::one()));
        Ok(())
    }

    #[test]
    fn test_lazy_fst_memoizes() -> Result<()> {
        let lazy = LazyFst::from_op_and_cache(
            ChainOp { n: 3 },
            GcCache::<TropicalWeight>::default(),
            None,
            None,
        );
        assert_eq!(lazy.num_trs(0)?, 1);
        assert!(lazy.cache().get_trs(0).is_computed());
        assert_eq!(lazy.num_trs(0)?, 1);
        Ok(())
    }
}
