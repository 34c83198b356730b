use std::ops::Range;

use anyhow::{format_err, Result};

use crate::fst_impls::compact_fst::{CompactFst, Compactor, ExpandFlags};
use crate::fst_traits::{FstIterData, FstIterator, StateIterator};
use crate::semirings::Semiring;
use crate::tr::Tr;
use crate::trs::Trs;
use crate::{StateId, TrsVec};

impl<'a, W: Semiring, C: Compactor<W>> StateIterator<'a> for CompactFst<W, C> {
    type Iter = Range<StateId>;

    fn states_iter(&'a self) -> Self::Iter {
        0..(self.store.num_states() as StateId)
    }
}

/// On-demand transition iterator over one state, decoding straight from the
/// store and bypassing the cache. The first compact is peeked for the
/// superfinal transition and skipped when present.
pub struct CompactTrsIterator<'a, W: Semiring, C: Compactor<W>> {
    fst: &'a CompactFst<W, C>,
    state: StateId,
    pos: usize,
    end: usize,
    flags: ExpandFlags,
}

impl<'a, W: Semiring, C: Compactor<W>> Iterator for CompactTrsIterator<'a, W, C> {
    type Item = Tr<W>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        let element = self.fst.element(self.pos);
        self.pos += 1;
        Some(self.fst.compactor.expand(self.state, &element, self.flags))
    }
}

impl<'a, W: Semiring, C: Compactor<W>> ExactSizeIterator for CompactTrsIterator<'a, W, C> {
    fn len(&self) -> usize {
        self.end - self.pos
    }
}

impl<W: Semiring, C: Compactor<W>> CompactFst<W, C> {
    /// Iterates the transitions of `state` without populating the cache.
    pub fn trs_iter(&self, state: StateId) -> Result<CompactTrsIterator<'_, W, C>> {
        self.trs_iter_with_flags(state, ExpandFlags::ALL)
    }

    /// Same, with partial expansion: only the fields selected by `flags` are
    /// guaranteed valid on the yielded transitions.
    pub fn trs_iter_with_flags(
        &self,
        state: StateId,
        flags: ExpandFlags,
    ) -> Result<CompactTrsIterator<'_, W, C>> {
        if state < 0 || state as usize >= self.store.num_states() {
            return Err(format_err!("State {:?} doesn't exist", state));
        }
        let (begin, len) = self.store.state_span(state, self.compactor.size());
        let mut pos = begin;
        if self.final_tr(state).is_some() {
            pos += 1;
        }
        Ok(CompactTrsIterator {
            fst: self,
            state,
            pos,
            end: begin + len,
            flags,
        })
    }
}

pub struct CompactFstIterator<'a, W: Semiring, C: Compactor<W>> {
    fst: &'a CompactFst<W, C>,
    state: StateId,
}

impl<'a, W: Semiring, C: Compactor<W>> Iterator for CompactFstIterator<'a, W, C> {
    type Item = FstIterData<W, TrsVec<W>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state as usize >= self.fst.store.num_states() {
            return None;
        }
        let state_id = self.state;
        self.state += 1;
        let trs = unsafe { crate::fst_traits::CoreFst::get_trs_unchecked(self.fst, state_id) };
        Some(FstIterData {
            state_id,
            final_weight: self.fst.final_tr(state_id).map(|tr| tr.weight),
            num_trs: trs.len(),
            trs,
        })
    }
}

impl<'a, W: Semiring, C: Compactor<W> + 'a> FstIterator<'a, W> for CompactFst<W, C> {
    type FstIter = CompactFstIterator<'a, W, C>;

    fn fst_iter(&'a self) -> Self::FstIter {
        CompactFstIterator {
            fst: self,
            state: 0,
        }
    }
}
