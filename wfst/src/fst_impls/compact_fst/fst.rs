use std::sync::Arc;

use anyhow::{format_err, Result};

use crate::algorithms::lazy_fst::{CacheStatus, FstCache};
use crate::fst_impls::compact_fst::{CompactFst, Compactor, ExpandFlags};
use crate::fst_properties::FstProperties;
use crate::fst_traits::{CoreFst, Fst};
use crate::semirings::Semiring;
use crate::tr::Tr;
use crate::{StateId, SymbolTable, TrsVec, NO_STATE_ID};

impl<W: Semiring, C: Compactor<W>> CompactFst<W, C> {
    fn check_state(&self, state_id: StateId) -> Result<()> {
        if state_id < 0 || state_id as usize >= self.store.num_states() {
            return Err(format_err!("State {:?} doesn't exist", state_id));
        }
        Ok(())
    }

    /// Whether the first compact of `state` is the superfinal transition,
    /// and its expansion if so.
    pub(crate) fn final_tr(&self, state_id: StateId) -> Option<Tr<W>> {
        let (begin, len) = self.store.state_span(state_id, self.compactor.size());
        if len == 0 {
            return None;
        }
        let element = self.element(begin);
        let tr = self.compactor.expand(state_id, &element, ExpandFlags::ALL);
        if tr.nextstate == NO_STATE_ID {
            Some(tr)
        } else {
            None
        }
    }

    fn expand_state(&self, state_id: StateId) -> TrsVec<W> {
        match self.cache.get_trs(state_id) {
            CacheStatus::Computed(trs) => trs,
            CacheStatus::NotComputed => {
                let (begin, len) = self.store.state_span(state_id, self.compactor.size());
                let mut pos = begin;
                let mut remaining = len;
                if self.final_tr(state_id).is_some() {
                    pos += 1;
                    remaining -= 1;
                }
                let mut trs = Vec::with_capacity(remaining);
                for idx in pos..pos + remaining {
                    let element = self.element(idx);
                    trs.push(self.compactor.expand(state_id, &element, ExpandFlags::ALL));
                }
                let trs: TrsVec<W> = trs.into();
                self.cache.insert_trs(state_id, trs.shallow_clone());
                trs
            }
        }
    }
}

impl<W: Semiring, C: Compactor<W>> CoreFst<W> for CompactFst<W, C> {
    type TRS = TrsVec<W>;

    fn start(&self) -> Option<StateId> {
        self.start_state
    }

    fn final_weight(&self, state_id: StateId) -> Result<Option<W>> {
        self.check_state(state_id)?;
        Ok(self.final_tr(state_id).map(|tr| tr.weight))
    }

    unsafe fn final_weight_unchecked(&self, state_id: StateId) -> Option<W> {
        self.final_tr(state_id).map(|tr| tr.weight)
    }

    fn num_trs(&self, state_id: StateId) -> Result<usize> {
        self.check_state(state_id)?;
        let (_, len) = self.store.state_span(state_id, self.compactor.size());
        let finals = if self.final_tr(state_id).is_some() { 1 } else { 0 };
        Ok(len - finals)
    }

    unsafe fn num_trs_unchecked(&self, state_id: StateId) -> usize {
        let (_, len) = self.store.state_span(state_id, self.compactor.size());
        let finals = if self.final_tr(state_id).is_some() { 1 } else { 0 };
        len - finals
    }

    fn get_trs(&self, state_id: StateId) -> Result<Self::TRS> {
        self.check_state(state_id)?;
        Ok(self.expand_state(state_id))
    }

    unsafe fn get_trs_unchecked(&self, state_id: StateId) -> Self::TRS {
        self.expand_state(state_id)
    }

    fn properties(&self) -> FstProperties {
        self.properties
    }
}

impl<W: Semiring, C: Compactor<W> + 'static> Fst<W> for CompactFst<W, C> {
    fn input_symbols(&self) -> Option<&Arc<SymbolTable>> {
        self.isymt.as_ref()
    }

    fn output_symbols(&self) -> Option<&Arc<SymbolTable>> {
        self.osymt.as_ref()
    }

    fn set_input_symbols(&mut self, symt: Arc<SymbolTable>) {
        self.isymt = Some(symt);
    }

    fn set_output_symbols(&mut self, symt: Arc<SymbolTable>) {
        self.osymt = Some(symt);
    }

    fn take_input_symbols(&mut self) -> Option<Arc<SymbolTable>> {
        self.isymt.take()
    }

    fn take_output_symbols(&mut self) -> Option<Arc<SymbolTable>> {
        self.osymt.take()
    }
}
