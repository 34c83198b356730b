use std::sync::Arc;

use anyhow::{format_err, Result};
use unsafe_unwrap::UnsafeUnwrap;

use crate::fst_impls::VectorFst;
use crate::fst_properties::FstProperties;
use crate::fst_traits::{CoreFst, Fst};
use crate::semirings::Semiring;
use crate::trs::{Trs, TrsVec};
use crate::{StateId, SymbolTable};

impl<W: Semiring> CoreFst<W> for VectorFst<W> {
    type TRS = TrsVec<W>;

    fn start(&self) -> Option<StateId> {
        self.start_state
    }

    fn final_weight(&self, state_id: StateId) -> Result<Option<W>> {
        let s = self
            .states
            .get(state_id as usize)
            .ok_or_else(|| format_err!("State {:?} doesn't exist", state_id))?;
        Ok(s.final_weight.clone())
    }

    unsafe fn final_weight_unchecked(&self, state_id: StateId) -> Option<W> {
        self.states
            .get_unchecked(state_id as usize)
            .final_weight
            .clone()
    }

    fn num_trs(&self, state_id: StateId) -> Result<usize> {
        let s = self
            .states
            .get(state_id as usize)
            .ok_or_else(|| format_err!("State {:?} doesn't exist", state_id))?;
        Ok(s.trs.len())
    }

    unsafe fn num_trs_unchecked(&self, state_id: StateId) -> usize {
        self.states.get_unchecked(state_id as usize).trs.len()
    }

    fn get_trs(&self, state_id: StateId) -> Result<Self::TRS> {
        let s = self
            .states
            .get(state_id as usize)
            .ok_or_else(|| format_err!("State {:?} doesn't exist", state_id))?;
        Ok(s.trs.shallow_clone())
    }

    unsafe fn get_trs_unchecked(&self, state_id: StateId) -> Self::TRS {
        self.states
            .get_unchecked(state_id as usize)
            .trs
            .shallow_clone()
    }

    fn properties(&self) -> FstProperties {
        self.properties
    }

    fn num_input_epsilons(&self, state_id: StateId) -> Result<usize> {
        let s = self
            .states
            .get(state_id as usize)
            .ok_or_else(|| format_err!("State {:?} doesn't exist", state_id))?;
        Ok(s.niepsilons)
    }

    fn num_output_epsilons(&self, state_id: StateId) -> Result<usize> {
        let s = self
            .states
            .get(state_id as usize)
            .ok_or_else(|| format_err!("State {:?} doesn't exist", state_id))?;
        Ok(s.noepsilons)
    }
}

impl<W: Semiring> Fst<W> for VectorFst<W> {
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

impl<W: Semiring> VectorFst<W> {
    /// State accessor shared by the mutation paths.
    pub(crate) fn state_mut(&mut self, state_id: StateId) -> Result<&mut super::VectorFstState<W>> {
        self.states
            .get_mut(state_id as usize)
            .ok_or_else(|| format_err!("State {:?} doesn't exist", state_id))
    }

    pub(crate) unsafe fn state_unchecked_mut(
        &mut self,
        state_id: StateId,
    ) -> &mut super::VectorFstState<W> {
        self.states.get_mut(state_id as usize).unsafe_unwrap()
    }
}
