use std::fmt::Debug;
use std::sync::Arc;

use anyhow::Result;

use crate::fst_properties::FstProperties;
use crate::fst_traits::{FstIterator, StateIterator};
use crate::semirings::Semiring;
use crate::trs::Trs;
use crate::{StateId, SymbolTable, EPS_LABEL};

/// Read-only access to the structure of a wFST: start state, final weights
/// and out-transitions.
pub trait CoreFst<W: Semiring> {
    /// Container returned by `get_trs`, borrowing or sharing the transitions
    /// leaving one state.
    type TRS: Trs<W>;

    /// Returns the ID of the start state, if any. `None` denotes the empty
    /// machine.
    fn start(&self) -> Option<StateId>;

    /// Retrieves the final weight of a state, `None` if the state is not
    /// final. An error is raised if the state doesn't exist.
    fn final_weight(&self, state_id: StateId) -> Result<Option<W>>;
    /// Undefined behaviour if the state doesn't exist.
    unsafe fn final_weight_unchecked(&self, state_id: StateId) -> Option<W>;

    /// Number of transitions leaving a state.
    fn num_trs(&self, state_id: StateId) -> Result<usize>;
    unsafe fn num_trs_unchecked(&self, state_id: StateId) -> usize;

    /// The transitions leaving a state.
    fn get_trs(&self, state_id: StateId) -> Result<Self::TRS>;
    unsafe fn get_trs_unchecked(&self, state_id: StateId) -> Self::TRS;

    /// The property bits currently asserted or denied by this machine. Pairs
    /// with no bit set are unknown.
    fn properties(&self) -> FstProperties;

    fn is_final(&self, state_id: StateId) -> Result<bool> {
        Ok(self.final_weight(state_id)?.is_some())
    }

    fn is_start(&self, state_id: StateId) -> bool {
        Some(state_id) == self.start()
    }

    /// Number of transitions with epsilon input label leaving a state.
    fn num_input_epsilons(&self, state_id: StateId) -> Result<usize> {
        Ok(self
            .get_trs(state_id)?
            .trs()
            .iter()
            .filter(|tr| tr.ilabel == EPS_LABEL)
            .count())
    }

    /// Number of transitions with epsilon output label leaving a state.
    fn num_output_epsilons(&self, state_id: StateId) -> Result<usize> {
        Ok(self
            .get_trs(state_id)?
            .trs()
            .iter()
            .filter(|tr| tr.olabel == EPS_LABEL)
            .count())
    }
}

/// Minimum interface of a wFST, adding symbol tables and whole-machine
/// iteration on top of [`CoreFst`].
pub trait Fst<W: Semiring>:
    CoreFst<W> + for<'a> StateIterator<'a> + for<'b> FstIterator<'b, W> + Debug
{
    fn input_symbols(&self) -> Option<&Arc<SymbolTable>>;
    fn output_symbols(&self) -> Option<&Arc<SymbolTable>>;

    fn set_input_symbols(&mut self, symt: Arc<SymbolTable>);
    fn set_output_symbols(&mut self, symt: Arc<SymbolTable>);

    fn take_input_symbols(&mut self) -> Option<Arc<SymbolTable>>;
    fn take_output_symbols(&mut self) -> Option<Arc<SymbolTable>>;
}
