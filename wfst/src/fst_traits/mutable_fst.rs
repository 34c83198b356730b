use anyhow::Result;

use crate::fst_properties::FstProperties;
use crate::fst_traits::ExpandedFst;
use crate::semirings::Semiring;
use crate::tr::Tr;
use crate::{Label, StateId};

/// Trait defining the methods to modify a wFST.
pub trait MutableFst<W: Semiring>: ExpandedFst<W> {
    /// Creates an empty wFST.
    fn new() -> Self;

    /// The state with identifier `state_id` is now the start state. Only one
    /// start state is allowed; calling this function twice overrides the
    /// first start state. If the `state_id` doesn't exist an error is raised.
    fn set_start(&mut self, state_id: StateId) -> Result<()>;
    unsafe fn set_start_unchecked(&mut self, state_id: StateId);

    /// The state with identifier `state_id` is now a final state with weight
    /// `final_weight`. If the `state_id` doesn't exist an error is raised.
    fn set_final<S: Into<W>>(&mut self, state_id: StateId, final_weight: S) -> Result<()>;
    unsafe fn set_final_unchecked<S: Into<W>>(&mut self, state_id: StateId, final_weight: S);

    /// Adds a new state with `zero` final weight and no transitions, and
    /// returns its identifier. O(1) amortized.
    fn add_state(&mut self) -> StateId;
    fn add_states(&mut self, n: usize);

    /// Appends a transition to the state `source`. O(1) amortized. If the
    /// append breaks label sortedness, the corresponding known-bits are
    /// dropped.
    fn add_tr(&mut self, source: StateId, tr: Tr<W>) -> Result<()>;
    unsafe fn add_tr_unchecked(&mut self, source: StateId, tr: Tr<W>);

    fn emplace_tr<S: Into<W>>(
        &mut self,
        source: StateId,
        ilabel: Label,
        olabel: Label,
        weight: S,
        nextstate: StateId,
    ) -> Result<()> {
        self.add_tr(source, Tr::new(ilabel, olabel, weight, nextstate))
    }

    /// Removes a state and every transition reaching it. Remaining states are
    /// renumbered to stay dense; previously obtained identifiers are invalid
    /// afterwards.
    fn del_state(&mut self, state_id: StateId) -> Result<()>;

    /// Removes multiple states at once; same renumbering caveat as
    /// [`MutableFst::del_state`].
    fn del_states<T: IntoIterator<Item = StateId>>(&mut self, states: T) -> Result<()>;

    /// Removes every state, transition and the start state.
    fn del_all_states(&mut self);

    /// Removes the final weight of a state, making it non-final.
    fn delete_final_weight(&mut self, source: StateId) -> Result<()>;

    /// Removes all transitions leaving a state.
    fn delete_trs(&mut self, source: StateId) -> Result<()>;

    /// Removes and returns all transitions leaving a state.
    fn pop_trs(&mut self, source: StateId) -> Result<Vec<Tr<W>>>;

    /// Takes the final weight out of the machine, leaving the state
    /// non-final.
    fn take_final_weight(&mut self, state_id: StateId) -> Result<Option<W>>;

    /// Pre-allocation hint; behavior is otherwise unchanged.
    fn reserve_states(&mut self, n: usize);
    /// Pre-allocation hint for the transitions of one state.
    fn reserve_trs(&mut self, source: StateId, n: usize) -> Result<()>;

    /// Overrides the property bits. The caller is responsible for their
    /// truth; the `ERROR` bit can be set but never cleared this way.
    fn set_properties(&mut self, props: FstProperties);

    /// Runs a full property computation and stores the result, making every
    /// pair known.
    fn compute_and_update_properties(&mut self) -> Result<FstProperties> {
        let props = self.compute_properties()?;
        self.set_properties(props);
        Ok(props)
    }
}
