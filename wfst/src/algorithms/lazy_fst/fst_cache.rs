use std::fmt::Debug;

use crate::algorithms::lazy_fst::CacheStatus;
use crate::semirings::Semiring;
use crate::{StateId, TrsVec};

/// Per-state lazy store backing delayed FSTs: start state, final weights and
/// transitions, each computed at most once between evictions. Implementations
/// are internally synchronized; a caller observing `NotComputed` recomputes
/// and inserts.
pub trait FstCache<W: Semiring>: Debug {
    fn get_start(&self) -> CacheStatus<Option<StateId>>;
    fn insert_start(&self, id: Option<StateId>);

    fn get_trs(&self, id: StateId) -> CacheStatus<TrsVec<W>>;
    fn insert_trs(&self, id: StateId, trs: TrsVec<W>);

    fn get_final_weight(&self, id: StateId) -> CacheStatus<Option<W>>;
    fn insert_final_weight(&self, id: StateId, weight: Option<W>);

    /// Number of states whose expansion has at least started.
    fn num_known_states(&self) -> usize;

    fn num_trs(&self, id: StateId) -> Option<usize>;
    fn num_input_epsilons(&self, id: StateId) -> Option<usize>;
    fn num_output_epsilons(&self, id: StateId) -> Option<usize>;
}
