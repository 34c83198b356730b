use crate::fst_traits::CoreFst;
use crate::semirings::Semiring;
use crate::StateId;

/// Trait to iterate over the states of a wFST.
pub trait StateIterator<'a> {
    /// Iterator used to iterate over the `state_id` of the states of an FST.
    type Iter: Iterator<Item = StateId>;

    fn states_iter(&'a self) -> Self::Iter;
}

/// Data yielded for one state when iterating over a whole machine.
pub struct FstIterData<W, T> {
    pub state_id: StateId,
    pub final_weight: Option<W>,
    pub trs: T,
    pub num_trs: usize,
}

/// Trait to iterate over states together with their transitions and final
/// weight.
pub trait FstIterator<'a, W: Semiring>: CoreFst<W> {
    type FstIter: Iterator<Item = FstIterData<W, Self::TRS>>;
    fn fst_iter(&'a self) -> Self::FstIter;
}
