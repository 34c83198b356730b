use std::fmt::Debug;

use anyhow::Result;

use crate::fst_properties::FstProperties;
use crate::semirings::Semiring;
use crate::{StateId, TrsVec};

/// Computation backing a delayed FST: produces the start state, the
/// transitions and the final weight of each state on demand. Results are
/// memoized by the cache in front of it.
pub trait FstOp<W: Semiring>: Debug {
    fn compute_start(&self) -> Result<Option<StateId>>;
    fn compute_trs(&self, id: StateId) -> Result<TrsVec<W>>;
    fn compute_final_weight(&self, id: StateId) -> Result<Option<W>>;

    fn properties(&self) -> FstProperties;
}
