use anyhow::Result;

use crate::fst_properties::{compute_fst_properties, FstProperties};
use crate::fst_traits::Fst;
use crate::semirings::Semiring;
use crate::StateId;

/// A wFST whose state set is fully materialized. `num_states` is
/// well-defined and states are densely numbered in `[0, num_states)`.
pub trait ExpandedFst<W: Semiring>: Fst<W> + Clone + PartialEq {
    fn num_states(&self) -> usize;

    fn states_range(&self) -> std::ops::Range<StateId> {
        0..(self.num_states() as StateId)
    }

    /// Runs a full property computation; afterwards every pair is known.
    fn compute_properties(&self) -> Result<FstProperties> {
        compute_fst_properties(self)
    }
}
