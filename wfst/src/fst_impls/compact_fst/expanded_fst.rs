use crate::fst_impls::compact_fst::{CompactFst, Compactor};
use crate::fst_traits::ExpandedFst;
use crate::semirings::Semiring;

impl<W: Semiring, C: Compactor<W> + 'static> ExpandedFst<W> for CompactFst<W, C> {
    fn num_states(&self) -> usize {
        self.store.num_states()
    }
}
