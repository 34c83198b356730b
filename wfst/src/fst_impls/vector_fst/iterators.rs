use std::ops::Range;

use crate::fst_impls::VectorFst;
use crate::fst_traits::{FstIterData, FstIterator, StateIterator};
use crate::semirings::Semiring;
use crate::trs::{Trs, TrsVec};
use crate::StateId;

impl<'a, W: Semiring> StateIterator<'a> for VectorFst<W> {
    type Iter = Range<StateId>;

    fn states_iter(&'a self) -> Self::Iter {
        0..(self.states.len() as StateId)
    }
}

pub struct VectorFstIterator<'a, W: Semiring> {
    fst: &'a VectorFst<W>,
    state: StateId,
}

impl<'a, W: Semiring> Iterator for VectorFstIterator<'a, W> {
    type Item = FstIterData<W, TrsVec<W>>;

    fn next(&mut self) -> Option<Self::Item> {
        let state = self.fst.states.get(self.state as usize)?;
        let data = FstIterData {
            state_id: self.state,
            final_weight: state.final_weight.clone(),
            trs: state.trs.shallow_clone(),
            num_trs: state.trs.len(),
        };
        self.state += 1;
        Some(data)
    }
}

impl<'a, W: Semiring> FstIterator<'a, W> for VectorFst<W> {
    type FstIter = VectorFstIterator<'a, W>;

    fn fst_iter(&'a self) -> Self::FstIter {
        VectorFstIterator {
            fst: self,
            state: 0,
        }
    }
}
