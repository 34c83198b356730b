use std::fmt;

use crate::fst_impls::compact_fst::{CompactFst, Compactor};
use crate::fst_traits::{CoreFst, StateIterator};
use crate::semirings::{Semiring, SerializableSemiring};
use crate::trs::Trs;

impl<W: SerializableSemiring, C: Compactor<W>> fmt::Display for CompactFst<W, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_fst!(self, f, true);
        Ok(())
    }
}
