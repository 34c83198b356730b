use std::fmt;

use crate::fst_impls::VectorFst;
use crate::fst_traits::{CoreFst, StateIterator};
use crate::semirings::{Semiring, SerializableSemiring};
use crate::trs::Trs;

display_fst_trait!(W, VectorFst<W>);
