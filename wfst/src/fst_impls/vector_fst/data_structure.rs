use std::sync::Arc;

use crate::fst_properties::FstProperties;
use crate::semirings::Semiring;
use crate::trs::TrsVec;
use crate::{StateId, SymbolTable};

/// Mutable wFST, keeping one adjacency list per state. Construction is
/// incremental; property knowledge is maintained on every mutation.
#[derive(Debug, Clone)]
pub struct VectorFst<W: Semiring> {
    pub(crate) states: Vec<VectorFstState<W>>,
    pub(crate) start_state: Option<StateId>,
    pub(crate) isymt: Option<Arc<SymbolTable>>,
    pub(crate) osymt: Option<Arc<SymbolTable>>,
    pub(crate) properties: FstProperties,
    /// Whether recoverable failures abort the mutation instead of marking
    /// the machine with the `ERROR` property.
    pub(crate) error_fatal: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VectorFstState<W: Semiring> {
    pub(crate) final_weight: Option<W>,
    pub(crate) trs: TrsVec<W>,
    pub(crate) niepsilons: usize,
    pub(crate) noepsilons: usize,
}

impl<W: Semiring> VectorFstState<W> {
    pub(crate) fn new() -> Self {
        Self {
            final_weight: None,
            trs: TrsVec::default(),
            niepsilons: 0,
            noepsilons: 0,
        }
    }
}

/// Structural equality: same start, same final weights, same transitions in
/// the same order. Property knowledge and symbol tables are not compared.
impl<W: Semiring> PartialEq for VectorFst<W> {
    fn eq(&self, other: &Self) -> bool {
        self.start_state == other.start_state && self.states == other.states
    }
}
