use std::fmt::Debug;
use std::ops::Deref;
use std::sync::Arc;

use crate::tr::Tr;

/// Contiguous, cheaply clonable view on the transitions leaving one state.
pub trait Trs<W>: Deref<Target = [Tr<W>]> + Debug + Clone {
    fn trs(&self) -> &[Tr<W>];

    fn to_trs_vec(&self) -> TrsVec<W>;

    fn len(&self) -> usize {
        self.trs().len()
    }

    fn is_empty(&self) -> bool {
        self.trs().is_empty()
    }
}

/// Transition container sharing its storage. Cloning is O(1); mutation goes
/// through copy-on-write.
#[derive(Debug, PartialEq, PartialOrd)]
pub struct TrsVec<W>(pub Arc<Vec<Tr<W>>>);

impl<W: Clone + Debug> Trs<W> for TrsVec<W> {
    fn trs(&self) -> &[Tr<W>] {
        self.0.as_slice()
    }

    fn to_trs_vec(&self) -> TrsVec<W> {
        self.shallow_clone()
    }
}

impl<W: Clone> TrsVec<W> {
    pub fn push(&mut self, tr: Tr<W>) {
        Arc::make_mut(&mut self.0).push(tr)
    }

    pub fn remove(&mut self, index: usize) -> Tr<W> {
        Arc::make_mut(&mut self.0).remove(index)
    }

    /// Clone sharing the underlying storage with `self`.
    pub fn shallow_clone(&self) -> Self {
        TrsVec(Arc::clone(&self.0))
    }
}

impl<W: Clone> Clone for TrsVec<W> {
    fn clone(&self) -> Self {
        self.shallow_clone()
    }
}

impl<W> Deref for TrsVec<W> {
    type Target = [Tr<W>];
    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl<W> Default for TrsVec<W> {
    fn default() -> Self {
        TrsVec(Arc::new(vec![]))
    }
}

impl<W> From<Vec<Tr<W>>> for TrsVec<W> {
    fn from(trs: Vec<Tr<W>>) -> Self {
        TrsVec(Arc::new(trs))
    }
}
