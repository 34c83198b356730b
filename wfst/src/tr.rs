use std::fmt;

use crate::{Label, StateId};

/// Transition out of a state: input label, output label, weight and
/// destination state. The source state is implicit.
#[derive(Debug, Clone, PartialOrd, PartialEq)]
#[repr(C)]
pub struct Tr<W> {
    /// Input label.
    pub ilabel: Label,
    /// Output label.
    pub olabel: Label,
    /// Weight in the semiring `W`.
    pub weight: W,
    /// ID of the destination state.
    pub nextstate: StateId,
}

impl<W> Tr<W> {
    pub fn new<S: Into<W>>(ilabel: Label, olabel: Label, weight: S, nextstate: StateId) -> Self {
        Tr {
            ilabel,
            olabel,
            weight: weight.into(),
            nextstate,
        }
    }

    /// Updates the weight, keeping labels and destination.
    pub fn set_weight(&mut self, weight: W) {
        self.weight = weight;
    }
}

impl<W: fmt::Display> fmt::Display for Tr<W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.ilabel, self.olabel, self.weight, self.nextstate
        )
    }
}
