//! Rust library for building, transforming and serializing weighted
//! finite-state transducers (wFSTs). A wFST is a directed multigraph whose
//! transitions carry an input label, an output label and a weight drawn from
//! a semiring; it represents a weighted relation between string sets.
//!
//! The crate provides:
//! - the polymorphic semiring layer ([`semirings`]) and its composite
//!   constructions (product, power, expectation, lexicographic, string,
//!   gallic),
//! - the mutable in-memory representation ([`fst_impls::VectorFst`]) and the
//!   read-only packed representation ([`fst_impls::CompactFst`])
//!   parameterized by a [`fst_impls::compact_fst::Compactor`],
//! - the lazy computation cache backing delayed FSTs ([`algorithms::lazy_fst`]),
//! - the binary file format with memory-mappable sections ([`parsers`]),
//! - keyed archives of FSTs ([`far`]).

#[macro_use]
mod macros;

pub use crate::config::FstConfig;
pub use crate::symbol_table::SymbolTable;
pub use crate::tr::Tr;
pub use crate::trs::{Trs, TrsVec};

pub mod algorithms;
mod config;
pub mod far;
pub mod fst_impls;
pub mod fst_properties;
pub mod fst_traits;
pub mod parsers;
pub mod semirings;
mod symbol_table;
mod tr;
mod trs;
pub mod utils;

/// Symbol on a transition. `0` is reserved for epsilon, positive values index
/// into an external [`SymbolTable`].
pub type Label = i32;

/// Index of a state. States of an expanded FST are densely numbered from 0.
pub type StateId = i32;

/// Label value denoting the absence of a label, used by the superfinal
/// transition convention.
pub const NO_LABEL: Label = -1;

/// State value denoting the absence of a state, e.g. the destination of a
/// superfinal transition.
pub const NO_STATE_ID: StateId = -1;

/// Epsilon label, consumed or produced without a visible symbol.
pub const EPS_LABEL: Label = 0;

/// Epsilon symbol as rendered in text formats.
pub const EPS_SYMBOL: &str = "<eps>";

/// Default tolerance used by weight quantization and approximate equality.
pub const KDELTA: f32 = 1.0f32 / 1024.0f32;

/// A few very commonly used traits, functions and types.
pub mod prelude {
    pub use crate::algorithms::lazy_fst::{FstCache, FstOp, GcCache, LazyFst};
    pub use crate::far::{FarReader, FarWriter, FarType};
    pub use crate::fst_impls::compact_fst::{
        AcceptorCompactor, CompactFst, Compactor, StringCompactor, UnweightedAcceptorCompactor,
        UnweightedCompactor, WeightedStringCompactor,
    };
    pub use crate::fst_impls::VectorFst;
    pub use crate::fst_properties::FstProperties;
    pub use crate::fst_traits::{
        CoreFst, ExpandedFst, Fst, MutableFst, SerializableFst, StateIterator,
    };
    pub use crate::semirings::*;
    pub use crate::tr::Tr;
    pub use crate::trs::{Trs, TrsVec};
    pub use crate::{FstConfig, SymbolTable};
    pub use crate::{Label, StateId, EPS_LABEL, KDELTA, NO_LABEL, NO_STATE_ID};
}
