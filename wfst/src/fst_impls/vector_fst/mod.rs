pub use self::data_structure::VectorFst;
pub(crate) use self::data_structure::VectorFstState;

mod data_structure;
mod expanded_fst;
mod fst;
mod iterators;
mod misc;
mod mutable_fst;
mod serializable_fst;
