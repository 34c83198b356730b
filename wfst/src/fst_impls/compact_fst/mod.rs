pub use self::compactor::{Compactor, ExpandFlags};
pub use self::compactors::{
    AcceptorCompactor, StringCompactor, UnweightedAcceptorCompactor, UnweightedCompactor,
    WeightedStringCompactor,
};
pub use self::data_structure::{CompactFst, CompactStore};
pub use self::iterators::CompactTrsIterator;

mod compactor;
mod compactors;
mod data_structure;
mod expanded_fst;
mod fst;
mod iterators;
mod misc;
mod serializable_fst;
