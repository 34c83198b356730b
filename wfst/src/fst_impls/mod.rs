pub use self::compact_fst::CompactFst;
pub use self::vector_fst::VectorFst;

pub mod compact_fst;
pub mod vector_fst;
