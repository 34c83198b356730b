pub use self::fst_convert::{fst_convert, fst_convert_from_ref};

mod fst_convert;
pub mod lazy_fst;
