pub use self::fst_header::{FstFlags, FstHeader, FST_MAGIC_NUMBER};

mod fst_header;
pub(crate) mod utils_serialization;
