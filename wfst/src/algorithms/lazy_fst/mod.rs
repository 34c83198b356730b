pub use self::cache_status::CacheStatus;
pub use self::fst_cache::FstCache;
pub use self::fst_op::FstOp;
pub use self::gc_cache::GcCache;
pub use self::lazy_fst::LazyFst;
pub use self::simple_hash_map_cache::SimpleHashMapCache;

mod cache_status;
mod fst_cache;
mod fst_op;
mod gc_cache;
mod lazy_fst;
mod simple_hash_map_cache;
