pub mod cache;
pub mod fields;

pub use cache::{CacheError, Field, ParameterCache, Value, Width, CACHE_SLOTS};
