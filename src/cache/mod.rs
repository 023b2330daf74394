//! Persistent fact cache.
//!
//! Indexing a large project is the slowest pipeline stage, so fact streams
//! are cached on disk keyed by a hash of everything that could change them.

mod escape;
mod indexer;
mod key;
mod store;

pub use escape::{escape, join_escaped, split_escaped, unescape};
pub use indexer::{restore_scope, CachingIndexer};
pub use key::cache_key;
pub use store::{resolve_cache_directory, CacheOptions, FactCache, DEFAULT_CACHE_DIR_NAME};
