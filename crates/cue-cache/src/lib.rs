//! Type-safe Key-Value storage layer for the Cue cart engine.
//!
//! Provides a simple, ergonomic API for keeping small JSON records in a
//! pluggable Key-Value backend: an in-memory map for session-only state, or
//! a directory of files for state that must survive a restart.
//!
//! # Example
//!
//! ```rust,ignore
//! use cue_cache::{Cache, FileBackend};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Cart {
//!     items: Vec<CartItem>,
//! }
//!
//! let cache = Cache::new(FileBackend::open(".cue/storage")?);
//!
//! // Store a value
//! cache.set("cart-storage", &cart)?;
//!
//! // Retrieve a value
//! let cart: Option<Cart> = cache.get("cart-storage")?;
//!
//! // Delete a value
//! cache.delete("cart-storage")?;
//! ```

mod backend;
mod error;
mod kv;

pub use backend::{FileBackend, KvBackend, MemoryBackend};
pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileBackend, KvBackend, MemoryBackend};
}
