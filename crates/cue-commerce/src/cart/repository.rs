//! Cart persistence gateway.

use std::sync::{Mutex, PoisonError};

use cue_cache::Cache;
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::error::CommerceError;

/// The persisted form of a cart: only its lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersistedCart {
    pub items: Vec<CartItem>,
}

/// Durable storage for a single cart.
pub trait CartRepository {
    /// Load the stored cart, `None` if nothing has been stored yet.
    fn load(&self) -> Result<Option<PersistedCart>, CommerceError>;

    /// Replace the stored cart.
    fn save(&self, cart: &PersistedCart) -> Result<(), CommerceError>;
}

impl<R: CartRepository + ?Sized> CartRepository for &R {
    fn load(&self) -> Result<Option<PersistedCart>, CommerceError> {
        (**self).load()
    }

    fn save(&self, cart: &PersistedCart) -> Result<(), CommerceError> {
        (**self).save(cart)
    }
}

/// Stores the cart as one JSON record in a [`Cache`].
#[derive(Debug, Clone)]
pub struct KvCartRepository {
    cache: Cache,
    key: String,
}

impl KvCartRepository {
    /// Store under `key` (normally the configured store name).
    pub fn new(cache: Cache, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
        }
    }

    /// The record key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl CartRepository for KvCartRepository {
    fn load(&self) -> Result<Option<PersistedCart>, CommerceError> {
        Ok(self.cache.get(&self.key)?)
    }

    fn save(&self, cart: &PersistedCart) -> Result<(), CommerceError> {
        Ok(self.cache.set(&self.key, cart)?)
    }
}

/// Keeps the last saved cart in memory.
#[derive(Debug, Default)]
pub struct MemoryCartRepository {
    saved: Mutex<Option<PersistedCart>>,
}

impl MemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously stored cart.
    pub fn with_cart(cart: PersistedCart) -> Self {
        Self {
            saved: Mutex::new(Some(cart)),
        }
    }

    /// The last saved cart.
    pub fn saved(&self) -> Option<PersistedCart> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CartRepository for MemoryCartRepository {
    fn load(&self) -> Result<Option<PersistedCart>, CommerceError> {
        Ok(self.saved())
    }

    fn save(&self, cart: &PersistedCart) -> Result<(), CommerceError> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = Some(cart.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::NewCartItem;
    use crate::ids::LineItemId;
    use crate::money::{Currency, Money};

    fn sample() -> PersistedCart {
        PersistedCart {
            items: vec![CartItem::from_new(
                LineItemId::new("line-1"),
                NewCartItem::new(1u64, "Taco X", Money::new(50000, Currency::COP), 2),
            )],
        }
    }

    #[test]
    fn test_kv_repository_roundtrip() {
        let repo = KvCartRepository::new(Cache::in_memory(), "cart-storage");

        assert_eq!(repo.load().unwrap(), None);
        repo.save(&sample()).unwrap();
        assert_eq!(repo.load().unwrap(), Some(sample()));
    }

    #[test]
    fn test_kv_repository_record_shape() {
        let cache = Cache::in_memory();
        let repo = KvCartRepository::new(cache.clone(), "cart-storage");
        repo.save(&sample()).unwrap();

        let raw: serde_json::Value = cache.get("cart-storage").unwrap().unwrap();
        let object = raw.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(raw["items"][0]["quantity"], 2);
    }

    #[test]
    fn test_kv_repository_corrupt_record() {
        let cache = Cache::in_memory();
        cache.set("cart-storage", &"not a cart").unwrap();
        let repo = KvCartRepository::new(cache, "cart-storage");

        assert!(matches!(repo.load(), Err(CommerceError::CacheError(_))));
    }

    #[test]
    fn test_memory_repository() {
        let repo = MemoryCartRepository::new();
        assert_eq!(repo.load().unwrap(), None);

        repo.save(&sample()).unwrap();
        assert_eq!(repo.saved(), Some(sample()));
    }
}
