//! Cart engine for the Cue pool-table storefront.
//!
//! This crate holds the shopper's cart between catalog browsing and
//! checkout:
//!
//! - **Catalog**: the product record the storefront hands to the cart
//! - **Cart**: lines with customizations, merge identity, pricing, drawer visibility
//! - **Persistence**: a repository mirroring the cart into a key-value store
//! - **Facade**: add-to-cart with a shopper notification
//!
//! # Example
//!
//! ```rust,ignore
//! use cue_commerce::prelude::*;
//!
//! let cache = Cache::new(FileBackend::open(".cue/storage")?);
//! let config = StoreConfig::default();
//! let store = CartStore::open(KvCartRepository::new(cache, &config.store_name), config);
//!
//! let product = Product::new(7u64, "Mesa Pool 9 pies", "4500000").with_sku("MP9");
//! let facade = CartFacade::new(&store, TracingNotifier);
//! facade.add_to_cart(&product, AddToCartOptions::default())?;
//!
//! println!("Subtotal: {}", store.subtotal()?.display());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod config;

pub use config::StoreConfig;
pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::StoreConfig;
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Product, ProductImage, ProductType};

    // Cart
    pub use crate::cart::{
        AddToCartOptions, CartFacade, CartItem, CartPricing, CartRepository, CartStore,
        ClothChange, Customization, KvCartRepository, LaserEngraving, LineItemPricing,
        MemoryCartRepository, NewCartItem, Notification, Notifier,
        PersistedCart, RecordingNotifier, TracingNotifier, VariationAttributes,
    };

    // Storage
    pub use cue_cache::{Cache, FileBackend, MemoryBackend};
}
