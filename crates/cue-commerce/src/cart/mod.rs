//! Shopping cart module.
//!
//! Contains the cart line model, the store that owns cart state, pricing,
//! persistence, and the add-to-cart facade.

mod facade;
mod item;
mod notify;
mod pricing;
mod repository;
mod store;

pub use facade::{AddToCartOptions, CartFacade};
pub use item::{
    CartItem, ClothChange, Customization, LaserEngraving, LineKey, NewCartItem,
    VariationAttributes,
};
pub use notify::{Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use pricing::{item_count, subtotal, CartPricing, LineItemPricing};
pub use repository::{CartRepository, KvCartRepository, MemoryCartRepository, PersistedCart};
pub use store::CartStore;
