//! Product catalog module.
//!
//! Contains the product record the storefront hands to the cart.

mod product;

pub use product::{Product, ProductImage, ProductType};
