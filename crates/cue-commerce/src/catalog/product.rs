//! Catalog product record.

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Product type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Simple product with no variations.
    #[default]
    Simple,
    /// Product with variations (e.g., size, cloth color).
    Variable,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Simple => "simple",
            ProductType::Variable => "variable",
        }
    }
}

/// A product image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProductImage {
    /// Image URL.
    pub src: String,
    /// Alt text.
    #[serde(default)]
    pub alt: String,
}

/// A product as served by the catalog.
///
/// Prices are kept as the decimal strings the catalog serves; the cart
/// parses them into [`Money`] when a line is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Product {
    /// Catalog product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// URL-friendly slug.
    #[serde(default)]
    pub slug: String,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: String,
    /// Current selling price.
    pub price: String,
    /// List price.
    #[serde(default)]
    pub regular_price: String,
    /// Sale price, empty when not on sale.
    #[serde(default)]
    pub sale_price: String,
    /// Images, primary first.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Type of product.
    #[serde(default, rename = "type")]
    pub product_type: ProductType,
}

impl Product {
    /// Create a simple product with a price and no images.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price.into(),
            ..Self::default()
        }
    }

    /// Set the SKU.
    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = sku.into();
        self
    }

    /// Append an image.
    pub fn with_image(mut self, src: impl Into<String>) -> Self {
        self.images.push(ProductImage {
            src: src.into(),
            alt: String::new(),
        });
        self
    }

    /// URL of the primary image, or an empty string when there is none.
    pub fn primary_image(&self) -> &str {
        self.images.first().map(|i| i.src.as_str()).unwrap_or("")
    }

    /// Parse the selling price in the given currency.
    pub fn unit_price(&self, currency: Currency) -> Result<Money, CommerceError> {
        Money::parse(&self.price, currency)
    }

    /// Check if the product has a sale price below its regular price.
    pub fn is_on_sale(&self) -> bool {
        let (Ok(sale), Ok(regular)) = (
            Money::parse(&self.sale_price, Currency::default()),
            Money::parse(&self.regular_price, Currency::default()),
        ) else {
            return false;
        };
        sale.amount_cents < regular.amount_cents
    }
}
