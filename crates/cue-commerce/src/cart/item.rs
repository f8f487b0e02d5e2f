//! Cart line types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{LineItemId, ProductId, VariantId};
use crate::money::Money;

/// Attribute name to chosen value, e.g. `"Tamaño" -> "9 pies"`.
pub type VariationAttributes = BTreeMap<String, String>;

/// A line in the cart.
///
/// Everything except `quantity` is a snapshot taken when the line was first
/// added; later adds of the same line only grow the quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Unique line identifier.
    pub id: LineItemId,
    /// Catalog product this line refers to.
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    /// Unit price, excluding any engraving surcharge.
    pub price: Money,
    /// Quantity, always positive.
    pub quantity: i64,
    /// Representative image URL.
    #[serde(default)]
    pub image: String,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: String,
    /// Product variation, for variable products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<VariantId>,
    /// Human-readable record of the variation choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation: Option<VariationAttributes>,
    /// Line-specific services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<Customization>,
}

impl CartItem {
    /// Build a line from a payload and an assigned id.
    pub(crate) fn from_new(id: LineItemId, item: NewCartItem) -> Self {
        Self {
            id,
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
            image: item.image,
            sku: item.sku,
            variation_id: item.variation_id,
            variation: item.variation,
            customization: item.customization,
        }
    }

    /// The identity this line merges on.
    pub fn line_key(&self) -> LineKey<'_> {
        LineKey::new(
            &self.product_id,
            self.variation_id.as_ref(),
            self.customization.as_ref(),
        )
    }

    /// Per-unit engraving surcharge, if engraving is enabled.
    pub fn engraving_surcharge(&self) -> Option<Money> {
        self.customization
            .as_ref()
            .and_then(Customization::engraving_surcharge)
    }

    /// Unit price including any enabled surcharge. `None` on overflow or
    /// currency mismatch.
    pub fn effective_unit_price(&self) -> Option<Money> {
        match self.engraving_surcharge() {
            Some(surcharge) => self.price.try_add(&surcharge),
            None => Some(self.price),
        }
    }

    /// `effective_unit_price * quantity`.
    pub fn line_total(&self) -> Option<Money> {
        self.effective_unit_price()?.try_multiply(self.quantity)
    }
}

/// A cart line before it has been assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Money,
    pub quantity: i64,
    pub image: String,
    pub sku: String,
    pub variation_id: Option<VariantId>,
    pub variation: Option<VariationAttributes>,
    pub customization: Option<Customization>,
}

impl NewCartItem {
    /// Create a payload with no image, sku, variation or customization.
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        quantity: i64,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            price,
            quantity,
            image: String::new(),
            sku: String::new(),
            variation_id: None,
            variation: None,
            customization: None,
        }
    }

    /// Set the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the SKU.
    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = sku.into();
        self
    }

    /// Set the variation id and its attributes.
    pub fn with_variation(
        mut self,
        variation_id: impl Into<VariantId>,
        attributes: VariationAttributes,
    ) -> Self {
        self.variation_id = Some(variation_id.into());
        self.variation = Some(attributes);
        self
    }

    /// Attach a customization.
    pub fn with_customization(mut self, customization: Customization) -> Self {
        self.customization = Some(customization);
        self
    }

    /// The identity this payload merges on.
    pub fn line_key(&self) -> LineKey<'_> {
        LineKey::new(
            &self.product_id,
            self.variation_id.as_ref(),
            self.customization.as_ref(),
        )
    }
}

/// Line-specific services attached to a cart line.
///
/// Both sub-records are independent and optional. Equality is structural,
/// so two customizations built in any field order compare equal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    /// Custom laser engraving, priced per unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laser_engraving: Option<LaserEngraving>,
    /// Cloth change service; carries no surcharge of its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloth_change: Option<ClothChange>,
}

impl Customization {
    /// Customization with only an engraving.
    pub fn engraving(text: impl Into<String>, price: Money) -> Self {
        Self {
            laser_engraving: Some(LaserEngraving {
                enabled: true,
                text: text.into(),
                price,
            }),
            cloth_change: None,
        }
    }

    /// Customization with only a cloth change.
    pub fn cloth_change(cloth_change: ClothChange) -> Self {
        Self {
            laser_engraving: None,
            cloth_change: Some(cloth_change),
        }
    }

    /// Check if neither sub-record is present.
    pub fn is_empty(&self) -> bool {
        self.laser_engraving.is_none() && self.cloth_change.is_none()
    }

    /// Per-unit surcharge contributed by an enabled engraving.
    pub fn engraving_surcharge(&self) -> Option<Money> {
        self.laser_engraving
            .as_ref()
            .filter(|e| e.enabled)
            .map(|e| e.price)
    }
}

/// Laser engraving of custom text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaserEngraving {
    /// Whether the surcharge applies.
    pub enabled: bool,
    /// Text to engrave.
    pub text: String,
    /// Per-unit surcharge.
    pub price: Money,
}

/// Cloth change service details.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClothChange {
    pub dimensions: String,
    pub color: String,
    pub color_id: String,
    pub area: String,
}

/// The identity two cart lines merge on: product, variation and the full
/// customization record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineKey<'a> {
    product_id: &'a ProductId,
    variation_id: Option<&'a VariantId>,
    customization: Option<&'a Customization>,
}

impl<'a> LineKey<'a> {
    /// An empty customization is the same as none at all.
    fn new(
        product_id: &'a ProductId,
        variation_id: Option<&'a VariantId>,
        customization: Option<&'a Customization>,
    ) -> Self {
        Self {
            product_id,
            variation_id,
            customization: customization.filter(|c| !c.is_empty()),
        }
    }
}
