//! Add-to-cart entry point for storefront surfaces.

use tracing::debug;

use crate::cart::{
    CartRepository, CartStore, Customization, NewCartItem, Notification, Notifier,
    VariationAttributes,
};
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::{LineItemId, VariantId};

/// Options for [`CartFacade::add_to_cart`].
#[derive(Debug, Clone, PartialEq)]
pub struct AddToCartOptions {
    pub quantity: i64,
    pub variation_id: Option<VariantId>,
    pub variation: Option<VariationAttributes>,
    pub customization: Option<Customization>,
}

impl Default for AddToCartOptions {
    fn default() -> Self {
        Self {
            quantity: 1,
            variation_id: None,
            variation: None,
            customization: None,
        }
    }
}

impl AddToCartOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_variation(
        mut self,
        variation_id: impl Into<VariantId>,
        attributes: VariationAttributes,
    ) -> Self {
        self.variation_id = Some(variation_id.into());
        self.variation = Some(attributes);
        self
    }

    pub fn with_customization(mut self, customization: Customization) -> Self {
        self.customization = Some(customization);
        self
    }
}

/// Adds catalog products to a [`CartStore`], then tells the shopper and
/// shows the drawer.
///
/// Bulk or programmatic changes should go to the store directly; they must
/// not toast or open the drawer.
pub struct CartFacade<'a, R: CartRepository, N: Notifier> {
    store: &'a CartStore<R>,
    notifier: N,
}

impl<'a, R: CartRepository, N: Notifier> CartFacade<'a, R, N> {
    pub fn new(store: &'a CartStore<R>, notifier: N) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &CartStore<R> {
        self.store
    }

    /// Snapshot `product` into a cart line and add it.
    ///
    /// On success the shopper is notified and the drawer opens. On error
    /// nothing is added, nobody is notified and visibility is unchanged.
    pub fn add_to_cart(
        &self,
        product: &Product,
        options: AddToCartOptions,
    ) -> Result<LineItemId, CommerceError> {
        let price = product.unit_price(self.store.currency())?;

        let item = NewCartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price,
            quantity: options.quantity,
            image: product.primary_image().to_string(),
            sku: product.sku.clone(),
            variation_id: options.variation_id,
            variation: options.variation,
            customization: options.customization,
        };

        let id = self.store.add_item(item)?;
        debug!(product_id = %product.id, line_item_id = %id, "product added through facade");

        self.notifier
            .notify(Notification::new(format!("{} added to cart", product.name)));
        self.store.open_cart();
        Ok(id)
    }
}
