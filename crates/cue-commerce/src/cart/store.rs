//! The cart store: single owner of cart state.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::cart::{
    CartItem, CartPricing, CartRepository, Customization, NewCartItem, PersistedCart,
};
use crate::cart::pricing;
use crate::config::StoreConfig;
use crate::error::CommerceError;
use crate::ids::LineItemId;
use crate::money::{Currency, Money};

#[derive(Debug, Default)]
struct CartState {
    items: Vec<CartItem>,
    is_open: bool,
}

/// A shopping cart with drawer visibility, mirrored to a [`CartRepository`].
///
/// Every method is an atomic state transition: the state lock is held for
/// the whole operation, including the write to the repository, so
/// concurrent callers see the operations applied in arrival order and
/// persisted records never interleave. In-memory state is authoritative; a
/// failed save is logged and the cart carries on session-only.
///
/// Counts and totals are computed from the current lines on every call.
#[derive(Debug)]
pub struct CartStore<R: CartRepository> {
    state: Mutex<CartState>,
    repository: R,
    config: StoreConfig,
}

impl<R: CartRepository> CartStore<R> {
    /// Create an empty, closed cart without reading the repository.
    pub fn new(repository: R, config: StoreConfig) -> Self {
        Self {
            state: Mutex::new(CartState::default()),
            repository,
            config,
        }
    }

    /// Restore the cart from the repository.
    ///
    /// The drawer always starts closed. If the stored cart cannot be read
    /// the cart starts empty. Restoring does not write back.
    pub fn open(repository: R, config: StoreConfig) -> Self {
        let items = match repository.load() {
            Ok(Some(cart)) => sanitize(cart.items, &config),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(
                    store = %config.store_name,
                    error = %e,
                    "failed to restore cart, starting empty"
                );
                Vec::new()
            }
        };

        debug!(store = %config.store_name, lines = items.len(), "cart restored");

        Self {
            state: Mutex::new(CartState {
                items,
                is_open: false,
            }),
            repository,
            config,
        }
    }

    /// Add a line, or grow the quantity of the line it is identical to.
    ///
    /// Lines are identical when product, variation and customization all
    /// match. A merge keeps the existing line's id, name, price, image and
    /// sku; only the quantity changes.
    ///
    /// Returns the id of the line that now holds the quantity.
    pub fn add_item(&self, item: NewCartItem) -> Result<LineItemId, CommerceError> {
        self.validate_new_item(&item)?;
        let max = self.config.max_quantity_per_line;

        let mut state = self.lock();

        if let Some(existing) = state
            .items
            .iter_mut()
            .find(|line| line.line_key() == item.line_key())
        {
            let new_quantity = existing
                .quantity
                .checked_add(item.quantity)
                .ok_or(CommerceError::Overflow)?;
            if new_quantity > max {
                return Err(CommerceError::QuantityExceedsLimit(new_quantity, max));
            }

            existing.quantity = new_quantity;
            let id = existing.id.clone();
            debug!(
                store = %self.config.store_name,
                line_item_id = %id,
                product_id = %item.product_id,
                quantity = new_quantity,
                "cart line merged"
            );
            self.persist(&state);
            return Ok(id);
        }

        let id = fresh_id(&state.items);
        debug!(
            store = %self.config.store_name,
            line_item_id = %id,
            product_id = %item.product_id,
            quantity = item.quantity,
            "cart line added"
        );
        state.items.push(CartItem::from_new(id.clone(), item));
        self.persist(&state);
        Ok(id)
    }

    /// Remove a line. Returns whether a line was removed; removing an
    /// unknown id is a no-op.
    pub fn remove_item(&self, id: &LineItemId) -> bool {
        let mut state = self.lock();
        self.remove_locked(&mut state, id)
    }

    /// Set a line's quantity.
    ///
    /// A quantity of zero or less removes the line. Returns whether a line
    /// was changed; an unknown id is a no-op.
    pub fn update_quantity(&self, id: &LineItemId, quantity: i64) -> Result<bool, CommerceError> {
        let mut state = self.lock();

        if quantity <= 0 {
            return Ok(self.remove_locked(&mut state, id));
        }

        let max = self.config.max_quantity_per_line;
        if quantity > max {
            return Err(CommerceError::QuantityExceedsLimit(quantity, max));
        }

        let Some(line) = state.items.iter_mut().find(|line| &line.id == id) else {
            return Ok(false);
        };
        line.quantity = quantity;
        debug!(
            store = %self.config.store_name,
            line_item_id = %id,
            quantity,
            "cart line quantity updated"
        );
        self.persist(&state);
        Ok(true)
    }

    /// Empty the cart and close the drawer.
    pub fn clear_cart(&self) {
        let mut state = self.lock();
        state.items.clear();
        state.is_open = false;
        debug!(store = %self.config.store_name, "cart cleared");
        self.persist(&state);
    }

    /// Flip drawer visibility. Returns the new visibility.
    pub fn toggle_cart(&self) -> bool {
        let mut state = self.lock();
        state.is_open = !state.is_open;
        state.is_open
    }

    /// Show the drawer.
    pub fn open_cart(&self) {
        self.lock().is_open = true;
    }

    /// Hide the drawer.
    pub fn close_cart(&self) {
        self.lock().is_open = false;
    }

    /// Whether the drawer is visible.
    pub fn is_open(&self) -> bool {
        self.lock().is_open
    }

    /// Snapshot of the lines, in insertion order.
    pub fn items(&self) -> Vec<CartItem> {
        self.lock().items.clone()
    }

    /// Snapshot of one line.
    pub fn get_item(&self, id: &LineItemId) -> Option<CartItem> {
        self.lock().items.iter().find(|line| &line.id == id).cloned()
    }

    /// Sum of quantities over all lines.
    pub fn item_count(&self) -> i64 {
        pricing::item_count(&self.lock().items)
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lock().items.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Sum of `(price + enabled engraving surcharge) * quantity`.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        pricing::subtotal(&self.lock().items, self.config.currency)
    }

    /// Full pricing breakdown.
    pub fn pricing(&self) -> Result<CartPricing, CommerceError> {
        CartPricing::from_items(&self.lock().items, self.config.currency)
    }

    /// The currency every line is priced in.
    pub fn currency(&self) -> Currency {
        self.config.currency
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove_locked(&self, state: &mut CartState, id: &LineItemId) -> bool {
        let len_before = state.items.len();
        state.items.retain(|line| &line.id != id);
        let removed = state.items.len() < len_before;
        if removed {
            debug!(store = %self.config.store_name, line_item_id = %id, "cart line removed");
            self.persist(state);
        }
        removed
    }

    fn persist(&self, state: &CartState) {
        let cart = PersistedCart {
            items: state.items.clone(),
        };
        if let Err(e) = self.repository.save(&cart) {
            warn!(
                store = %self.config.store_name,
                error = %e,
                "failed to persist cart, keeping it in memory only"
            );
        }
    }

    fn validate_new_item(&self, item: &NewCartItem) -> Result<(), CommerceError> {
        check_line(
            item.quantity,
            &item.price,
            item.customization.as_ref(),
            &self.config,
        )
    }
}

/// Check a line's quantity and prices against the store's limits and
/// currency. Applies to new lines and to restored ones.
fn check_line(
    quantity: i64,
    price: &Money,
    customization: Option<&Customization>,
    config: &StoreConfig,
) -> Result<(), CommerceError> {
    if quantity <= 0 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    let max = config.max_quantity_per_line;
    if quantity > max {
        return Err(CommerceError::QuantityExceedsLimit(quantity, max));
    }

    check_price(price, config.currency)?;
    if let Some(engraving) = customization.and_then(|c| c.laser_engraving.as_ref()) {
        check_price(&engraving.price, config.currency)?;
    }
    Ok(())
}

fn check_price(price: &Money, currency: Currency) -> Result<(), CommerceError> {
    if price.currency != currency {
        return Err(CommerceError::CurrencyMismatch {
            expected: currency.code().to_string(),
            got: price.currency.code().to_string(),
        });
    }
    if price.is_negative() {
        return Err(CommerceError::InvalidPrice(price.display_amount()));
    }
    Ok(())
}

/// An id no current line uses.
fn fresh_id(items: &[CartItem]) -> LineItemId {
    loop {
        let id = LineItemId::generate();
        if items.iter().all(|line| line.id != id) {
            return id;
        }
    }
}

/// Drop restored lines that break the cart's invariants: quantities
/// outside `1..=max_quantity_per_line`, prices that are negative or in
/// another currency, and repeated ids (first occurrence wins).
fn sanitize(items: Vec<CartItem>, config: &StoreConfig) -> Vec<CartItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|line| {
            let checked = check_line(
                line.quantity,
                &line.price,
                line.customization.as_ref(),
                config,
            );
            if let Err(e) = checked {
                warn!(
                    store = %config.store_name,
                    line_item_id = %line.id,
                    error = %e,
                    "dropping invalid restored line"
                );
                return false;
            }
            if !seen.insert(line.id.clone()) {
                warn!(
                    store = %config.store_name,
                    line_item_id = %line.id,
                    "dropping restored line with duplicate id"
                );
                return false;
            }
            true
        })
        .collect()
}
