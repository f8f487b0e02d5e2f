//! Cart pricing calculations.

use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::error::CommerceError;
use crate::ids::LineItemId;
use crate::money::{Currency, Money};

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of line totals, before shipping and taxes.
    pub subtotal: Money,
    /// Sum of quantities.
    pub item_count: i64,
    /// Number of distinct lines.
    pub line_count: usize,
    /// Per-line breakdown, in cart order.
    pub lines: Vec<LineItemPricing>,
}

impl CartPricing {
    /// Price a sequence of lines.
    ///
    /// Returns an error on overflow or if a line is priced in another
    /// currency.
    pub fn from_items(items: &[CartItem], currency: Currency) -> Result<Self, CommerceError> {
        let lines = items
            .iter()
            .map(|item| LineItemPricing::from_item(item, currency))
            .collect::<Result<Vec<_>, _>>()?;

        let subtotal = Money::try_sum(lines.iter().map(|l| &l.total), currency)
            .ok_or(CommerceError::Overflow)?;

        Ok(Self {
            subtotal,
            item_count: item_count(items),
            line_count: lines.len(),
            lines,
        })
    }

    /// Total engraving surcharges across the cart. `None` on overflow.
    pub fn surcharge_total(&self) -> Option<Money> {
        self.lines
            .iter()
            .try_fold(Money::zero(self.subtotal.currency), |acc, l| {
                match l.engraving_surcharge {
                    Some(surcharge) => acc.try_add(&surcharge.try_multiply(l.quantity)?),
                    None => Some(acc),
                }
            })
    }
}

/// Pricing breakdown for a single line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemPricing {
    /// Line item ID.
    pub line_item_id: LineItemId,
    /// Base unit price.
    pub unit_price: Money,
    /// Per-unit engraving surcharge, when enabled.
    pub engraving_surcharge: Option<Money>,
    /// Unit price plus surcharge.
    pub effective_unit_price: Money,
    /// Quantity.
    pub quantity: i64,
    /// `effective_unit_price * quantity`.
    pub total: Money,
}

impl LineItemPricing {
    fn from_item(item: &CartItem, currency: Currency) -> Result<Self, CommerceError> {
        let mismatch = |got: Currency| CommerceError::CurrencyMismatch {
            expected: currency.code().to_string(),
            got: got.code().to_string(),
        };

        if item.price.currency != currency {
            return Err(mismatch(item.price.currency));
        }
        let engraving_surcharge = item.engraving_surcharge();
        if let Some(surcharge) = engraving_surcharge {
            if surcharge.currency != currency {
                return Err(mismatch(surcharge.currency));
            }
        }

        let effective_unit_price = item.effective_unit_price().ok_or(CommerceError::Overflow)?;
        let total = item.line_total().ok_or(CommerceError::Overflow)?;

        Ok(Self {
            line_item_id: item.id.clone(),
            unit_price: item.price,
            engraving_surcharge,
            effective_unit_price,
            quantity: item.quantity,
            total,
        })
    }
}

/// Sum of quantities over all lines, saturating at `i64::MAX`.
pub fn item_count(items: &[CartItem]) -> i64 {
    items
        .iter()
        .fold(0i64, |acc, i| acc.saturating_add(i.quantity))
}

/// Sum of `(price + enabled engraving surcharge) * quantity` over all lines.
pub fn subtotal(items: &[CartItem], currency: Currency) -> Result<Money, CommerceError> {
    CartPricing::from_items(items, currency).map(|p| p.subtotal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Customization, NewCartItem};

    fn cop(amount: i64) -> Money {
        Money::new(amount, Currency::COP)
    }

    fn line(id: &str, price: i64, quantity: i64) -> CartItem {
        CartItem::from_new(
            LineItemId::new(id),
            NewCartItem::new(id, "Item", cop(price), quantity),
        )
    }

    #[test]
    fn test_subtotal_with_engraving() {
        let mut engraved = line("b", 5000, 1);
        engraved.customization = Some(Customization::engraving("ANA", cop(1000)));
        let items = vec![line("a", 10000, 2), engraved];

        assert_eq!(subtotal(&items, Currency::COP).unwrap(), cop(26000));
    }

    #[test]
    fn test_subtotal_ignores_disabled_engraving() {
        let mut item = line("a", 5000, 2);
        let mut customization = Customization::engraving("ANA", cop(1000));
        if let Some(e) = customization.laser_engraving.as_mut() {
            e.enabled = false;
        }
        item.customization = Some(customization);

        assert_eq!(subtotal(&[item], Currency::COP).unwrap(), cop(10000));
    }

    #[test]
    fn test_empty_cart_prices_to_zero() {
        let pricing = CartPricing::from_items(&[], Currency::COP).unwrap();
        assert_eq!(pricing.subtotal, cop(0));
        assert_eq!(pricing.item_count, 0);
        assert_eq!(pricing.line_count, 0);
    }

    #[test]
    fn test_item_count() {
        let items = vec![line("a", 100, 2), line("b", 100, 3)];
        assert_eq!(item_count(&items), 5);
    }

    #[test]
    fn test_item_count_saturates() {
        let items = vec![line("a", 1, i64::MAX), line("b", 1, 1)];
        assert_eq!(item_count(&items), i64::MAX);
    }

    #[test]
    fn test_breakdown_lines() {
        let mut engraved = line("b", 5000, 3);
        engraved.customization = Some(Customization::engraving("ANA", cop(1000)));
        let pricing =
            CartPricing::from_items(&[line("a", 10000, 2), engraved], Currency::COP).unwrap();

        assert_eq!(pricing.line_count, 2);
        assert_eq!(pricing.item_count, 5);
        assert_eq!(pricing.lines[1].effective_unit_price, cop(6000));
        assert_eq!(pricing.lines[1].total, cop(18000));
        assert_eq!(pricing.surcharge_total(), Some(cop(3000)));
    }

    #[test]
    fn test_currency_mismatch() {
        let mut item = line("a", 100, 1);
        item.price = Money::new(100, Currency::USD);

        assert!(matches!(
            CartPricing::from_items(&[item], Currency::COP),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_overflow() {
        let items = vec![line("a", i64::MAX, 1), line("b", 1, 1)];
        assert_eq!(subtotal(&items, Currency::COP), Err(CommerceError::Overflow));
    }
}
