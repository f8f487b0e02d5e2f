//! Show the cart.

use anyhow::Result;
use cue_commerce::cart::{CartItem, CartPricing};
use serde_json::json;

use super::ShowArgs;
use crate::context::Context;
use crate::output::truncate;

const WIDTHS: [usize; 5] = [24, 28, 5, 14, 14];

/// Run the show command.
pub fn run(args: ShowArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let items = store.items();
    let pricing = CartPricing::from_items(&items, store.currency())?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "store": store.config().store_name,
            "items": items,
            "pricing": pricing,
        }));
        return Ok(());
    }

    ctx.output.header(&format!("Cart ({})", store.config().store_name));

    if items.is_empty() {
        ctx.output.info("Cart is empty.");
        ctx.output.info("Run `cue add` to add a product.");
        return Ok(());
    }

    ctx.output
        .table_row(&["LINE", "PRODUCT", "QTY", "UNIT", "TOTAL"], &WIDTHS);
    for (item, row) in items.iter().zip(table_rows(&items, &pricing)) {
        let cols: Vec<&str> = row.iter().map(String::as_str).collect();
        ctx.output.table_row(&cols, &WIDTHS);
        if args.details {
            for detail in describe(item) {
                ctx.output.list_item(&detail);
            }
        }
    }

    println!();
    ctx.output.kv("Items", &pricing.item_count.to_string());
    ctx.output.kv("Lines", &pricing.line_count.to_string());
    if let Some(surcharges) = pricing.surcharge_total().filter(|m| !m.is_zero()) {
        ctx.output.kv("Engraving", &surcharges.display());
    }
    ctx.output.kv("Subtotal", &pricing.subtotal.display());

    Ok(())
}

/// One table row per line, all taken from the same snapshot.
fn table_rows(items: &[CartItem], pricing: &CartPricing) -> Vec<[String; 5]> {
    items
        .iter()
        .zip(&pricing.lines)
        .map(|(item, line)| {
            [
                item.id.to_string(),
                truncate(&item.name, WIDTHS[1]),
                line.quantity.to_string(),
                line.effective_unit_price.display(),
                line.total.display(),
            ]
        })
        .collect()
}

/// Human-readable lines describing a cart line's options.
fn describe(item: &CartItem) -> Vec<String> {
    let mut details = Vec::new();

    if !item.sku.is_empty() {
        details.push(format!("SKU {}", item.sku));
    }
    if let Some(variation_id) = &item.variation_id {
        let attributes = item
            .variation
            .iter()
            .flatten()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join(", ");
        if attributes.is_empty() {
            details.push(format!("Variation {}", variation_id));
        } else {
            details.push(format!("Variation {} ({})", variation_id, attributes));
        }
    }
    if let Some(customization) = &item.customization {
        if let Some(engraving) = &customization.laser_engraving {
            let state = if engraving.enabled { "" } else { " [disabled]" };
            details.push(format!(
                "Engraving {:?} +{}{}",
                engraving.text,
                engraving.price.display(),
                state
            ));
        }
        if let Some(cloth) = &customization.cloth_change {
            details.push(format!(
                "Cloth change {} {} (color {}, {})",
                cloth.dimensions, cloth.color, cloth.color_id, cloth.area
            ));
        }
    }

    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use cue_commerce::cart::{Customization, PersistedCart};
    use cue_commerce::{Currency, LineItemId, Money};

    fn line(json: serde_json::Value) -> CartItem {
        let cart: PersistedCart = serde_json::from_value(json!({ "items": [json] })).unwrap();
        cart.items.into_iter().next().unwrap()
    }

    #[test]
    fn test_table_rows_match_snapshot() {
        let items = vec![
            line(json!({
                "id": "l1",
                "productId": "1",
                "name": "Mesa",
                "price": { "amount_cents": 10000, "currency": "COP" },
                "quantity": 2,
            })),
            line(json!({
                "id": "l2",
                "productId": "2",
                "name": "Tiza",
                "price": { "amount_cents": 3000, "currency": "COP" },
                "quantity": 1,
            })),
        ];
        let pricing = CartPricing::from_items(&items, Currency::COP).unwrap();

        let rows = table_rows(&items, &pricing);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ["l1", "Mesa", "2", "$10000", "$20000"].map(String::from));
        assert_eq!(rows[1][0], "l2");
        assert_eq!(rows[1][4], "$3000");
    }

    #[test]
    fn test_describe_plain_line() {
        let item = line(json!({
            "id": "l1",
            "productId": "1",
            "name": "Tiza",
            "price": { "amount_cents": 3000, "currency": "COP" },
            "quantity": 1,
        }));
        assert!(describe(&item).is_empty());
    }

    #[test]
    fn test_describe_customized_line() {
        let mut item = line(json!({
            "id": "l1",
            "productId": "1",
            "name": "Taco X",
            "price": { "amount_cents": 50000, "currency": "COP" },
            "quantity": 1,
            "sku": "T1",
            "variationId": "v2",
            "variation": { "Peso": "19oz" },
        }));
        item.customization = Some(Customization::engraving(
            "ANA",
            Money::new(1000, Currency::COP),
        ));

        let details = describe(&item);
        assert_eq!(details[0], "SKU T1");
        assert_eq!(details[1], "Variation v2 (Peso: 19oz)");
        assert_eq!(details[2], "Engraving \"ANA\" +$1000");
        assert_eq!(item.id, LineItemId::new("l1"));
    }
}
