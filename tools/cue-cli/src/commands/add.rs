//! Add a product to the cart.

use anyhow::{bail, Context as _, Result};
use cue_commerce::cart::{
    AddToCartOptions, CartFacade, ClothChange, Customization, LaserEngraving, RecordingNotifier,
    VariationAttributes,
};
use cue_commerce::catalog::Product;
use cue_commerce::{Currency, Money};
use serde_json::json;

use super::AddArgs;
use crate::context::Context;

/// Run the add command.
pub fn run(args: AddArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let currency = store.currency();

    let mut product = Product::new(
        args.product_id.as_str(),
        args.name.as_str(),
        args.price.as_str(),
    )
    .with_sku(args.sku.as_str());
    if let Some(image) = &args.image {
        product = product.with_image(image.as_str());
    }

    let options = build_options(&args, currency)?;

    let notifier = RecordingNotifier::new();
    let facade = CartFacade::new(&store, &notifier);
    let line_id = facade
        .add_to_cart(&product, options)
        .with_context(|| format!("Failed to add {} to cart", product.name))?;

    let line = store.get_item(&line_id);
    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "line_id": line_id,
            "line": line,
            "item_count": store.item_count(),
            "subtotal": store.subtotal()?,
        }));
        return Ok(());
    }

    for notification in notifier.drain() {
        ctx.output.notification(&notification);
    }
    ctx.output.kv("Line", line_id.as_str());
    if let Some(line) = line {
        ctx.output.kv("Quantity", &line.quantity.to_string());
    }
    ctx.output.kv("Subtotal", &store.subtotal()?.display());

    Ok(())
}

fn build_options(args: &AddArgs, currency: Currency) -> Result<AddToCartOptions> {
    let mut options = AddToCartOptions::new().with_quantity(args.quantity);

    if let Some(variation_id) = &args.variation_id {
        let attributes = parse_attributes(&args.attributes)?;
        options = options.with_variation(variation_id.as_str(), attributes);
    }

    let laser_engraving = match (&args.engraving, &args.engraving_price) {
        (Some(text), Some(price)) => Some(LaserEngraving {
            enabled: true,
            text: text.clone(),
            price: Money::parse(price, currency)
                .with_context(|| format!("Invalid engraving price: {}", price))?,
        }),
        _ => None,
    };

    let cloth_change = match (
        &args.cloth_dimensions,
        &args.cloth_color,
        &args.cloth_color_id,
        &args.cloth_area,
    ) {
        (Some(dimensions), Some(color), Some(color_id), Some(area)) => Some(ClothChange {
            dimensions: dimensions.clone(),
            color: color.clone(),
            color_id: color_id.clone(),
            area: area.clone(),
        }),
        _ => None,
    };

    if laser_engraving.is_some() || cloth_change.is_some() {
        options = options.with_customization(Customization {
            laser_engraving,
            cloth_change,
        });
    }

    Ok(options)
}

fn parse_attributes(raw: &[String]) -> Result<VariationAttributes> {
    let mut attributes = VariationAttributes::new();
    for pair in raw {
        let Some((name, value)) = pair.split_once('=') else {
            bail!("Invalid attribute {:?}, expected NAME=VALUE", pair);
        };
        attributes.insert(name.trim().to_string(), value.trim().to_string());
    }
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> AddArgs {
        AddArgs {
            product_id: "7".to_string(),
            name: "Mesa Pool".to_string(),
            price: "4500000".to_string(),
            sku: "MP9".to_string(),
            image: None,
            quantity: 1,
            variation_id: None,
            attributes: Vec::new(),
            engraving: None,
            engraving_price: None,
            cloth_dimensions: None,
            cloth_color: None,
            cloth_color_id: None,
            cloth_area: None,
        }
    }

    #[test]
    fn test_parse_attributes() {
        let attrs =
            parse_attributes(&["Tamaño=9 pies".to_string(), "Color = Verde".to_string()]).unwrap();
        assert_eq!(attrs["Tamaño"], "9 pies");
        assert_eq!(attrs["Color"], "Verde");

        assert!(parse_attributes(&["sin-igual".to_string()]).is_err());
    }

    #[test]
    fn test_plain_add_has_no_customization() {
        let options = build_options(&args(), Currency::COP).unwrap();
        assert_eq!(options.quantity, 1);
        assert!(options.customization.is_none());
        assert!(options.variation_id.is_none());
    }

    #[test]
    fn test_engraving_and_cloth_combine() {
        let mut args = args();
        args.engraving = Some("ANA".to_string());
        args.engraving_price = Some("80000".to_string());
        args.cloth_dimensions = Some("9ft".to_string());
        args.cloth_color = Some("Azul".to_string());
        args.cloth_color_id = Some("7".to_string());
        args.cloth_area = Some("table".to_string());

        let customization = build_options(&args, Currency::COP)
            .unwrap()
            .customization
            .unwrap();
        assert_eq!(
            customization.engraving_surcharge(),
            Some(Money::new(80000, Currency::COP))
        );
        assert_eq!(customization.cloth_change.unwrap().color, "Azul");
    }

    #[test]
    fn test_bad_engraving_price() {
        let mut args = args();
        args.engraving = Some("ANA".to_string());
        args.engraving_price = Some("gratis".to_string());
        assert!(build_options(&args, Currency::COP).is_err());
    }
}
