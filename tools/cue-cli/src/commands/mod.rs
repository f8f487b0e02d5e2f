//! CLI command implementations.

pub mod add;
pub mod clear;
pub mod remove;
pub mod show;
pub mod update;

use clap::Args;

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Also print the customization of each line.
    #[arg(short, long)]
    pub details: bool,
}

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Catalog product ID.
    #[arg(long)]
    pub product_id: String,

    /// Product name.
    #[arg(long)]
    pub name: String,

    /// Unit price as served by the catalog (e.g. "50000").
    #[arg(long)]
    pub price: String,

    /// Stock keeping unit.
    #[arg(long, default_value = "")]
    pub sku: String,

    /// Primary image URL.
    #[arg(long)]
    pub image: Option<String>,

    /// Quantity to add.
    #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
    pub quantity: i64,

    /// Variation ID, for variable products.
    #[arg(long)]
    pub variation_id: Option<String>,

    /// Variation attribute as NAME=VALUE (repeatable).
    #[arg(long = "attribute", requires = "variation_id")]
    pub attributes: Vec<String>,

    /// Text to laser-engrave.
    #[arg(long, requires = "engraving_price")]
    pub engraving: Option<String>,

    /// Per-unit engraving surcharge.
    #[arg(long, requires = "engraving")]
    pub engraving_price: Option<String>,

    /// Cloth change: table dimensions.
    #[arg(long, requires_all = ["cloth_color", "cloth_color_id", "cloth_area"])]
    pub cloth_dimensions: Option<String>,

    /// Cloth change: color name.
    #[arg(long, requires = "cloth_dimensions")]
    pub cloth_color: Option<String>,

    /// Cloth change: color ID.
    #[arg(long, requires = "cloth_dimensions")]
    pub cloth_color_id: Option<String>,

    /// Cloth change: area to re-cloth.
    #[arg(long, requires = "cloth_dimensions")]
    pub cloth_area: Option<String>,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Line ID.
    pub line_id: String,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Line ID.
    pub line_id: String,

    /// New quantity; zero or less removes the line.
    #[arg(allow_negative_numbers = true)]
    pub quantity: i64,
}

/// Arguments for the clear command.
#[derive(Args)]
pub struct ClearArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}
