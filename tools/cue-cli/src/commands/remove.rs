//! Remove a cart line.

use anyhow::Result;
use cue_commerce::LineItemId;
use serde_json::json;

use super::RemoveArgs;
use crate::context::Context;

/// Run the remove command.
pub fn run(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let id = LineItemId::new(args.line_id);

    let removed = store.remove_item(&id);

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "line_id": id,
            "removed": removed,
            "item_count": store.item_count(),
        }));
        return Ok(());
    }

    if removed {
        ctx.output.success(&format!("Removed line {}", id));
    } else {
        ctx.output.info(&format!("No line {} in the cart", id));
    }
    ctx.output.kv("Items", &store.item_count().to_string());
    Ok(())
}
