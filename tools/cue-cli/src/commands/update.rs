//! Change a cart line's quantity.

use anyhow::{Context as _, Result};
use cue_commerce::LineItemId;
use serde_json::json;

use super::UpdateArgs;
use crate::context::Context;

/// Run the update command.
pub fn run(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let id = LineItemId::new(args.line_id);

    let changed = store
        .update_quantity(&id, args.quantity)
        .with_context(|| format!("Failed to update line {}", id))?;
    let line = store.get_item(&id);

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "line_id": id,
            "changed": changed,
            "line": line,
            "item_count": store.item_count(),
            "subtotal": store.subtotal()?,
        }));
        return Ok(());
    }

    match (changed, line) {
        (false, _) => ctx.output.info(&format!("No line {} in the cart", id)),
        (true, Some(line)) => ctx
            .output
            .success(&format!("{} now x{}", line.name, line.quantity)),
        (true, None) => ctx.output.success(&format!("Removed line {}", id)),
    }
    ctx.output.kv("Subtotal", &store.subtotal()?.display());
    Ok(())
}
