//! Empty the cart.

use anyhow::Result;
use dialoguer::Confirm;
use serde_json::json;

use super::ClearArgs;
use crate::context::Context;

/// Run the clear command.
pub fn run(args: ClearArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let lines = store.line_count();

    if lines > 0 && !args.yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove {} line(s) from the cart?", lines))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Clear cancelled");
            return Ok(());
        }
    }

    store.clear_cart();

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "cleared": lines }));
        return Ok(());
    }

    ctx.output.success(&format!("Cleared {} line(s)", lines));
    Ok(())
}
