//! Cue CLI - Command line tool for inspecting and editing the persisted cart.
//!
//! Commands:
//! - `cue show` - List cart lines, item count and subtotal
//! - `cue add` - Add a product to the cart
//! - `cue remove` - Remove a cart line
//! - `cue update` - Change a line's quantity
//! - `cue clear` - Empty the cart

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{AddArgs, ClearArgs, RemoveArgs, ShowArgs, UpdateArgs};

/// Cue CLI - Inspect and edit the storefront cart
#[derive(Parser)]
#[command(name = "cue")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true, env = "CUE_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show(ShowArgs),

    /// Add a product to the cart
    Add(AddArgs),

    /// Remove a line from the cart
    Remove(RemoveArgs),

    /// Set the quantity of a line
    Update(UpdateArgs),

    /// Remove every line from the cart
    Clear(ClearArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    logging::init(&ctx.config.logging, cli.verbose)?;

    // Execute command
    let result = match cli.command {
        Commands::Show(args) => commands::show::run(args, &ctx),
        Commands::Add(args) => commands::add::run(args, &ctx),
        Commands::Remove(args) => commands::remove::run(args, &ctx),
        Commands::Update(args) => commands::update::run(args, &ctx),
        Commands::Clear(args) => commands::clear::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
