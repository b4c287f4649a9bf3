//! Config subcommand implementations.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::output;
use crate::settings::{self, Settings};

use super::AppContext;

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print the saved settings and the store in use
    Show,

    /// Change saved settings
    Set(SetArgs),
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Default store directory
    #[arg(long = "default-store", value_name = "PATH")]
    pub default_store: Option<PathBuf>,

    /// Items per page for list and browse
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Quiet period before an interactive search term is applied
    #[arg(long)]
    pub search_debounce_ms: Option<u64>,

    /// Rows per page for search
    #[arg(long)]
    pub local_page_size: Option<usize>,

    /// Maximum documents per watch snapshot
    #[arg(long)]
    pub live_limit: Option<usize>,
}

pub async fn handle(ctx: &AppContext, cmd: ConfigCommand) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => {
            output::field("Store", &ctx.store.root().display().to_string());
            output::json_pretty(&ctx.settings)
        }
        ConfigSubcommand::Set(args) => {
            let mut updated = ctx.settings.clone();
            apply(&mut updated, args);

            let path = settings::save(&updated)?;
            output::success(&format!("Saved {}", path.display()));
            output::json_pretty(&updated)
        }
    }
}

fn apply(settings: &mut Settings, args: SetArgs) {
    if let Some(store) = args.default_store {
        settings.store = Some(store);
    }
    let controller = &mut settings.controller;
    if let Some(n) = args.page_size {
        controller.page_size = n.max(1);
    }
    if let Some(ms) = args.search_debounce_ms {
        controller.search_debounce_ms = ms;
    }
    if let Some(n) = args.local_page_size {
        controller.local_page_size = n.max(1);
    }
    if let Some(n) = args.live_limit {
        controller.live_limit = n.max(1);
    }
}
