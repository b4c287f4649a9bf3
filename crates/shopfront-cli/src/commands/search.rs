//! Search command implementation.

use std::pin::pin;

use anyhow::{Context, Result};
use clap::Args;
use futures_util::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use shopfront_core::catalog::{Document, Post, Product};
use shopfront_core::debounce::debounced;
use shopfront_core::view::LocalView;

use super::{AppContext, FilterArgs, Kind};
use crate::output;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// What to search
    #[arg(value_enum, default_value = "products")]
    pub kind: Kind,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Search term
    #[arg(long)]
    pub query: Option<String>,

    /// Page to show (1-based; clamped to the last page)
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (defaults to the saved local page size)
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Read search terms from stdin, one per line, and re-run the search
    /// whenever input pauses
    #[arg(long)]
    pub interactive: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(ctx: &AppContext, args: SearchArgs) -> Result<()> {
    match args.kind {
        Kind::Products => search::<Product>(ctx, &args).await,
        Kind::Posts => search::<Post>(ctx, &args).await,
    }
}

async fn search<D: Document>(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let criteria = args.filter.criteria::<D>()?;
    let items = ctx
        .catalog::<D>()
        .documents()
        .context("Failed to read documents")?;
    let per_page = args
        .per_page
        .unwrap_or(ctx.settings.controller.local_page_size);

    let mut view = LocalView::with_criteria(items, criteria, per_page);
    if let Some(term) = &args.query {
        view.set_search(term);
    }
    view.set_page(args.page);

    if !args.interactive {
        return render(&view, args.pretty);
    }

    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });

    let mut terms = pin!(debounced(rx, ctx.settings.controller.search_debounce()));
    while let Some(term) = terms.next().await {
        view.set_search(&term);
        render(&view, args.pretty)?;
    }

    Ok(())
}

fn render<D: Document>(view: &LocalView<D>, pretty: bool) -> Result<()> {
    let rows = view.page_rows();
    output::note(&format!(
        "page {} of {} ({} matching)",
        view.current_page(),
        view.page_count(),
        view.rows().len()
    ));
    output::items(&rows, pretty)
}
