//! Browse command implementation.

use anyhow::{Result, bail};
use clap::Args;

use shopfront_core::catalog::{Document, PageQuery, Post, Product};
use shopfront_core::controller::{Controller, Status};

use super::{AppContext, FilterArgs, Kind};
use crate::output;

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// What to browse
    #[arg(value_enum)]
    pub kind: Kind,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Search term matched against the two search fields
    #[arg(long)]
    pub search: Option<String>,

    /// Number of pages to load, including the first
    #[arg(long, default_value_t = 1)]
    pub pages: usize,

    /// Page size (defaults to the saved page size)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(ctx: &AppContext, args: BrowseArgs) -> Result<()> {
    match args.kind {
        Kind::Products => browse::<Product>(ctx, &args).await,
        Kind::Posts => browse::<Post>(ctx, &args).await,
    }
}

async fn browse<D: Document>(ctx: &AppContext, args: &BrowseArgs) -> Result<()> {
    let mut criteria = args.filter.criteria::<D>()?;
    if let Some(term) = &args.search {
        criteria.set_search(term);
    }

    let page_size = args
        .page_size
        .unwrap_or(ctx.settings.controller.page_size)
        .max(1);
    output::note(&PageQuery::first(criteria.clone(), page_size).describe());

    let controller = Controller::new(ctx.catalog::<D>(), criteria, page_size);

    output::page_outcome(1, controller.refresh().await);
    for page in 2..=args.pages {
        match controller.load_more().await {
            Some(outcome) => output::page_outcome(page, outcome),
            None => break,
        }
    }

    let snapshot = controller.snapshot().await;
    output::items(&snapshot.items, args.pretty)?;

    output::note(&format!(
        "Loaded {} {}, {}",
        snapshot.items.len(),
        D::COLLECTION,
        if snapshot.has_more {
            "more available"
        } else {
            "end of list"
        }
    ));

    if snapshot.status == Status::Error {
        let message = snapshot.error.unwrap_or_default();
        output::error(&message);
        bail!("Failed to load {}", D::COLLECTION);
    }

    Ok(())
}
