//! Watch command implementation.

use anyhow::Result;
use clap::Args;

use shopfront_core::catalog::{Document, LiveQuery, Post, Product};
use shopfront_core::live::{LiveFeed, LiveUpdate};

use super::{AppContext, FilterArgs, Kind};
use crate::output;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// What to watch
    #[arg(value_enum)]
    pub kind: Kind,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Maximum documents per snapshot (defaults to the saved live limit)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Stop after this many snapshots
    #[arg(long)]
    pub count: Option<u64>,
}

pub async fn run(ctx: &AppContext, args: WatchArgs) -> Result<()> {
    match args.kind {
        Kind::Products => watch::<Product>(ctx, &args).await,
        Kind::Posts => watch::<Post>(ctx, &args).await,
    }
}

async fn watch<D: Document>(ctx: &AppContext, args: &WatchArgs) -> Result<()> {
    let criteria = args.filter.criteria::<D>()?;
    let limit = args.limit.unwrap_or(ctx.settings.controller.live_limit);
    let query = LiveQuery::new(criteria, limit);

    output::note(&query.describe());
    if args.count.is_none() {
        output::note("Press Ctrl+C to stop.");
    }

    let mut feed = LiveFeed::subscribe(&ctx.catalog::<D>(), &query);
    if let Some(message) = feed.list().error() {
        output::error(message);
    }

    loop {
        if args.count.is_some_and(|n| feed.list().snapshots() >= n) {
            break;
        }

        tokio::select! {
            update = feed.next() => match update {
                Some(LiveUpdate::Failed) => {
                    output::error(feed.list().error().unwrap_or("subscription failed"));
                }
                Some(_) => {
                    let list = feed.list();
                    output::snapshot_header(list.snapshots(), list.items().len(), D::COLLECTION);
                    output::items(list.items(), false)?;
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    feed.close();
    Ok(())
}
