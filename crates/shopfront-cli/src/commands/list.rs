//! List command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use shopfront_core::catalog::{Document, PageQuery, Post, Product};
use shopfront_core::traits::DataSource;
use shopfront_core::types::Cursor;

use super::{AppContext, FilterArgs, Kind};
use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// What to list
    #[arg(value_enum)]
    pub kind: Kind,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Page size (defaults to the saved page size)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Cursor printed by a previous page
    #[arg(long)]
    pub cursor: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Print schema.org structured data instead of documents (products only)
    #[arg(long)]
    pub schema: bool,
}

pub async fn run(ctx: &AppContext, args: ListArgs) -> Result<()> {
    match args.kind {
        Kind::Products if args.schema => list_page(ctx, &args, schema_items).await,
        Kind::Products => list_page::<Product>(ctx, &args, output::items).await,
        Kind::Posts if args.schema => bail!("--schema is only available for products"),
        Kind::Posts => list_page::<Post>(ctx, &args, output::items).await,
    }
}

async fn list_page<D: Document>(
    ctx: &AppContext,
    args: &ListArgs,
    render: impl Fn(&[D], bool) -> Result<()>,
) -> Result<()> {
    let criteria = args.filter.criteria::<D>()?;
    let limit = args.limit.unwrap_or(ctx.settings.controller.page_size).max(1);

    let query = match &args.cursor {
        Some(token) => PageQuery::after(criteria, Cursor::from_token(token.as_str()), limit),
        None => PageQuery::first(criteria, limit),
    };
    output::note(&query.describe());

    let page = ctx
        .catalog::<D>()
        .fetch_page(&query)
        .await
        .context("Failed to fetch page")?;

    if page.items.is_empty() {
        output::no_results(D::COLLECTION);
        return Ok(());
    }

    render(&page.items, args.pretty)?;

    if page.has_more(limit)
        && let Some(cursor) = &page.next
    {
        output::next_cursor(cursor);
    }

    Ok(())
}

fn schema_items(products: &[Product], pretty: bool) -> Result<()> {
    let schemas: Vec<_> = products.iter().map(Product::schema_org).collect();
    output::items(&schemas, pretty)
}
