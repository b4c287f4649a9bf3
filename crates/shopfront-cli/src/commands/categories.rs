//! Categories command implementation.

use anyhow::{Context, Result};
use clap::Args;

use shopfront_core::catalog::Product;

use super::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct CategoriesArgs {
    /// Print as a JSON array
    #[arg(long)]
    pub json: bool,
}

pub async fn run(ctx: &AppContext, args: CategoriesArgs) -> Result<()> {
    let categories = ctx
        .catalog::<Product>()
        .categories()
        .context("Failed to read categories")?;

    if args.json {
        return output::json(&categories);
    }

    if categories.is_empty() {
        output::no_results("categories");
        return Ok(());
    }

    for category in &categories {
        println!("{}", category);
    }

    Ok(())
}
