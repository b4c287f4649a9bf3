//! Seed command implementation.

use anyhow::{Context, Result};
use clap::Args;

use super::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct SeedArgs {}

pub async fn run(ctx: &AppContext, _args: SeedArgs) -> Result<()> {
    let summary = shopfront_file::seed(&ctx.store).context("Failed to seed store")?;

    output::success("Seeded store");
    output::field("Store", &ctx.store.root().display().to_string());
    output::field("Products", &summary.products.to_string());
    output::field("Posts", &summary.posts.to_string());

    Ok(())
}
