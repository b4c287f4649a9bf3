//! Subcommand implementations.

pub mod browse;
pub mod categories;
pub mod config;
pub mod list;
pub mod profile;
pub mod search;
pub mod seed;
pub mod watch;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use shopfront_core::catalog::{Criteria, Document, FilterConfig};
use shopfront_core::types::{Direction, Sort};
use shopfront_file::{FileCatalog, FileStore};

use crate::cli::Commands;
use crate::settings::{self, Settings};

/// Settings and store shared by every command.
pub struct AppContext {
    pub settings: Settings,
    pub store: FileStore,
}

impl AppContext {
    pub fn load(store_flag: Option<PathBuf>) -> Result<Self> {
        let settings = settings::load().context("Failed to load settings")?;
        let root = settings.store_root(store_flag)?;
        tracing::debug!(store = %root.display(), "using store");

        Ok(Self {
            settings,
            store: FileStore::new(root),
        })
    }

    pub fn catalog<D: Document>(&self) -> FileCatalog<D> {
        FileCatalog::new(self.store.clone())
    }
}

/// Which collection a command works on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Products,
    Posts,
}

/// Filter and sort options shared by the listing commands.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Category to show ("all" for every category); post status for posts
    #[arg(long)]
    pub category: Option<String>,

    /// Minimum price (products only)
    #[arg(long)]
    pub min_price: Option<String>,

    /// Maximum price (products only)
    #[arg(long)]
    pub max_price: Option<String>,

    /// Field to sort by (e.g. price, name, createdAt)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending (with --sort; the default order is newest first)
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

impl FilterArgs {
    /// Parse the filter and sort into criteria for `D`.
    pub fn criteria<D: Document>(&self) -> Result<Criteria<D>> {
        let filter = FilterConfig::parse(
            self.category.as_deref(),
            self.min_price.as_deref(),
            self.max_price.as_deref(),
        )
        .context("Invalid filter")?;
        filter.check_for::<D>().context("Invalid filter")?;

        let sort = match &self.sort {
            Some(name) => {
                let field = D::parse_field(name).context("Invalid sort field")?;
                let direction = if self.desc {
                    Direction::Desc
                } else {
                    Direction::Asc
                };
                Sort::new(field, direction)
            }
            None => D::default_sort(),
        };

        Ok(Criteria::new(filter, sort))
    }
}

pub async fn handle(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Seed(args) => seed::run(ctx, args).await,
        Commands::List(args) => list::run(ctx, args).await,
        Commands::Browse(args) => browse::run(ctx, args).await,
        Commands::Search(args) => search::run(ctx, args).await,
        Commands::Watch(args) => watch::run(ctx, args).await,
        Commands::Categories(args) => categories::run(ctx, args).await,
        Commands::Profile(cmd) => profile::handle(ctx, cmd).await,
        Commands::Config(cmd) => config::handle(ctx, cmd).await,
    }
}
