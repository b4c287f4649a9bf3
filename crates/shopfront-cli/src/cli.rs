//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{browse, categories, config, list, profile, search, seed, watch};

/// Browse, search and watch a local shopfront catalog.
#[derive(Parser, Debug)]
#[command(name = "shopfront")]
#[command(author, version = env!("SHOPFRONT_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Store directory (overrides the saved setting)
    #[arg(long, global = true, env = "SHOPFRONT_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the sample products and posts into the store
    Seed(seed::SeedArgs),

    /// Fetch one page of products or posts
    List(list::ListArgs),

    /// Page through a listing with the list controller
    Browse(browse::BrowseArgs),

    /// Search, filter and sort a listing locally
    Search(search::SearchArgs),

    /// Print live snapshots of a listing as the store changes
    Watch(watch::WatchArgs),

    /// List the distinct product categories
    Categories(categories::CategoriesArgs),

    /// Show or update your profile
    Profile(profile::ProfileCommand),

    /// Show or change saved settings
    Config(config::ConfigCommand),
}
