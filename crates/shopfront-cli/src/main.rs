//! shopfront - CLI for browsing a shopfront catalog store.
//!
//! A thin wrapper over `shopfront-core` and `shopfront-file`, for seeding a
//! local store and exercising the list controllers against it.

mod cli;
mod commands;
mod output;
mod settings;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::Cli;
use commands::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let ctx = AppContext::load(cli.store)?;
    commands::handle(&ctx, cli.command).await
}

/// Crates whose events `-v` turns up. Everything else stays at `warn`.
const LOG_TARGETS: [&str; 3] = ["shopfront", "shopfront_core", "shopfront_file"];

fn init_logging(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        LOG_TARGETS
            .iter()
            .fold(EnvFilter::new("warn"), |filter, target| {
                match format!("{}={}", target, level).parse::<Directive>() {
                    Ok(directive) => filter.add_directive(directive),
                    Err(_) => filter,
                }
            })
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
