//! Terminal output.
//!
//! Documents and other data go to stdout, one JSON value per line unless
//! pretty printing is asked for. Progress, cursors and summaries go to
//! stderr so stdout can be piped.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use shopfront_core::controller::Outcome;
use shopfront_core::types::Cursor;

pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// `label: value` on stdout.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// A dimmed status line on stderr.
pub fn note(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

pub fn json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Documents, one per line, or pretty printed one after another.
pub fn items<T: Serialize>(items: &[T], pretty: bool) -> Result<()> {
    for item in items {
        if pretty {
            json_pretty(item)?;
        } else {
            json(item)?;
        }
    }
    Ok(())
}

pub fn no_results(collection: &str) {
    note(&format!("No {} found.", collection));
}

/// The cursor to pass back with `--cursor` for the following page.
pub fn next_cursor(cursor: &Cursor) {
    eprintln!();
    eprintln!("{}: {}", "Next cursor".dimmed(), cursor);
}

/// One line per page a browse loaded.
pub fn page_outcome(page: usize, outcome: Outcome) {
    let label = format!("page {}:", page).dimmed();
    match outcome {
        Outcome::Applied { added } => eprintln!("{} {} new", label, added),
        Outcome::Failed => eprintln!("{} {}", label, "failed".red()),
        Outcome::Stale => eprintln!("{} {}", label, "stale".yellow()),
    }
}

/// Heading printed before each live snapshot.
pub fn snapshot_header(number: u64, count: usize, collection: &str) {
    println!(
        "{} {} {}",
        "SNAPSHOT".green(),
        number,
        format!("({} {})", count, collection).dimmed()
    );
}
