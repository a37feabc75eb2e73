pub mod accounts;
pub mod categories;
pub mod edit;
pub mod import;
pub mod init;
pub mod month;
pub mod overrides;
pub mod review;
pub mod trends;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::error::{HearthError, Result};

/// Resolve a possibly-shortened transaction id to the full stored id.
pub(crate) fn resolve_transaction_id(conn: &Connection, prefix: &str) -> Result<String> {
    let mut stmt = conn.prepare("SELECT id FROM transactions WHERE id LIKE ?1 LIMIT 2")?;
    let matches: Vec<String> = stmt
        .query_map([format!("{prefix}%")], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    match matches.len() {
        1 => Ok(matches.into_iter().next().unwrap()),
        0 => Err(HearthError::Other(format!("No transaction matches id '{prefix}'"))),
        _ => Err(HearthError::Other(format!("Transaction id '{prefix}' is ambiguous"))),
    }
}

/// Parse a `YYYY-MM` argument, defaulting to the current month.
pub(crate) fn parse_month_arg(month: &Option<String>) -> Result<(i32, u32)> {
    if let Some(m) = month {
        let parts: Vec<&str> = m.split('-').collect();
        if parts.len() == 2 {
            if let (Ok(year), Ok(month)) = (parts[0].parse::<i32>(), parts[1].parse::<u32>()) {
                if (1..=12).contains(&month) {
                    return Ok((year, month));
                }
            }
        }
        return Err(HearthError::Other(format!("Invalid month '{m}' (expected YYYY-MM)")));
    }
    let today = chrono::Local::now().date_naive();
    Ok((today.year(), today.month()))
}

#[derive(Parser)]
#[command(name = "hearth", about = "Household spending ledger and budget review CLI.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up hearth: choose a data directory and initialize the ledger.
    Init {
        /// Path for hearth data (default: ~/Documents/hearth)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import a CSV export into the ledger.
    Import {
        /// Path to the CSV file
        file: String,
        /// Account label (default: derived from the filename)
        #[arg(long)]
        account: Option<String>,
    },
    /// Household summary for one month, with the calculation breakdown.
    Month {
        /// Month: YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Show override candidates and pending income for review.
    Review {
        /// Month: YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Manually include or exclude transactions.
    Override {
        #[command(subcommand)]
        command: OverrideCommands,
    },
    /// Edit a transaction's category, notes, or legacy exclude flag.
    Edit {
        /// Transaction id (a unique prefix is enough)
        id: String,
        /// New category name
        #[arg(long)]
        category: Option<String>,
        /// Free-text note
        #[arg(long)]
        note: Option<String>,
        /// Set the legacy exclude-from-budget flag
        #[arg(long, conflicts_with = "include")]
        exclude: bool,
        /// Clear the legacy exclude-from-budget flag
        #[arg(long)]
        include: bool,
    },
    /// List the category catalog.
    Categories,
    /// List account labels seen in the ledger.
    Accounts,
    /// Monthly spending/income trends and top category breakdown.
    Trends {
        /// Trailing window in months
        #[arg(long, default_value = "12")]
        months: u32,
        /// How many top categories to chart
        #[arg(long, default_value = "5")]
        top: usize,
    },
}

#[derive(Subcommand)]
pub enum OverrideCommands {
    /// Apply a manual include/exclude override to a transaction.
    Apply {
        /// Transaction id (a unique prefix is enough)
        id: String,
        /// Override type: include or exclude
        #[arg(long = "type")]
        override_type: String,
        /// Why the override exists; shown in the review list
        #[arg(long, default_value = "")]
        reason: String,
        /// Which total the override applies to: spending or income
        #[arg(long, default_value = "spending")]
        category: String,
    },
    /// Remove a manual override, reverting to the automatic signal.
    Remove {
        /// Transaction id (a unique prefix is enough)
        id: String,
    },
}
