use comfy_table::{Cell, Table};

use crate::cli::parse_month_arg;
use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::{money, signed_money};
use crate::models::Transaction;
use crate::overrides::OverrideEngine;
use crate::settings::{db_path, load_settings};

fn short_id(id: &str) -> &str {
    &id[..id.len().min(12)]
}

fn candidate_table(rows: &[Transaction]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Id", "Date", "Description", "Amount", "Account"]);
    for txn in rows {
        table.add_row(vec![
            Cell::new(short_id(&txn.id)),
            Cell::new(&txn.date),
            Cell::new(&txn.description),
            Cell::new(signed_money(txn.amount)),
            Cell::new(&txn.account),
        ]);
    }
    table
}

pub fn run(month: Option<String>) -> Result<()> {
    let (year, m) = parse_month_arg(&month)?;
    let conn = get_connection(&db_path())?;
    let engine = OverrideEngine::new(load_settings().cashback_threshold);

    let candidates = engine.override_candidates(&conn, year, m)?;
    let pending = engine.pending_income(&conn, year, m)?;

    if !candidates.auto_excluded.is_empty() {
        let total: f64 = candidates.auto_excluded.iter().map(|t| t.amount.abs()).sum();
        println!(
            "Auto-excluded ({} totaling {}); `hearth override apply <id> --type include` to count one:",
            candidates.auto_excluded.len(),
            money(total)
        );
        println!("{}", candidate_table(&candidates.auto_excluded));
    }

    if !candidates.auto_included.is_empty() {
        println!(
            "\nIn the budget ({}); `hearth override apply <id> --type exclude` to drop one:",
            candidates.auto_included.len()
        );
        println!("{}", candidate_table(&candidates.auto_included));
    }

    if !pending.is_empty() {
        println!(
            "\nPending income ({}): positive but not counted; \
             `--type include --category income` to count one:",
            pending.len()
        );
        println!("{}", candidate_table(&pending));
    }

    if candidates.auto_excluded.is_empty() && candidates.auto_included.is_empty() && pending.is_empty() {
        println!("Nothing to review for {year:04}-{m:02}.");
    }
    Ok(())
}
