use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::parse_month_arg;
use crate::db::get_connection;
use crate::error::Result;
use crate::finances::{get_account_breakdown, get_household_finances, get_spending_by_category};
use crate::fmt::money;
use crate::overrides::OverrideEngine;
use crate::settings::{db_path, load_settings};

pub fn run(month: Option<String>) -> Result<()> {
    let (year, m) = parse_month_arg(&month)?;
    let conn = get_connection(&db_path())?;
    let engine = OverrideEngine::new(load_settings().cashback_threshold);

    let finances = get_household_finances(&conn, &engine, year, m)?;

    println!(
        "Household summary for {year:04}-{m:02} ({} transactions)",
        finances.transactions.len()
    );
    println!("  Spending: {}", money(finances.spending).red());
    println!("  Income:   {}", money(finances.income).green());
    let net = money(finances.net);
    println!(
        "  Net:      {}",
        if finances.net >= 0.0 { net.green() } else { net.red() }
    );

    let breakdown = &finances.breakdown;
    if !breakdown.auto_excluded.is_empty() || !breakdown.manual_overrides.is_empty() {
        println!("\nWhy these numbers:");
        for (reason, entry) in &breakdown.auto_excluded {
            println!(
                "  {} excluded: {} totaling {}",
                reason.label(),
                entry.count,
                money(entry.total)
            );
        }
        for (override_type, entry) in &breakdown.manual_overrides {
            println!(
                "  Manually {}d: {} totaling {}",
                override_type.as_str(),
                entry.count,
                money(entry.total)
            );
        }
    }

    let categories = get_spending_by_category(&conn, &engine, year, m)?;
    if categories.is_empty() {
        println!("\nNo budget spending recorded this month.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Spent", "Count"]);
    for row in &categories {
        table.add_row(vec![
            Cell::new(&row.category),
            Cell::new(money(row.total_spent)),
            Cell::new(row.transaction_count),
        ]);
    }
    println!("\nSpending by category\n{table}");

    let accounts = get_account_breakdown(&conn, &engine, year, m)?;
    if accounts.len() > 1 {
        let mut table = Table::new();
        table.set_header(vec!["Account", "Spending", "Income", "Net"]);
        for row in &accounts {
            table.add_row(vec![
                Cell::new(&row.account),
                Cell::new(money(row.spending)),
                Cell::new(money(row.income)),
                Cell::new(money(row.net)),
            ]);
        }
        println!("\nBy account\n{table}");
    }
    Ok(())
}
