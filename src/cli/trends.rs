use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::{money, percent};
use crate::overrides::OverrideEngine;
use crate::settings::{db_path, load_settings};
use crate::trends::{monthly_trends, top_category_trends, trend_metrics};

pub fn run(months: u32, top: usize) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let engine = OverrideEngine::new(load_settings().cashback_threshold);

    let monthly = monthly_trends(&conn, &engine, months)?;
    if monthly.is_empty() {
        println!("No transactions in the last {months} months.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Month", "Spending", "Income", "Net"]);
    for row in &monthly {
        table.add_row(vec![
            Cell::new(&row.label),
            Cell::new(money(row.spending)),
            Cell::new(money(row.income)),
            Cell::new(money(row.net)),
        ]);
    }
    println!("Monthly trends\n{table}");

    let metrics = trend_metrics(&monthly);
    if let Some(pct) = metrics.get("spending_trend_pct") {
        println!("Spending trend over the window: {}", percent(*pct));
    }

    let by_category = top_category_trends(&conn, &engine, months, top)?;
    if !by_category.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Month", "Category", "Spending"]);
        for row in &by_category {
            table.add_row(vec![
                Cell::new(&row.label),
                Cell::new(&row.category),
                Cell::new(money(row.spending)),
            ]);
        }
        println!("\nTop {top} categories\n{table}");
    }
    Ok(())
}
