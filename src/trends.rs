use std::collections::{BTreeMap, HashSet};

use chrono::Datelike;
use rusqlite::Connection;

use crate::error::Result;
use crate::overrides::{spending_total, OverrideEngine};

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub spending: f64,
    pub income: f64,
    pub net: f64,
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTrendRow {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub category: String,
    pub spending: f64,
}

fn month_label(year: i32, month: u32) -> String {
    chrono::NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_default()
}

fn step_back(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// The trailing window as (year, month) pairs, oldest first, ending at and
/// including the anchor month.
fn trailing_months(end_year: i32, end_month: u32, months: u32) -> Vec<(i32, u32)> {
    let mut window = Vec::with_capacity(months as usize);
    let (mut y, mut m) = (end_year, end_month);
    for _ in 0..months {
        window.push((y, m));
        (y, m) = step_back(y, m);
    }
    window.reverse();
    window
}

/// Spending/income/net per calendar month over the trailing window, anchored
/// at the current month. Each month is classified with the same effective-
/// exclude and whitelist rules as the monthly view, re-derived per row, so
/// the trend stays consistent when override state changes.
pub fn monthly_trends(
    conn: &Connection,
    engine: &OverrideEngine,
    months: u32,
) -> Result<Vec<MonthlyTrend>> {
    let today = chrono::Local::now().date_naive();
    monthly_trends_as_of(conn, engine, months, today.year(), today.month())
}

pub fn monthly_trends_as_of(
    conn: &Connection,
    engine: &OverrideEngine,
    months: u32,
    end_year: i32,
    end_month: u32,
) -> Result<Vec<MonthlyTrend>> {
    let mut trends = Vec::new();
    for (year, month) in trailing_months(end_year, end_month, months) {
        let all = engine.effective_transactions(conn, year, month)?;
        if all.is_empty() {
            continue;
        }
        let budget = engine.budget_transactions(conn, year, month)?;
        let spending = spending_total(&budget);
        let income = engine.income_total(&budget);
        trends.push(MonthlyTrend {
            year,
            month,
            label: month_label(year, month),
            spending,
            income,
            net: income - spending,
        });
    }
    Ok(trends)
}

/// Per-month spending for the top-K categories by total trailing spending.
/// Categories outside the top K are omitted entirely, not folded into Other.
pub fn top_category_trends(
    conn: &Connection,
    engine: &OverrideEngine,
    months: u32,
    top_k: usize,
) -> Result<Vec<CategoryTrendRow>> {
    let today = chrono::Local::now().date_naive();
    top_category_trends_as_of(conn, engine, months, top_k, today.year(), today.month())
}

pub fn top_category_trends_as_of(
    conn: &Connection,
    engine: &OverrideEngine,
    months: u32,
    top_k: usize,
    end_year: i32,
    end_month: u32,
) -> Result<Vec<CategoryTrendRow>> {
    let mut per_month: Vec<(i32, u32, BTreeMap<String, f64>)> = Vec::new();
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for (year, month) in trailing_months(end_year, end_month, months) {
        let budget = engine.budget_transactions(conn, year, month)?;
        let mut sums: BTreeMap<String, f64> = BTreeMap::new();
        for txn in budget.iter().filter(|t| t.amount < 0.0) {
            *sums.entry(txn.category.clone()).or_default() += txn.amount.abs();
            *totals.entry(txn.category.clone()).or_default() += txn.amount.abs();
        }
        if !sums.is_empty() {
            per_month.push((year, month, sums));
        }
    }

    let mut ranked: Vec<(String, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    let top: HashSet<String> = ranked.into_iter().take(top_k).map(|(c, _)| c).collect();

    let mut rows = Vec::new();
    for (year, month, sums) in per_month {
        let mut month_rows: Vec<CategoryTrendRow> = sums
            .into_iter()
            .filter(|(category, _)| top.contains(category))
            .map(|(category, spending)| CategoryTrendRow {
                year,
                month,
                label: month_label(year, month),
                category,
                spending,
            })
            .collect();
        month_rows.sort_by(|a, b| b.spending.total_cmp(&a.spending));
        rows.extend(month_rows);
    }
    Ok(rows)
}

/// Direction and volatility per series. Percent change needs a nonzero first
/// month; volatility is the coefficient of variation.
pub fn trend_metrics(trends: &[MonthlyTrend]) -> BTreeMap<String, f64> {
    let mut metrics = BTreeMap::new();
    if trends.len() < 2 {
        return metrics;
    }
    series_metrics(&mut metrics, "spending", &trends.iter().map(|t| t.spending).collect::<Vec<_>>());
    series_metrics(&mut metrics, "income", &trends.iter().map(|t| t.income).collect::<Vec<_>>());
    series_metrics(&mut metrics, "net", &trends.iter().map(|t| t.net).collect::<Vec<_>>());
    metrics
}

fn series_metrics(metrics: &mut BTreeMap<String, f64>, name: &str, values: &[f64]) {
    let first = values[0];
    let last = values[values.len() - 1];
    if first != 0.0 {
        metrics.insert(format!("{name}_trend_pct"), (last - first) / first.abs() * 100.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64).sqrt();
    if std != 0.0 && mean != 0.0 {
        metrics.insert(format!("{name}_volatility"), std / mean.abs() * 100.0);
    }
    metrics.insert(format!("{name}_avg"), mean);
}
