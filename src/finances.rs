use std::collections::BTreeMap;

use rusqlite::Connection;

use crate::error::Result;
use crate::models::Transaction;
use crate::overrides::{spending_total, CalculationBreakdown, OverrideEngine};

/// One month of household numbers plus everything needed to audit them.
#[derive(Debug, Clone)]
pub struct HouseholdFinances {
    pub spending: f64,
    pub income: f64,
    pub net: f64,
    /// Every record in the window, excluded ones included.
    pub transactions: Vec<Transaction>,
    pub breakdown: CalculationBreakdown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpend {
    pub category: String,
    pub total_spent: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub account: String,
    pub spending: f64,
    pub income: f64,
    pub net: f64,
}

pub fn get_household_finances(
    conn: &Connection,
    engine: &OverrideEngine,
    year: i32,
    month: u32,
) -> Result<HouseholdFinances> {
    let transactions = engine.effective_transactions(conn, year, month)?;
    let budget = engine.budget_transactions(conn, year, month)?;

    let spending = spending_total(&budget);
    let income = engine.income_total(&budget);
    let breakdown = engine.breakdown(conn, year, month)?;

    Ok(HouseholdFinances {
        spending,
        income,
        net: income - spending,
        transactions,
        breakdown,
    })
}

/// Budget-set outflows grouped by category, largest first.
pub fn get_spending_by_category(
    conn: &Connection,
    engine: &OverrideEngine,
    year: i32,
    month: u32,
) -> Result<Vec<CategorySpend>> {
    let budget = engine.budget_transactions(conn, year, month)?;

    let mut by_category: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for txn in budget.iter().filter(|t| t.amount < 0.0) {
        let entry = by_category.entry(txn.category.clone()).or_default();
        entry.0 += txn.amount.abs();
        entry.1 += 1;
    }

    let mut rows: Vec<CategorySpend> = by_category
        .into_iter()
        .map(|(category, (total_spent, transaction_count))| CategorySpend {
            category,
            total_spent,
            transaction_count,
        })
        .collect();
    rows.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    Ok(rows)
}

/// Spending and gross inflows split per account, net per account.
pub fn get_account_breakdown(
    conn: &Connection,
    engine: &OverrideEngine,
    year: i32,
    month: u32,
) -> Result<Vec<AccountSummary>> {
    let budget = engine.budget_transactions(conn, year, month)?;

    let mut by_account: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for txn in &budget {
        let entry = by_account.entry(txn.account.clone()).or_default();
        if txn.amount < 0.0 {
            entry.0 += txn.amount.abs();
        } else {
            entry.1 += txn.amount;
        }
    }

    Ok(by_account
        .into_iter()
        .map(|(account, (spending, income))| AccountSummary {
            account,
            spending,
            income,
            net: income - spending,
        })
        .collect())
}
