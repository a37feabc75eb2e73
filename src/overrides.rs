use std::collections::BTreeMap;

use rusqlite::Connection;

use crate::error::Result;
use crate::models::{AutoExcludeReason, OverrideCategory, OverrideType, Transaction};
use crate::store;

pub const DEFAULT_CASHBACK_THRESHOLD: f64 = 100.0;

// Descriptions that count as income by default. Anything positive outside
// this list needs a manual include override before it is counted.
const INCOME_PATTERNS: &[&str] = &[
    "PAYROLL",
    "DIRECT DEP",
    "DIRECTDEP",
    "REIMBURS",
    "REFUND",
    "CASHBACK",
    "CASH BACK",
    "GIFT",
    "BONUS",
    "INTEREST",
];

/// The include/exclude decision for one transaction. A manual override always
/// wins over the automatic signal, in either direction; the automatic
/// transfer/payment tag is a default, never a hard rule. With neither, the
/// legacy exclude flag decides.
pub fn effective_exclude(txn: &Transaction) -> bool {
    match txn.manual_override_type {
        Some(OverrideType::Include) => false,
        Some(OverrideType::Exclude) => true,
        None => txn.auto_exclude_reason.is_some() || txn.exclude_from_budget,
    }
}

pub fn is_manual_income(txn: &Transaction) -> bool {
    txn.manual_override_type == Some(OverrideType::Include)
        && txn.override_category == Some(OverrideCategory::Income)
}

pub fn spending_total(budget_rows: &[Transaction]) -> f64 {
    budget_rows
        .iter()
        .filter(|t| t.amount < 0.0)
        .map(|t| t.amount.abs())
        .sum()
}

/// Write a manual override. The automatic signal is deliberately left in
/// place so the breakdown can still show what the engine would have decided.
pub fn apply_manual_override(
    conn: &Connection,
    id: &str,
    override_type: OverrideType,
    reason: &str,
    override_category: OverrideCategory,
) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE transactions \
         SET manual_override_type = ?1, override_reason = ?2, override_category = ?3, \
             updated_at = datetime('now') \
         WHERE id = ?4",
        rusqlite::params![override_type.as_str(), reason, override_category.as_str(), id],
    )?;
    Ok(changed > 0)
}

/// Clear the override fields, reverting to whatever the automatic signal or
/// legacy flag produces.
pub fn remove_manual_override(conn: &Connection, id: &str) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE transactions \
         SET manual_override_type = NULL, override_reason = NULL, override_category = NULL, \
             updated_at = datetime('now') \
         WHERE id = ?1",
        [id],
    )?;
    Ok(changed > 0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BreakdownEntry {
    pub count: usize,
    pub total: f64,
}

/// Transparency breakdown for one month. Reconciles exactly with the totals
/// the engine reports, so a user can audit why a number is what it is.
#[derive(Debug, Clone, Default)]
pub struct CalculationBreakdown {
    pub auto_excluded: BTreeMap<AutoExcludeReason, BreakdownEntry>,
    pub manual_overrides: BTreeMap<OverrideType, BreakdownEntry>,
    pub spending: f64,
    pub income: f64,
    pub net: f64,
}

#[derive(Debug, Clone, Default)]
pub struct OverrideCandidates {
    /// Auto-excluded, not manually touched: could be included.
    pub auto_excluded: Vec<Transaction>,
    /// Auto-included outflows, not manually touched: could be excluded.
    pub auto_included: Vec<Transaction>,
}

/// Classification over a month window. Stateless: every call re-reads the
/// ledger and re-derives the override stack, so override writes are visible
/// immediately and no cross-call cache can go stale.
#[derive(Debug, Clone, Copy)]
pub struct OverrideEngine {
    pub cashback_threshold: f64,
}

impl Default for OverrideEngine {
    fn default() -> Self {
        Self {
            cashback_threshold: DEFAULT_CASHBACK_THRESHOLD,
        }
    }
}

impl OverrideEngine {
    pub fn new(cashback_threshold: f64) -> Self {
        Self { cashback_threshold }
    }

    /// Whether a positive transaction counts as income without a manual
    /// override: known income vocabulary, or a small credit-card inflow
    /// (likely cashback or a purchase refund rather than real income).
    pub fn income_whitelisted(&self, txn: &Transaction) -> bool {
        if txn.amount <= 0.0 {
            return false;
        }
        let desc = txn.description.to_uppercase();
        if INCOME_PATTERNS.iter().any(|p| desc.contains(p)) {
            return true;
        }
        txn.account.to_lowercase().contains("credit") && txn.amount < self.cashback_threshold
    }

    pub fn effective_transactions(
        &self,
        conn: &Connection,
        year: i32,
        month: u32,
    ) -> Result<Vec<Transaction>> {
        store::query_by_month(conn, year, month)
    }

    pub fn budget_transactions(
        &self,
        conn: &Connection,
        year: i32,
        month: u32,
    ) -> Result<Vec<Transaction>> {
        Ok(self
            .effective_transactions(conn, year, month)?
            .into_iter()
            .filter(|t| !effective_exclude(t))
            .collect())
    }

    #[allow(dead_code)]
    pub fn excluded_transactions(
        &self,
        conn: &Connection,
        year: i32,
        month: u32,
    ) -> Result<Vec<Transaction>> {
        Ok(self
            .effective_transactions(conn, year, month)?
            .into_iter()
            .filter(|t| effective_exclude(t))
            .collect())
    }

    pub fn income_total(&self, budget_rows: &[Transaction]) -> f64 {
        budget_rows
            .iter()
            .filter(|t| t.amount > 0.0 && (self.income_whitelisted(t) || is_manual_income(t)))
            .map(|t| t.amount)
            .sum()
    }

    /// Budget-set inflows that count as income: whitelist hits plus manual
    /// income inclusions.
    #[allow(dead_code)]
    pub fn income_transactions(
        &self,
        conn: &Connection,
        year: i32,
        month: u32,
    ) -> Result<Vec<Transaction>> {
        Ok(self
            .budget_transactions(conn, year, month)?
            .into_iter()
            .filter(|t| t.amount > 0.0 && (self.income_whitelisted(t) || is_manual_income(t)))
            .collect())
    }

    /// Positive budget-set transactions captured by neither the whitelist nor
    /// a manual income override. Never silently counted; surfaced for review.
    pub fn pending_income(
        &self,
        conn: &Connection,
        year: i32,
        month: u32,
    ) -> Result<Vec<Transaction>> {
        Ok(self
            .budget_transactions(conn, year, month)?
            .into_iter()
            .filter(|t| t.amount > 0.0 && !self.income_whitelisted(t) && !is_manual_income(t))
            .collect())
    }

    /// The three candidate sets are pure queries over classification state;
    /// there is no extra state machine behind the review flow.
    pub fn override_candidates(
        &self,
        conn: &Connection,
        year: i32,
        month: u32,
    ) -> Result<OverrideCandidates> {
        let mut candidates = OverrideCandidates::default();
        for txn in self.effective_transactions(conn, year, month)? {
            if txn.manual_override_type.is_some() {
                continue;
            }
            if txn.auto_exclude_reason.is_some() {
                candidates.auto_excluded.push(txn);
            } else if !txn.exclude_from_budget && txn.amount < 0.0 {
                candidates.auto_included.push(txn);
            }
        }
        Ok(candidates)
    }

    pub fn breakdown(&self, conn: &Connection, year: i32, month: u32) -> Result<CalculationBreakdown> {
        let all = self.effective_transactions(conn, year, month)?;
        let mut breakdown = CalculationBreakdown::default();

        for txn in &all {
            match txn.manual_override_type {
                Some(override_type) => {
                    let entry = breakdown.manual_overrides.entry(override_type).or_default();
                    entry.count += 1;
                    entry.total += txn.amount.abs();
                }
                None => {
                    if let Some(reason) = txn.auto_exclude_reason {
                        let entry = breakdown.auto_excluded.entry(reason).or_default();
                        entry.count += 1;
                        entry.total += txn.amount.abs();
                    }
                }
            }
        }

        let budget: Vec<Transaction> = all.into_iter().filter(|t| !effective_exclude(t)).collect();
        breakdown.spending = spending_total(&budget);
        breakdown.income = self.income_total(&budget);
        breakdown.net = breakdown.income - breakdown.spending;
        Ok(breakdown)
    }
}
