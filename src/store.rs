use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::{
    AutoExcludeReason, CandidateTransaction, Category, CategorySource, OverrideCategory,
    OverrideType, Transaction,
};

const MAX_AMOUNT: f64 = 1_000_000.0;

const TXN_COLUMNS: &str = "id, date, description, amount, account, category, category_source, \
     raw_description, auto_exclude_reason, exclude_from_budget, manual_override_type, \
     override_reason, override_category, manual_notes";

// ---------------------------------------------------------------------------
// Identity & validation
// ---------------------------------------------------------------------------

/// Deterministic content id. Re-ingesting the same source row always produces
/// the same id, which is what makes duplicate uploads a no-op.
pub fn transaction_id(date: &str, description: &str, amount: f64, account: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{date}|{description}|{amount}|{account}").as_bytes());
    hex::encode(hasher.finalize())
}

pub fn validate_candidate(txn: &CandidateTransaction) -> bool {
    if txn.date.trim().is_empty() || txn.account.trim().is_empty() {
        return false;
    }
    if !txn.amount.is_finite() || txn.amount.abs() > MAX_AMOUNT {
        return false;
    }
    // Date shape: canonical dates are ISO; raw strings that never parsed are
    // rejected here rather than at parse time.
    if txn.date.len() < 8 || !txn.date.contains('-') {
        return false;
    }
    if txn.description.trim().is_empty() {
        return false;
    }
    true
}

/// Normalize a stored exclude flag to a strict bool. Legacy rows carry ints,
/// text, and the occasional corrupt blob; anything unrecognized is false so
/// classification degrades safely instead of erroring.
pub fn normalize_flag(value: ValueRef<'_>) -> bool {
    match value {
        ValueRef::Null => false,
        ValueRef::Integer(i) => i != 0,
        ValueRef::Real(f) => f != 0.0,
        ValueRef::Text(t) => std::str::from_utf8(t)
            .map(|s| matches!(s.to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
            .unwrap_or(false),
        ValueRef::Blob(_) => false,
    }
}

fn row_to_transaction(row: &Row) -> rusqlite::Result<Transaction> {
    let category: Option<String> = row.get(5)?;
    let category_source: Option<String> = row.get(6)?;
    let raw_description: Option<String> = row.get(7)?;
    let auto_exclude_reason: Option<String> = row.get(8)?;
    let manual_override_type: Option<String> = row.get(10)?;
    let override_category: Option<String> = row.get(12)?;

    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        description: row.get(2)?,
        amount: row.get(3)?,
        account: row.get(4)?,
        category: category.unwrap_or_else(|| "Other".to_string()),
        category_source: match category_source.as_deref() {
            Some("manual") => CategorySource::Manual,
            _ => CategorySource::Auto,
        },
        raw_description: raw_description.unwrap_or_default(),
        auto_exclude_reason: auto_exclude_reason.as_deref().and_then(AutoExcludeReason::from_db),
        exclude_from_budget: normalize_flag(row.get_ref(9)?),
        manual_override_type: manual_override_type.as_deref().and_then(OverrideType::from_db),
        override_reason: row.get(11)?,
        override_category: override_category.as_deref().and_then(OverrideCategory::from_db),
        manual_notes: row.get(13)?,
    })
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Insert candidates whose id is not already present. Invalid candidates are
/// skipped silently; one bad row never aborts the batch. Returns the number
/// actually inserted.
pub fn upsert(conn: &Connection, candidates: &[CandidateTransaction]) -> Result<usize> {
    let mut new_count = 0usize;
    for txn in candidates {
        if !validate_candidate(txn) {
            continue;
        }
        let id = transaction_id(&txn.date, &txn.description, txn.amount, &txn.account);
        let mut stmt = conn.prepare_cached("SELECT 1 FROM transactions WHERE id = ?1")?;
        if stmt.exists([&id])? {
            continue;
        }
        conn.execute(
            "INSERT INTO transactions \
             (id, date, description, amount, account, category, auto_exclude_reason, raw_description) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                id,
                txn.date,
                txn.description,
                txn.amount,
                txn.account,
                txn.category,
                txn.auto_exclude_reason.map(|r| r.as_str()),
                txn.raw_description,
            ],
        )?;
        new_count += 1;
    }
    Ok(new_count)
}

#[derive(Debug, Default, Clone)]
pub struct FieldUpdate {
    pub category: Option<String>,
    pub exclude_from_budget: Option<bool>,
    pub manual_notes: Option<String>,
}

/// Update the mutable fields of one record. Setting a category also marks it
/// manually categorized. Returns false when nothing matched the id or the
/// update carries no fields.
pub fn apply_field_update(conn: &Connection, id: &str, update: &FieldUpdate) -> Result<bool> {
    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(category) = &update.category {
        sets.push("category = ?");
        sets.push("category_source = 'manual'");
        values.push(Box::new(category.clone()));
    }
    if let Some(flag) = update.exclude_from_budget {
        sets.push("exclude_from_budget = ?");
        values.push(Box::new(flag));
    }
    if let Some(notes) = &update.manual_notes {
        sets.push("manual_notes = ?");
        values.push(Box::new(notes.clone()));
    }
    if values.is_empty() {
        return Ok(false);
    }

    sets.push("updated_at = datetime('now')");
    values.push(Box::new(id.to_string()));
    let sql = format!("UPDATE transactions SET {} WHERE id = ?", sets.join(", "));
    let refs: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(|v| v.as_ref()).collect();
    let changed = conn.execute(&sql, refs.as_slice())?;
    Ok(changed > 0)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// All records in a calendar month, newest first, amount descending within a
/// day. The ordering is not meaningful beyond being deterministic.
pub fn query_by_month(conn: &Connection, year: i32, month: u32) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {TXN_COLUMNS} FROM transactions \
         WHERE strftime('%Y', date) = ?1 AND strftime('%m', date) = ?2 \
         ORDER BY date DESC, amount DESC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt
        .query_map(
            rusqlite::params![format!("{year:04}"), format!("{month:02}")],
            row_to_transaction,
        )?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn list_categories(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM categories ORDER BY name")?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn list_category_catalog(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT name, COALESCE(color, '') FROM categories ORDER BY name")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Category {
                name: row.get(0)?,
                color: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT account FROM transactions ORDER BY account")?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
