use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS transactions (
    id TEXT PRIMARY KEY,
    date TEXT NOT NULL,
    description TEXT NOT NULL,
    amount REAL NOT NULL,
    account TEXT NOT NULL,
    category TEXT,
    category_source TEXT DEFAULT 'auto',
    raw_description TEXT,
    auto_exclude_reason TEXT,
    exclude_from_budget INTEGER DEFAULT 0,
    manual_override_type TEXT,
    override_reason TEXT,
    override_category TEXT,
    manual_notes TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS categories (
    name TEXT PRIMARY KEY,
    color TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category);
CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions(account);
";

// (name, display color)
const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Food & drink", "#20B2AA"),
    ("Groceries", "#4682B4"),
    ("Automotive", "#FFA500"),
    ("Pets", "#DDA0DD"),
    ("Bills & utilities", "#8B4513"),
    ("Shopping", "#FF69B4"),
    ("Travel", "#9370DB"),
    ("Health & wellness", "#32CD32"),
    ("Entertainment", "#FFD700"),
    ("Fees & adjustments", "#FF4500"),
    ("Income", "#00FF00"),
    ("Transfers", "#A9A9A9"),
    ("Other", "#808080"),
];

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    // Categories are seeded once and only ever added to, never deleted.
    let count: i64 = conn.query_row("SELECT count(*) FROM categories", [], |row| row.get(0))?;
    if count == 0 {
        for (name, color) in DEFAULT_CATEGORIES {
            conn.execute(
                "INSERT INTO categories (name, color) VALUES (?1, ?2)",
                rusqlite::params![name, color],
            )?;
        }
    }
    Ok(())
}
