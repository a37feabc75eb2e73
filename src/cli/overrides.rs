use crate::cli::resolve_transaction_id;
use crate::db::get_connection;
use crate::error::Result;
use crate::models::{OverrideCategory, OverrideType};
use crate::overrides::{apply_manual_override, remove_manual_override};
use crate::settings::db_path;

pub fn apply(id: &str, override_type: &str, reason: &str, category: &str) -> Result<()> {
    // Bad enum text fails here, before anything is written.
    let override_type: OverrideType = override_type.parse()?;
    let category: OverrideCategory = category.parse()?;

    let conn = get_connection(&db_path())?;
    let full_id = resolve_transaction_id(&conn, id)?;

    if apply_manual_override(&conn, &full_id, override_type, reason, category)? {
        println!("Override applied: {} ({})", override_type.as_str(), category.as_str());
    } else {
        println!("No transaction updated.");
    }
    Ok(())
}

pub fn remove(id: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let full_id = resolve_transaction_id(&conn, id)?;

    if remove_manual_override(&conn, &full_id)? {
        println!("Override removed; automatic classification applies again.");
    } else {
        println!("No transaction updated.");
    }
    Ok(())
}
