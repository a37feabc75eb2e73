use crate::cli::resolve_transaction_id;
use crate::db::get_connection;
use crate::error::{HearthError, Result};
use crate::settings::db_path;
use crate::store::{apply_field_update, list_categories, FieldUpdate};

pub fn run(
    id: &str,
    category: Option<&str>,
    note: Option<&str>,
    exclude: bool,
    include: bool,
) -> Result<()> {
    let conn = get_connection(&db_path())?;

    if let Some(name) = category {
        let known = list_categories(&conn)?;
        if !known.iter().any(|c| c == name) {
            return Err(HearthError::UnknownCategory(name.to_string()));
        }
    }

    let update = FieldUpdate {
        category: category.map(str::to_string),
        manual_notes: note.map(str::to_string),
        exclude_from_budget: if exclude {
            Some(true)
        } else if include {
            Some(false)
        } else {
            None
        },
    };

    let full_id = resolve_transaction_id(&conn, id)?;
    if apply_field_update(&conn, &full_id, &update)? {
        println!("Updated.");
    } else {
        println!("Nothing to update.");
    }
    Ok(())
}
