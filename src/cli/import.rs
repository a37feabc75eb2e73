use std::path::PathBuf;

use colored::Colorize;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::ingest::{account_label_from_filename, parse_csv};
use crate::settings::db_path;
use crate::store::upsert;

pub fn run(file: &str, account: Option<&str>) -> Result<()> {
    let file_path = PathBuf::from(file);
    let conn = get_connection(&db_path())?;
    init_db(&conn)?;

    let label = match account {
        Some(name) => name.to_string(),
        None => {
            let filename = file_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(file);
            account_label_from_filename(filename)
        }
    };

    let candidates = parse_csv(&file_path, &label)?;
    if candidates.is_empty() {
        println!("{}", format!("Unrecognized CSV layout in {file}; nothing imported.").yellow());
        return Ok(());
    }

    let new_count = upsert(&conn, &candidates)?;
    let skipped = candidates.len() - new_count;
    println!("{new_count} imported into '{label}', {skipped} skipped (duplicates or invalid)");
    Ok(())
}
