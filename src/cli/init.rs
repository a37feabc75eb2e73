use std::path::PathBuf;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{load_settings, save_settings};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = dir;
    }
    save_settings(&settings)?;

    let dir = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&dir)?;
    let conn = get_connection(&dir.join("hearth.db"))?;
    init_db(&conn)?;

    println!("Initialized ledger at {}", dir.join("hearth.db").display());
    Ok(())
}
