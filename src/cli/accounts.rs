use crate::db::get_connection;
use crate::error::Result;
use crate::settings::db_path;
use crate::store::list_accounts;

pub fn run() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let accounts = list_accounts(&conn)?;
    if accounts.is_empty() {
        println!("No accounts yet; import a CSV first.");
        return Ok(());
    }
    for account in accounts {
        println!("{account}");
    }
    Ok(())
}
