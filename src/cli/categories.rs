use comfy_table::{Cell, Table};

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::db_path;
use crate::store::list_category_catalog;

pub fn run() -> Result<()> {
    let conn = get_connection(&db_path())?;
    init_db(&conn)?;
    let categories = list_category_catalog(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["Name", "Color"]);
    for cat in categories {
        table.add_row(vec![Cell::new(cat.name), Cell::new(cat.color)]);
    }
    println!("Categories\n{table}");
    Ok(())
}
