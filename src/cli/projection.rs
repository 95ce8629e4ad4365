use std::path::Path;

use comfy_table::Table;

use crate::cli::render::print_title;
use crate::error::Result;
use crate::loader::read_sheet;

/// Render one workbook verbatim, headers first.
fn print_workbook(title: &str, path: &str) -> Result<()> {
    let (headers, rows) = read_sheet(Path::new(path))?;

    let mut table = Table::new();
    table.set_header(headers);
    for row in rows {
        table.add_row(row);
    }

    print_title(title);
    println!("{table}");
    Ok(())
}

pub fn run(wages: &str, contributions: &str) -> Result<()> {
    print_workbook("PROYECCIÓN - SUELDOS", wages)?;
    print_workbook("PROYECCIÓN - APORTES", contributions)?;
    Ok(())
}
