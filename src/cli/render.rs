use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::fmt::pesos;
use crate::loader::{
    COL_APPROPRIATION, COL_AVAILABLE, COL_COMMITTED, COL_DISBURSED, COL_UNEXECUTED,
};
use crate::models::{Bucket, BucketKind, Report};

fn header_cells(first: &str) -> Vec<Cell> {
    vec![
        Cell::new(first),
        Cell::new(COL_AVAILABLE),
        Cell::new(COL_COMMITTED),
        Cell::new(COL_DISBURSED),
        Cell::new(COL_APPROPRIATION),
        Cell::new(COL_UNEXECUTED),
    ]
}

fn bucket_row(bucket: &Bucket) -> Vec<Cell> {
    let name = match bucket.kind {
        BucketKind::Leaf => Cell::new(bucket.name),
        BucketKind::Rollup => Cell::new(bucket.name.bold()),
    };
    vec![
        name,
        Cell::new(pesos(bucket.totals.available)),
        Cell::new(pesos(bucket.totals.committed)),
        Cell::new(pesos(bucket.totals.disbursed)),
        Cell::new(pesos(bucket.totals.appropriation_balance)),
        Cell::new(pesos(bucket.totals.unexecuted)),
    ]
}

/// Render a report as a table, in bucket order. With `only` given, rows
/// are restricted to those names (the collapsed own-resources view).
pub fn report_table(report: &Report, only: Option<&[&str]>) -> String {
    let mut table = Table::new();
    table.set_header(header_cells("CONCEPTO"));
    for bucket in &report.buckets {
        if let Some(names) = only {
            if !names.contains(&bucket.name) {
                continue;
            }
        }
        table.add_row(bucket_row(bucket));
    }
    table.to_string()
}

pub fn print_title(title: &str) {
    println!();
    println!("{}", title.red().bold());
}

pub fn print_no_data(label: &str) {
    println!(
        "{}",
        format!("No se encontraron datos para {label}").yellow()
    );
}
