use colored::Colorize;

use crate::aggregator::evaluate;
use crate::classifier::classify;
use crate::cli::render::{print_no_data, print_title, report_table};
use crate::error::Result;
use crate::fmt::{pct, pesos};
use crate::loader;
use crate::models::Report;
use crate::rules::{funding_summary, GRAND_TOTAL};
use crate::settings::load_settings;

pub fn run(source: Option<String>, refresh: bool) -> Result<()> {
    let settings = load_settings();
    let source = source.unwrap_or_else(|| settings.source.clone());

    let raw = loader::load(&source, &settings, refresh)?;
    let rows = classify(raw);
    let report = evaluate(&rows, &funding_summary());

    if !report.has_matches() {
        print_no_data("los criterios del resumen");
        return Ok(());
    }

    print_title(&report.title);
    println!("{}", report_table(&report, None));
    print_metrics(&report);
    Ok(())
}

/// Executive metrics, all derived from the grand-total row's raw fields.
fn print_metrics(report: &Report) {
    let Some(grand) = report.get(GRAND_TOTAL) else {
        return;
    };
    let t = grand.totals;
    if t.is_zero() {
        return;
    }
    let executed = pct(t.disbursed, t.available);
    let committed = pct(t.committed, t.available);

    println!("{}", "Resumen Ejecutivo:".bold());
    println!(
        "  % Ejecutado:       {:>6.1}%   (GIROS: {})",
        executed,
        pesos(t.disbursed)
    );
    println!(
        "  RP Emitidos:       {}   ({:.1}% del disponible)",
        pesos(t.committed),
        committed
    );
    println!("  Disponible Total:  {}", pesos(t.available));
    println!("  Por Ejecutar:      {}", pesos(t.unexecuted));
}
