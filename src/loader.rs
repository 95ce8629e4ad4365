use std::path::Path;
use std::time::Duration;

use log::debug;

use crate::cache;
use crate::error::{ApoteoError, Result};
use crate::models::{Execution, RawRow};
use crate::settings::Settings;

// Required columns of the APOTEOSYS export. The hierarchical code is
// always the first column; the rest are located by header name.
pub const COL_CONCEPT: &str = "Concepto de gasto";
pub const COL_SOURCE: &str = "Nombre";
pub const COL_AVAILABLE: &str = "DISPONIBLE";
pub const COL_COMMITTED: &str = "RP EMITIDOS";
pub const COL_DISBURSED: &str = "GIROS ACUMULADOS";
pub const COL_APPROPRIATION: &str = "SALDO DE APROPIACION";
pub const COL_UNEXECUTED: &str = "RECURSOS SIN EJECUTAR";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return -inner.trim().parse::<f64>().unwrap_or(0.0);
    }
    s.parse().unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    concept: usize,
    source: usize,
    available: usize,
    committed: usize,
    disbursed: usize,
    appropriation: usize,
    unexecuted: usize,
}

fn find_column(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| ApoteoError::MissingColumn(name.to_string()))
}

fn resolve_columns(headers: &[String]) -> Result<Columns> {
    Ok(Columns {
        concept: find_column(headers, COL_CONCEPT)?,
        source: find_column(headers, COL_SOURCE)?,
        available: find_column(headers, COL_AVAILABLE)?,
        committed: find_column(headers, COL_COMMITTED)?,
        disbursed: find_column(headers, COL_DISBURSED)?,
        appropriation: find_column(headers, COL_APPROPRIATION)?,
        unexecuted: find_column(headers, COL_UNEXECUTED)?,
    })
}

fn field(record: &csv::StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Parse the export body. The header row is located by scanning for the
/// concept column, which tolerates title/preamble lines above it. Rows
/// with blank codes or concepts are kept: forward-fill needs them in
/// their original positions. Unparseable numerics become 0, never errors.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    let mut columns: Option<Columns> = None;

    for result in rdr.records() {
        let record = result?;
        let Some(cols) = columns else {
            if record.iter().any(|f| f.trim() == COL_CONCEPT) {
                let headers: Vec<String> = record.iter().map(|f| f.to_string()).collect();
                columns = Some(resolve_columns(&headers)?);
            }
            continue;
        };
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        rows.push(RawRow {
            code: field(&record, 0).to_string(),
            concept: field(&record, cols.concept).to_string(),
            source: field(&record, cols.source).trim().to_string(),
            exec: Execution {
                available: parse_amount(field(&record, cols.available)),
                committed: parse_amount(field(&record, cols.committed)),
                disbursed: parse_amount(field(&record, cols.disbursed)),
                appropriation_balance: parse_amount(field(&record, cols.appropriation)),
                unexecuted: parse_amount(field(&record, cols.unexecuted)),
            },
        });
    }

    if columns.is_none() {
        return Err(ApoteoError::SourceUnavailable(format!(
            "no header row with a '{COL_CONCEPT}' column"
        )));
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// XLS / XLSX (feature-gated)
// ---------------------------------------------------------------------------

#[cfg(feature = "xls")]
fn cell_to_string(cell: &calamine::Data) -> String {
    use calamine::Data;
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(feature = "xls")]
fn cell_to_amount(cell: &calamine::Data) -> f64 {
    use calamine::Data;
    match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::String(s) => parse_amount(s),
        _ => 0.0,
    }
}

#[cfg(feature = "xls")]
pub fn parse_workbook(path: &Path) -> Result<Vec<RawRow>> {
    use calamine::Reader;

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| ApoteoError::SourceUnavailable(format!("{}: {e}", path.display())))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ApoteoError::SourceUnavailable("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| ApoteoError::SourceUnavailable(format!("{sheet}: {e}")))?;

    let mut rows = Vec::new();
    let mut columns: Option<Columns> = None;

    for row in range.rows() {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        let Some(cols) = columns else {
            if cells.iter().any(|c| c.trim() == COL_CONCEPT) {
                columns = Some(resolve_columns(&cells)?);
            }
            continue;
        };
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let cell = |idx: usize| row.get(idx);
        let amount = |idx: usize| cell(idx).map(cell_to_amount).unwrap_or(0.0);
        rows.push(RawRow {
            code: cells.first().cloned().unwrap_or_default(),
            concept: cells.get(cols.concept).cloned().unwrap_or_default(),
            source: cells
                .get(cols.source)
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            exec: Execution {
                available: amount(cols.available),
                committed: amount(cols.committed),
                disbursed: amount(cols.disbursed),
                appropriation_balance: amount(cols.appropriation),
                unexecuted: amount(cols.unexecuted),
            },
        });
    }

    if columns.is_none() {
        return Err(ApoteoError::SourceUnavailable(format!(
            "no header row with a '{COL_CONCEPT}' column in {}",
            path.display()
        )));
    }
    Ok(rows)
}

/// Read any worksheet verbatim as strings, headers first. Used by the
/// projection view, which renders consolidated-payroll workbooks as-is.
#[cfg(feature = "xls")]
pub fn read_sheet(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    use calamine::Reader;

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| ApoteoError::SourceUnavailable(format!("{}: {e}", path.display())))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ApoteoError::SourceUnavailable("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| ApoteoError::SourceUnavailable(format!("{sheet}: {e}")))?;

    let mut rows = range.rows().map(|r| r.iter().map(cell_to_string).collect());
    let headers: Vec<String> = rows.next().unwrap_or_default();
    Ok((headers, rows.collect()))
}

// ---------------------------------------------------------------------------
// load
// ---------------------------------------------------------------------------

fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .map(|e| {
            e.eq_ignore_ascii_case("xls")
                || e.eq_ignore_ascii_case("xlsx")
                || e.eq_ignore_ascii_case("xlsm")
        })
        .unwrap_or(false)
}

/// Load the export from a URL or local path. One attempt, no retries;
/// remote bodies go through the disk cache.
pub fn load(source: &str, settings: &Settings, refresh: bool) -> Result<Vec<RawRow>> {
    if source.is_empty() {
        return Err(ApoteoError::SourceUnavailable(
            "no source configured — run `apoteo init --source <url|file>`".to_string(),
        ));
    }

    if source.starts_with("http://") || source.starts_with("https://") {
        let ttl = Duration::from_secs(settings.cache_ttl_secs);
        let body = cache::fetch(source, &settings.cache_dir(), ttl, refresh)?;
        let rows = parse_csv(&body)?;
        debug!("loaded {} rows from {source}", rows.len());
        return Ok(rows);
    }

    let path = Path::new(source);
    if is_spreadsheet(path) {
        #[cfg(feature = "xls")]
        {
            let rows = parse_workbook(path)?;
            debug!("loaded {} rows from {}", rows.len(), path.display());
            return Ok(rows);
        }
        #[cfg(not(feature = "xls"))]
        return Err(ApoteoError::SourceUnavailable(
            "spreadsheet sources require the `xls` feature".to_string(),
        ));
    }

    let body = std::fs::read(path)
        .map_err(|e| ApoteoError::SourceUnavailable(format!("{}: {e}", path.display())))?;
    let rows = parse_csv(&body)?;
    debug!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Codigo,Concepto de gasto,Nombre,DISPONIBLE,RP EMITIDOS,GIROS ACUMULADOS,SALDO DE APROPIACION,RECURSOS SIN EJECUTAR";

    fn csv_with_rows(rows: &[&str]) -> Vec<u8> {
        let mut content = String::from(HEADER);
        content.push('\n');
        for r in rows {
            content.push_str(r);
            content.push('\n');
        }
        content.into_bytes()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), 1234.56);
        assert_eq!(parse_amount("\"500.00\""), 500.0);
        assert_eq!(parse_amount("  -42.50  "), -42.5);
        assert_eq!(parse_amount("$1,234.56"), 1234.56);
        assert_eq!(parse_amount("(500.00)"), -500.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("not_a_number"), 0.0);
    }

    #[test]
    fn test_parse_csv_basic() {
        let body = csv_with_rows(&[
            "  O231010100101,O231010100101 Sueldo básico,Otros Distrito Inversión,100.5,10,20,30,40",
            ",,Otros Distrito Inversión,200,0,0,0,0",
        ]);
        let rows = parse_csv(&body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, "  O231010100101");
        assert_eq!(rows[0].concept, "O231010100101 Sueldo básico");
        assert_eq!(rows[0].source, "Otros Distrito Inversión");
        assert_eq!(rows[0].exec.available, 100.5);
        assert_eq!(rows[0].exec.unexecuted, 40.0);
        // Blank code/concept rows are preserved for forward-fill
        assert_eq!(rows[1].code, "");
        assert_eq!(rows[1].exec.available, 200.0);
    }

    #[test]
    fn test_parse_csv_missing_numerics_default_to_zero() {
        let body = csv_with_rows(&["  O1,Concepto,Fuente,,,,,"]);
        let rows = parse_csv(&body).unwrap();
        assert!(rows[0].exec.is_zero());
    }

    #[test]
    fn test_parse_csv_skips_preamble_before_header() {
        let mut content = String::from("APOTEOSYS EXPORT\nGenerated: 29 OCT\n\n");
        content.push_str(HEADER);
        content.push_str("\n  O1,Concepto,Fuente,1,2,3,4,5\n");
        let rows = parse_csv(content.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].exec.disbursed, 3.0);
    }

    #[test]
    fn test_parse_csv_without_header_is_source_unavailable() {
        let err = parse_csv(b"a,b,c\n1,2,3\n").unwrap_err();
        assert!(matches!(err, ApoteoError::SourceUnavailable(_)));
    }

    #[test]
    fn test_parse_csv_missing_monetary_column() {
        let content = "Codigo,Concepto de gasto,Nombre,DISPONIBLE\n  O1,c,f,1\n";
        let err = parse_csv(content.as_bytes()).unwrap_err();
        assert!(matches!(err, ApoteoError::MissingColumn(_)));
    }

    #[test]
    fn test_load_from_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        std::fs::write(&path, csv_with_rows(&["  O1,c,f,1,2,3,4,5"])).unwrap();
        let settings = Settings::default();
        let rows = load(path.to_str().unwrap(), &settings, false).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_source_unavailable() {
        let settings = Settings::default();
        let err = load("/nonexistent/export.csv", &settings, false).unwrap_err();
        assert!(matches!(err, ApoteoError::SourceUnavailable(_)));
    }

    #[test]
    fn test_load_without_source_is_source_unavailable() {
        let settings = Settings::default();
        let err = load("", &settings, false).unwrap_err();
        assert!(matches!(err, ApoteoError::SourceUnavailable(_)));
    }
}
