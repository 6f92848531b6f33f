use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{info, warn};

use super::model::{CellValue, Row, Table};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` – comma-delimited, header row
/// * `.tsv` – tab-delimited, header row
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let delimiter = match ext.as_str() {
        "csv" => b',',
        "tsv" => b'\t',
        other => bail!("Unsupported file extension: .{other}"),
    };

    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let table = load_reader(file, delimiter)
        .with_context(|| format!("loading {}", path.display()))?;
    info!(
        "loaded {} ({} rows, {} columns)",
        path.display(),
        table.len(),
        table.column_names.len()
    );
    Ok(table)
}

/// Load every `.csv` file in a directory, keyed by file stem.
pub fn load_dir(dir: &Path) -> Result<BTreeMap<String, Table>> {
    let mut tables = BTreeMap::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?;

    for entry in entries {
        let path = entry.context("reading directory entry")?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if !is_csv {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            warn!("skipping {} (non UTF-8 file name)", path.display());
            continue;
        };
        tables.insert(stem.to_string(), load_file(&path)?);
    }

    if tables.is_empty() {
        bail!("no .csv files in {}", dir.display());
    }
    Ok(tables)
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one observation per row.
/// Whitespace around fields is trimmed; every cell's type is guessed.
pub fn load_reader<R: Read>(reader: R, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.iter().any(|h| h.is_empty()) {
        bail!("CSV header contains an empty column name");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), CellValue::parse(value)))
            .collect();
        rows.push(row);
    }

    Ok(Table::from_rows(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_trims() {
        let text = "year, region, share\n1950, EU, 1.5\n1960, US,\n";
        let t = load_reader(text.as_bytes(), b',').unwrap();
        assert_eq!(t.column_names, vec!["year", "region", "share"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[0]["region"], CellValue::String("EU".into()));
        assert_eq!(t.rows[1]["share"], CellValue::Null);
        assert_eq!(t.numeric_column("year").unwrap(), vec![1950.0, 1960.0]);
    }

    #[test]
    fn ragged_row_is_reported() {
        let text = "x,y\n1,2\n3,4,5\n";
        let err = load_reader(text.as_bytes(), b',').unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 1"), "{err:#}");
    }

    #[test]
    fn unknown_extension_rejected() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn tab_delimited() {
        let t = load_reader("a\tb\n1\t2\n".as_bytes(), b'\t').unwrap();
        assert_eq!(t.numeric_column("b").unwrap(), vec![2.0]);
    }
}
