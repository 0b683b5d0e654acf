use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, DataType, Reader, Xlsx};

use super::model::{CellValue, DataTable};
use crate::error::SweepError;

// ---------------------------------------------------------------------------
// Source formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

impl SourceFormat {
    /// Dispatch on the lowercased final extension of `name`.
    pub fn from_file_name(name: &str) -> Result<Self, SweepError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" => Ok(SourceFormat::Xlsx),
            "" => Err(SweepError::UnsupportedExtension("(none)".into())),
            other => Err(SweepError::UnsupportedExtension(format!(".{other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table from raw file bytes. `name` selects the parser.
pub fn load_bytes(name: &str, bytes: &[u8]) -> Result<DataTable, SweepError> {
    let format = SourceFormat::from_file_name(name)?;
    let parsed = match format {
        SourceFormat::Csv => parse_csv(bytes),
        SourceFormat::Xlsx => parse_xlsx(bytes),
    };
    let mut table = parsed.map_err(|e| SweepError::parse(name, e))?;
    table.normalize_numeric();
    Ok(table)
}

/// Read a file from disk and load it.
pub fn load_file(path: &Path) -> Result<DataTable, SweepError> {
    let name = display_name(path);
    SourceFormat::from_file_name(&name)?;
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading {}", path.display()))
        .map_err(|e| SweepError::parse(&name, e))?;
    load_bytes(&name, &bytes)
}

/// File name component of a path, as shown to the user.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// First record is the header; every other record must have the same width.
fn parse_csv(bytes: &[u8]) -> Result<DataTable> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        bail!("No columns to parse from file");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    DataTable::new(dedupe_column_names(headers), rows)
}

/// Text that reads as a missing value, matched exactly.
const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn guess_cell_type(raw: &str) -> CellValue {
    let s = raw.trim();
    if s.is_empty() || NA_MARKERS.contains(&raw) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return if f.is_nan() {
            CellValue::Null
        } else {
            CellValue::Float(f)
        };
    }
    if s.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }
    CellValue::String(raw.to_string())
}

/// Rename repeated headers to `name.1`, `name.2`, … so every column is
/// addressable by name.
fn dedupe_column_names(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let mut candidate = name.clone();
        while taken.contains(&candidate) {
            let n = counts.entry(name.clone()).or_insert(0);
            *n += 1;
            candidate = format!("{name}.{n}");
        }
        taken.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

/// First worksheet; first row is the header.
fn parse_xlsx(bytes: &[u8]) -> Result<DataTable> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut sheet_rows = range.rows();
    let Some(header_row) = sheet_rows.next() else {
        return Ok(DataTable::default());
    };

    let columns: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Data::Empty => format!("Unnamed: {i}"),
            other => other.as_string().unwrap_or_else(|| other.to_string()),
        })
        .collect();

    let rows = sheet_rows
        .map(|row| {
            (0..columns.len())
                .map(|i| row.get(i).map(excel_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    DataTable::new(dedupe_column_names(columns), rows)
}

fn excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => {
            // Spreadsheets store every number as a float.
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                CellValue::Integer(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::String(s) if s.is_empty() => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| CellValue::Date(dt.to_string()))
            .unwrap_or(CellValue::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Date(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = load_bytes("notes.txt", b"a,b\n1,2\n").unwrap_err();
        assert!(matches!(err, SweepError::UnsupportedExtension(ref e) if e == ".txt"));
        assert_eq!(err.to_string(), "Unsupported file type: .txt");
    }

    #[test]
    fn missing_extension_is_an_error() {
        assert!(matches!(
            SourceFormat::from_file_name("README"),
            Err(SweepError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert_eq!(SourceFormat::from_file_name("A.CSV").unwrap(), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_file_name("b.Xlsx").unwrap(), SourceFormat::Xlsx);
    }

    #[test]
    fn parses_csv_with_type_guessing() {
        let csv = b"name,qty,price,active\nwidget,3,2.5,True\ngadget,,4,false\n";
        let table = load_bytes("s.csv", csv).unwrap();
        assert_eq!(table.columns().len(), 4);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][0], CellValue::String("widget".into()));
        assert_eq!(table.rows()[0][1], CellValue::Integer(3));
        assert_eq!(table.rows()[1][1], CellValue::Null);
        // mixed price column promoted to floats
        assert_eq!(table.rows()[1][2], CellValue::Float(4.0));
        assert_eq!(table.rows()[0][3], CellValue::Bool(true));
    }

    #[test]
    fn missing_markers_read_as_null() {
        let csv = b"id,score,note\n1,10,ok\n2,NA,N/A\n3,null,#N/A\n4,20,<NA>\n5,None,n/a\n";
        let table = load_bytes("m.csv", csv).unwrap();
        assert_eq!(table.rows()[1][1], CellValue::Null);
        assert_eq!(table.rows()[2][1], CellValue::Null);
        assert_eq!(table.rows()[4][1], CellValue::Null);
        assert!(table.column_values(2).skip(1).all(|v| *v == CellValue::Null));
        assert_eq!(table.numeric_columns(), vec![0, 1]);
    }

    #[test]
    fn repeated_headers_are_numbered() {
        let table = load_bytes("dup.csv", b"a,a,b,a,a.1\n1,2,3,4,5\n").unwrap();
        assert_eq!(table.columns(), &["a", "a.1", "b", "a.2", "a.1.1"].map(String::from));
    }

    #[test]
    fn empty_csv_is_a_parse_error() {
        let err = load_bytes("e.csv", b"").unwrap_err();
        assert!(matches!(err, SweepError::Parse { ref file, .. } if file == "e.csv"));
    }

    #[test]
    fn header_only_csv_has_no_rows() {
        let table = load_bytes("h.csv", b"a,b\n").unwrap();
        assert_eq!(table.columns().len(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn text_keeps_its_whitespace() {
        let table = load_bytes("w.csv", b"label,n\n\"  padded \", 7 \n").unwrap();
        assert_eq!(table.rows()[0][0], CellValue::String("  padded ".into()));
        assert_eq!(table.rows()[0][1], CellValue::Integer(7));
    }

    #[test]
    fn ragged_csv_is_a_parse_error() {
        let err = load_bytes("bad.csv", b"a,b\n1,2,3\n").unwrap_err();
        match err {
            SweepError::Parse { file, .. } => assert_eq!(file, "bad.csv"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn garbage_xlsx_is_a_parse_error() {
        let err = load_bytes("broken.xlsx", b"not a zip archive").unwrap_err();
        assert!(matches!(err, SweepError::Parse { .. }));
    }

    #[test]
    fn reads_xlsx_workbook() {
        let mut wb = rust_xlsxwriter::Workbook::new();
        let ws = wb.add_worksheet();
        ws.write_string(0, 0, "city").unwrap();
        ws.write_string(0, 1, "temp").unwrap();
        ws.write_string(1, 0, "Oslo").unwrap();
        ws.write_number(1, 1, 4.5).unwrap();
        ws.write_string(2, 0, "Rome").unwrap();
        ws.write_number(2, 1, 18.0).unwrap();
        ws.write_string(3, 0, "Lima").unwrap();
        let bytes = wb.save_to_buffer().unwrap();

        let table = load_bytes("weather.xlsx", &bytes).unwrap();
        assert_eq!(table.columns(), &["city".to_string(), "temp".to_string()]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0][1], CellValue::Float(4.5));
        assert_eq!(table.rows()[1][1], CellValue::Float(18.0));
        assert_eq!(table.rows()[2][1], CellValue::Null);
    }

    #[test]
    fn load_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(&path, "id,age\n1,30\n2,40\n").unwrap();
        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(display_name(&path), "people.csv");
    }
}
