use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use super::model::{CellValue, DataTable};

// ---------------------------------------------------------------------------
// Export formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Excel];

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Excel => "Excel",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// A converted table ready to be written out.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Convert `table` into `format`, naming the result after `original_name`.
pub fn export(table: &DataTable, original_name: &str, format: ExportFormat) -> Result<ExportedFile> {
    let bytes = match format {
        ExportFormat::Csv => to_csv_bytes(table)?,
        ExportFormat::Excel => to_xlsx_bytes(table)?,
    };
    Ok(ExportedFile {
        file_name: export_file_name(original_name, format),
        mime_type: format.mime_type(),
        bytes,
    })
}

/// Swap the final extension of `original` for the one of `format`.
pub fn export_file_name(original: &str, format: ExportFormat) -> String {
    let stem = match Path::new(original).extension() {
        Some(ext) => &original[..original.len() - ext.len() - 1],
        None => original,
    };
    format!("{stem}.{}", format.extension())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Header plus rows, no index column. Missing cells become empty fields.
pub fn to_csv_bytes(table: &DataTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns())
        .context("writing CSV header")?;
    for (row_no, row) in table.rows().iter().enumerate() {
        writer
            .write_record(row.iter().map(csv_field))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV buffer: {}", e.error()))
}

fn csv_field(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        CellValue::Float(v) if v.is_nan() => String::new(),
        CellValue::Float(v) => {
            // Keep floats distinguishable from integers on re-read.
            let s = v.to_string();
            if v.is_finite() && !s.contains('.') {
                format!("{s}.0")
            } else {
                s
            }
        }
        CellValue::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

/// Single worksheet with a bold header row, no index column.
pub fn to_xlsx_bytes(table: &DataTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        sheet
            .write_string_with_format(0, xlsx_col(col)?, name, &header)
            .with_context(|| format!("writing header '{name}'"))?;
    }

    for (row_no, row) in table.rows().iter().enumerate() {
        let r = u32::try_from(row_no + 1).context("too many rows for a worksheet")?;
        for (col, cell) in row.iter().enumerate() {
            let c = xlsx_col(col)?;
            let written = match cell {
                CellValue::Null => continue,
                CellValue::Float(v) if !v.is_finite() => continue,
                CellValue::Integer(i) => sheet.write_number(r, c, *i as f64),
                CellValue::Float(v) => sheet.write_number(r, c, *v),
                CellValue::Bool(b) => sheet.write_boolean(r, c, *b),
                CellValue::String(s) | CellValue::Date(s) => sheet.write_string(r, c, s),
            };
            written.with_context(|| format!("writing cell ({r}, {c})"))?;
        }
    }

    workbook.save_to_buffer().context("serializing workbook")
}

fn xlsx_col(col: usize) -> Result<u16> {
    u16::try_from(col).context("too many columns for a worksheet")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;

    fn table() -> DataTable {
        DataTable::new(
            vec!["item".into(), "qty".into(), "price".into(), "ok".into()],
            vec![
                vec![
                    CellValue::String("bolt, large".into()),
                    CellValue::Integer(10),
                    CellValue::Float(1.0),
                    CellValue::Bool(true),
                ],
                vec![
                    CellValue::String("nut".into()),
                    CellValue::Null,
                    CellValue::Float(0.25),
                    CellValue::Bool(false),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn csv_round_trip_keeps_columns_and_rows() {
        let original = table();
        let bytes = to_csv_bytes(&original).unwrap();
        let back = load_bytes("out.csv", &bytes).unwrap();
        assert_eq!(back.columns(), original.columns());
        assert_eq!(back.len(), original.len());
        assert_eq!(back.rows()[0][2], CellValue::Float(1.0));
        assert_eq!(back.rows()[0][0], CellValue::String("bolt, large".into()));
        assert_eq!(back.rows()[1][1], CellValue::Null);
    }

    #[test]
    fn csv_has_no_index_column() {
        let bytes = to_csv_bytes(&table()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("item,qty,price,ok\n"));
        assert!(text.contains("nut,,0.25,False"));
    }

    #[test]
    fn xlsx_export_reads_back() {
        let original = table();
        let bytes = to_xlsx_bytes(&original).unwrap();
        let back = load_bytes("out.xlsx", &bytes).unwrap();
        assert_eq!(back.columns(), original.columns());
        assert_eq!(back.len(), original.len());
        assert_eq!(back.rows()[0][1], CellValue::Integer(10));
        assert_eq!(back.rows()[1][2], CellValue::Float(0.25));
        assert_eq!(back.rows()[1][3], CellValue::Bool(false));
    }

    #[test]
    fn renames_by_replacing_extension() {
        assert_eq!(export_file_name("sales.xlsx", ExportFormat::Csv), "sales.csv");
        assert_eq!(export_file_name("q1.report.CSV", ExportFormat::Excel), "q1.report.xlsx");
        assert_eq!(export_file_name("data", ExportFormat::Csv), "data.csv");
    }

    #[test]
    fn export_sets_mime_type() {
        let out = export(&table(), "sales.csv", ExportFormat::Excel).unwrap();
        assert_eq!(out.file_name, "sales.xlsx");
        assert_eq!(
            out.mime_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert!(!out.bytes.is_empty());

        let csv = export(&table(), "sales.xlsx", ExportFormat::Csv).unwrap();
        assert_eq!(csv.mime_type, "text/csv");
    }
}
