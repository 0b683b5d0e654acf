use std::collections::HashSet;

use super::model::{CellValue, DataTable};

// ---------------------------------------------------------------------------
// Duplicate removal
// ---------------------------------------------------------------------------

/// Remove rows identical to an earlier row. The first occurrence is kept and
/// row order is preserved. Returns the number of rows removed.
pub fn drop_duplicates(table: &mut DataTable) -> usize {
    let before = table.len();
    let mut seen: HashSet<Vec<CellValue>> = HashSet::with_capacity(before);
    table.rows_mut().retain(|row| seen.insert(row.clone()));
    before - table.len()
}

// ---------------------------------------------------------------------------
// Mean imputation
// ---------------------------------------------------------------------------

/// Per-column outcome of [`fill_missing_with_mean`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFill {
    pub column: String,
    pub mean: f64,
    pub filled: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillReport {
    pub columns: Vec<ColumnFill>,
}

impl FillReport {
    pub fn total_filled(&self) -> usize {
        self.columns.iter().map(|c| c.filled).sum()
    }
}

/// Replace missing cells of every numeric column with the mean of that
/// column's non-missing values.
///
/// * Non-numeric columns are left alone.
/// * A column with no observed values has no mean and stays missing.
/// * Integers in an imputed column become floats.
pub fn fill_missing_with_mean(table: &mut DataTable) -> FillReport {
    let mut report = FillReport::default();

    for idx in table.numeric_columns() {
        let (sum, count, missing) = table.column_values(idx).fold(
            (0.0_f64, 0_usize, 0_usize),
            |(sum, count, missing), v| match v.as_f64() {
                Some(x) if !x.is_nan() => (sum + x, count + 1, missing),
                _ => (sum, count, missing + 1),
            },
        );
        if missing == 0 || count == 0 {
            continue;
        }

        let mean = sum / count as f64;
        table.promote_to_float(idx);
        for row in table.rows_mut().iter_mut() {
            if row[idx].is_missing() {
                row[idx] = CellValue::Float(mean);
            }
        }

        report.columns.push(ColumnFill {
            column: table.columns()[idx].clone(),
            mean,
            filled: missing,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.into())
    }

    fn table() -> DataTable {
        DataTable::new(
            vec!["name".into(), "score".into(), "age".into(), "note".into()],
            vec![
                vec![s("ann"), CellValue::Float(80.0), CellValue::Integer(30), CellValue::Null],
                vec![s("bob"), CellValue::Null, CellValue::Integer(40), s("late")],
                vec![s("ann"), CellValue::Float(80.0), CellValue::Integer(30), CellValue::Null],
                vec![s("cyd"), CellValue::Float(90.0), CellValue::Null, s("ok")],
                vec![s("bob"), CellValue::Null, CellValue::Integer(40), s("late")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn drops_duplicates_keeping_first() {
        let mut t = table();
        assert_eq!(drop_duplicates(&mut t), 2);
        let names: Vec<String> = t.column_values(0).map(|v| v.to_string()).collect();
        assert_eq!(names, vec!["ann", "bob", "cyd"]);
    }

    #[test]
    fn drop_duplicates_is_idempotent() {
        let mut once = table();
        drop_duplicates(&mut once);
        let mut twice = once.clone();
        assert_eq!(drop_duplicates(&mut twice), 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn fills_numeric_columns_with_mean() {
        let mut t = table();
        let report = fill_missing_with_mean(&mut t);

        // score: mean of 80, 80, 90
        let score_mean = 250.0 / 3.0;
        assert_eq!(t.rows()[1][1], CellValue::Float(score_mean));
        assert_eq!(t.rows()[4][1], CellValue::Float(score_mean));
        assert_eq!(t.rows()[0][1], CellValue::Float(80.0));

        // age: mean of 30, 40, 30, 40 and integers promoted
        assert_eq!(t.rows()[3][2], CellValue::Float(35.0));
        assert_eq!(t.rows()[0][2], CellValue::Float(30.0));

        // text column untouched
        assert_eq!(t.rows()[0][3], CellValue::Null);

        assert_eq!(report.total_filled(), 3);
        assert_eq!(report.columns[0].column, "score");
        assert_eq!(report.columns[1].filled, 1);
    }

    #[test]
    fn no_missing_numeric_cells_after_fill() {
        let mut t = table();
        fill_missing_with_mean(&mut t);
        for idx in t.numeric_columns() {
            assert!(t.column_values(idx).all(|v| !v.is_missing()));
        }
    }

    #[test]
    fn missing_markers_from_csv_are_imputed() {
        let mut t = crate::data::loader::load_bytes(
            "m.csv",
            b"id,score\n1,10\n2,NA\n3,null\n4,20\n",
        )
        .unwrap();
        let report = fill_missing_with_mean(&mut t);
        assert_eq!(report.total_filled(), 2);
        assert_eq!(report.columns[0].column, "score");
        assert_eq!(report.columns[0].mean, 15.0);
        assert_eq!(t.rows()[1][1], CellValue::Float(15.0));
        assert_eq!(t.rows()[2][1], CellValue::Float(15.0));
    }

    #[test]
    fn all_missing_column_stays_missing() {
        let mut t = DataTable::new(
            vec!["empty".into()],
            vec![vec![CellValue::Null], vec![CellValue::Null]],
        )
        .unwrap();
        let report = fill_missing_with_mean(&mut t);
        assert!(report.columns.is_empty());
        assert!(t.column_values(0).all(CellValue::is_missing));
    }

    #[test]
    fn integer_column_without_gaps_keeps_integers() {
        let mut t = DataTable::new(
            vec!["n".into()],
            vec![vec![CellValue::Integer(1)], vec![CellValue::Integer(2)]],
        )
        .unwrap();
        fill_missing_with_mean(&mut t);
        assert_eq!(t.rows()[0][0], CellValue::Integer(1));
    }
}
