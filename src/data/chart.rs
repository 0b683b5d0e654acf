use super::model::DataTable;

/// One numeric column prepared for a bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    /// `(row index, value)`; missing cells are skipped.
    pub bars: Vec<(f64, f64)>,
}

/// Bar chart input: up to `max_series` numeric columns, indexed by row.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    /// Take the first `max_series` numeric columns of `table`.
    /// Returns `None` when the table has no numeric column.
    pub fn from_table(table: &DataTable, max_series: usize) -> Option<Self> {
        let series: Vec<ChartSeries> = table
            .numeric_columns()
            .into_iter()
            .take(max_series)
            .map(|idx| ChartSeries {
                name: table.columns()[idx].clone(),
                bars: table
                    .column_values(idx)
                    .enumerate()
                    .filter_map(|(row, v)| {
                        v.as_f64().filter(|x| !x.is_nan()).map(|x| (row as f64, x))
                    })
                    .collect(),
            })
            .collect();

        if series.is_empty() {
            None
        } else {
            Some(ChartData { series })
        }
    }
}
