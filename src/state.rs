use std::path::Path;

use anyhow::Result;

use crate::config::AppConfig;
use crate::data::chart::ChartData;
use crate::data::clean::{FillReport, drop_duplicates, fill_missing_with_mean};
use crate::data::export::{ExportFormat, ExportedFile, export};
use crate::data::loader::{display_name, load_bytes, load_file};
use crate::data::model::DataTable;
use crate::error::SweepError;

// ---------------------------------------------------------------------------
// Per-file session
// ---------------------------------------------------------------------------

/// One loaded file and the UI choices made for it.
#[derive(Debug, Clone)]
pub struct FileSession {
    pub name: String,
    pub size_bytes: usize,
    /// Current table, including any cleaning applied so far.
    pub table: DataTable,
    /// Parallel to `table.columns()`: whether each column is kept.
    pub selected: Vec<bool>,
    /// "Clean Data" checkbox.
    pub cleaning_open: bool,
    /// "Show Visualization" checkbox.
    pub show_chart: bool,
    pub export_format: ExportFormat,
    /// Last action feedback shown under the file.
    pub message: Option<String>,
}

impl FileSession {
    pub fn new(name: String, size_bytes: usize, table: DataTable) -> Self {
        let selected = vec![true; table.columns().len()];
        Self {
            name,
            size_bytes,
            table,
            selected,
            cleaning_open: false,
            show_chart: false,
            export_format: ExportFormat::default(),
            message: None,
        }
    }

    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }

    pub fn remove_duplicates(&mut self) -> usize {
        let removed = drop_duplicates(&mut self.table);
        log::info!("{}: removed {removed} duplicate rows", self.name);
        self.message = Some("Duplicates Removed!".into());
        removed
    }

    pub fn fill_missing(&mut self) -> FillReport {
        let report = fill_missing_with_mean(&mut self.table);
        log::info!(
            "{}: filled {} missing values in {} columns",
            self.name,
            report.total_filled(),
            report.columns.len()
        );
        for fill in &report.columns {
            log::debug!("{}: {} ← mean {:.4} ({} cells)", self.name, fill.column, fill.mean, fill.filled);
        }
        self.message = Some("Missing Values Have Been Filled!".into());
        report
    }

    pub fn toggle_column(&mut self, idx: usize) {
        if let Some(flag) = self.selected.get_mut(idx) {
            *flag = !*flag;
        }
    }

    pub fn select_all(&mut self) {
        self.selected.iter_mut().for_each(|f| *f = true);
    }

    pub fn select_none(&mut self) {
        self.selected.iter_mut().for_each(|f| *f = false);
    }

    /// Names of the kept columns, in table order.
    pub fn selected_columns(&self) -> Vec<&str> {
        self.table
            .columns()
            .iter()
            .zip(&self.selected)
            .filter(|(_, keep)| **keep)
            .map(|(c, _)| c.as_str())
            .collect()
    }

    /// Positions of the kept columns.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected
            .iter()
            .enumerate()
            .filter(|(_, keep)| **keep)
            .map(|(i, _)| i)
            .collect()
    }

    /// The table restricted to the kept columns.
    pub fn selected_table(&self) -> DataTable {
        self.table.select_indices(&self.selected_indices())
    }

    pub fn chart(&self, max_series: usize) -> Option<ChartData> {
        ChartData::from_table(&self.selected_table(), max_series)
    }

    /// Convert the kept columns into the chosen format.
    pub fn export(&self) -> Result<ExportedFile> {
        export(&self.selected_table(), &self.name, self.export_format)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    pub config: AppConfig,

    /// Successfully loaded files, in load order.
    pub files: Vec<FileSession>,

    /// Messages for files that were skipped.
    pub errors: Vec<String>,

    /// Status message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Load a file from disk. Failures are recorded and the file is skipped.
    pub fn load_path(&mut self, path: &Path) -> bool {
        let size = std::fs::metadata(path).map(|m| m.len() as usize).unwrap_or(0);
        let result = load_file(path);
        self.accept(display_name(path), size, result)
    }

    /// Parse an in-memory file. Failures are recorded and the file is skipped.
    pub fn load_bytes(&mut self, name: String, bytes: &[u8]) -> bool {
        let result = load_bytes(&name, bytes);
        self.accept(name, bytes.len(), result)
    }

    fn accept(&mut self, name: String, size: usize, result: Result<DataTable, SweepError>) -> bool {
        match result {
            Ok(table) => {
                log::info!(
                    "Loaded {name}: {} rows, columns {:?}",
                    table.len(),
                    table.columns()
                );
                self.files.push(FileSession::new(name, size, table));
                true
            }
            Err(e) => {
                self.skip_file(e);
                false
            }
        }
    }

    fn skip_file(&mut self, err: SweepError) {
        log::warn!("Skipping file: {err}");
        self.errors.push(err.to_string());
    }

    pub fn remove_file(&mut self, idx: usize) {
        if idx < self.files.len() {
            let removed = self.files.remove(idx);
            log::info!("Closed {}", removed.name);
        }
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Banner shown once the per-file sections are drawn.
    pub fn summary(&self) -> &'static str {
        if self.files.is_empty() {
            "Please load a file to begin."
        } else {
            "All files processed!"
        }
    }
}
