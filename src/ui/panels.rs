use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::export::ExportFormat;
use crate::data::model::DataTable;
use crate::state::{AppState, FileSession};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(!state.files.is_empty(), egui::Button::new("Close all"))
                .clicked()
            {
                state.files.clear();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!("{} file(s) loaded", state.files.len()));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(msg);
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – one section per file
// ---------------------------------------------------------------------------

/// Render the title, skipped-file errors and every loaded file.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Sweeper");
    ui.label("Transform your files between CSV and Excel formats with built-in visualization!");
    ui.label("Open CSV or Excel files from the File menu, or drop them onto this window.");
    ui.add_space(6.0);

    if !state.errors.is_empty() {
        for err in &state.errors {
            ui.label(RichText::new(err).color(Color32::RED));
        }
        if ui.small_button("Dismiss").clicked() {
            state.clear_errors();
        }
        ui.separator();
    }

    let preview_rows = state.config.preview_rows;
    let max_series = state.config.chart_max_series;
    let mut to_close = None;
    let mut status = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (idx, file) in state.files.iter_mut().enumerate() {
                ui.push_id(idx, |ui: &mut Ui| {
                    let outcome = file_section(ui, file, preview_rows, max_series);
                    if outcome.close {
                        to_close = Some(idx);
                    }
                    if outcome.status.is_some() {
                        status = outcome.status;
                    }
                });
                ui.separator();
            }

            let summary = state.summary();
            if state.files.is_empty() {
                ui.label(RichText::new(summary).color(Color32::LIGHT_BLUE));
            } else {
                ui.label(RichText::new(summary).color(Color32::GREEN).strong());
            }
        });

    if let Some(idx) = to_close {
        state.remove_file(idx);
    }
    if status.is_some() {
        state.status_message = status;
    }
}

#[derive(Default)]
struct SectionOutcome {
    close: bool,
    status: Option<String>,
}

fn file_section(
    ui: &mut Ui,
    file: &mut FileSession,
    preview_rows: usize,
    max_series: usize,
) -> SectionOutcome {
    let mut outcome = SectionOutcome::default();

    // ---- File info ----
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("File Name:").strong());
        ui.label(&file.name);
        ui.separator();
        ui.label(RichText::new("File Size:").strong());
        ui.label(format!("{:.2} KB", file.size_kb()));
        ui.separator();
        ui.label(format!("{} rows × {} columns", file.table.len(), file.table.columns().len()));
        if ui.small_button("✖").on_hover_text("Close file").clicked() {
            outcome.close = true;
        }
    });

    ui.label("Preview the Head of the DataFrame");
    preview_table(ui, &file.table, preview_rows);

    // ---- Cleaning ----
    ui.add_space(4.0);
    ui.strong("Data Cleaning Options");
    ui.checkbox(&mut file.cleaning_open, format!("Clean Data for {}", file.name));
    if file.cleaning_open {
        ui.columns(2, |cols: &mut [Ui]| {
            if cols[0]
                .button(format!("Remove Duplicates from {}", file.name))
                .clicked()
            {
                file.remove_duplicates();
            }
            if cols[1]
                .button(format!("Fill Missing Values for {}", file.name))
                .clicked()
            {
                file.fill_missing();
            }
        });
        if let Some(msg) = &file.message {
            ui.label(RichText::new(msg).color(Color32::GREEN));
        }
    }

    // ---- Column selection ----
    ui.add_space(4.0);
    ui.strong("Select Columns to Convert");
    let columns = file.table.columns().to_vec();
    egui::CollapsingHeader::new(format!(
        "Choose Columns for {}  ({}/{})",
        file.name,
        file.selected_columns().len(),
        columns.len()
    ))
    .id_salt("columns")
    .default_open(false)
    .show(ui, |ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            if ui.small_button("All").clicked() {
                file.select_all();
            }
            if ui.small_button("None").clicked() {
                file.select_none();
            }
        });
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for (i, col) in columns.iter().enumerate() {
                let mut checked = file.selected[i];
                if ui.checkbox(&mut checked, col).changed() {
                    file.toggle_column(i);
                }
            }
        });
    });

    // ---- Visualization ----
    ui.add_space(4.0);
    ui.strong("Data Visualization");
    ui.checkbox(&mut file.show_chart, format!("Show Visualization for {}", file.name));
    if file.show_chart {
        match file.chart(max_series) {
            Some(chart) => plot::bar_chart(ui, "bar_chart", &chart),
            None => {
                ui.label(
                    RichText::new("No numeric columns available for visualization.")
                        .color(Color32::YELLOW),
                );
            }
        }
    }

    // ---- Conversion ----
    ui.add_space(4.0);
    ui.strong("Conversion Options");
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("Convert {} to:", file.name));
        for format in ExportFormat::ALL {
            ui.radio_value(&mut file.export_format, format, format.label());
        }
    });
    if ui.button(format!("Convert {}", file.name)).clicked() {
        outcome.status = Some(save_export(file));
    }

    outcome
}

/// Head of the table in a striped grid.
fn preview_table(ui: &mut Ui, table: &DataTable, n: usize) {
    if table.columns().is_empty() {
        ui.label("(no columns)");
        return;
    }
    if table.is_empty() {
        ui.label("(no rows)");
        return;
    }
    let head = table.head(n);

    ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .id_salt("preview")
                .striped(true)
                .vscroll(false)
                .columns(Column::auto().at_least(60.0).resizable(true), table.columns().len())
                .header(20.0, |mut header| {
                    for name in table.columns() {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, head.len(), |mut row| {
                        let cells = &head[row.index()];
                        for cell in cells {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                });
        });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Upload Your Files (CSV or Excel)")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .pick_files();

    for path in files.unwrap_or_default() {
        state.load_path(&path);
    }
}

/// Convert the file and ask where to save it. Returns a status line.
fn save_export(file: &FileSession) -> String {
    let exported = match file.export() {
        Ok(out) => out,
        Err(e) => {
            log::error!("Failed to convert {}: {e:#}", file.name);
            return format!("Error converting {}: {e:#}", file.name);
        }
    };

    let format = file.export_format;
    let target: Option<PathBuf> = rfd::FileDialog::new()
        .set_title(format!("Download {} as {}", file.name, format.label()))
        .set_file_name(&exported.file_name)
        .add_filter(format.label(), &[format.extension()])
        .save_file();

    let Some(path) = target else {
        return format!("Conversion of {} cancelled", file.name);
    };

    match std::fs::write(&path, &exported.bytes) {
        Ok(()) => {
            log::info!(
                "Saved {} ({}, {} bytes) to {}",
                exported.file_name,
                exported.mime_type,
                exported.bytes.len(),
                path.display()
            );
            format!("Saved {}", path.display())
        }
        Err(e) => {
            log::error!("Failed to write {}: {e}", path.display());
            format!("Error: could not write {}: {e}", path.display())
        }
    }
}
