use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::series_palette;
use crate::data::chart::ChartData;

// ---------------------------------------------------------------------------
// Bar chart (per-file visualization)
// ---------------------------------------------------------------------------

/// Total width shared by the bars of one row.
const GROUP_WIDTH: f64 = 0.8;

/// Render `chart` as grouped bars, one group per row of the table.
pub fn bar_chart(ui: &mut Ui, id: impl std::hash::Hash, chart: &ChartData) {
    let n = chart.series.len().max(1);
    let bar_width = GROUP_WIDTH / n as f64;
    let colors = series_palette(chart.series.len());

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label("Row")
        .height(280.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (i, (series, color)) in chart.series.iter().zip(colors).enumerate() {
                // Centre the group on the row index.
                let offset = (i as f64 + 0.5) * bar_width - GROUP_WIDTH / 2.0;
                let bars: Vec<Bar> = series
                    .bars
                    .iter()
                    .map(|&(row, value)| {
                        Bar::new(row + offset, value)
                            .width(bar_width)
                            .name(format!("{} [{}]", series.name, row as usize))
                    })
                    .collect();

                plot_ui.bar_chart(BarChart::new(bars).name(&series.name).color(color));
            }
        });
}
