//! Chart Viewer Widget
//! Central panel showing the line chart for the current parameter rows.

use crate::charts::{ChartPlotter, ChartSeries};
use egui::RichText;

/// Holds the series resolved at the last render step.
#[derive(Default)]
pub struct ChartViewer {
    pub series: Vec<ChartSeries>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_series(&mut self, series: Vec<ChartSeries>) {
        self.series = series;
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Data visualisation").size(18.0).strong());
        ui.add_space(8.0);
        ChartPlotter::draw_line_chart(ui, &self.series);
    }
}
