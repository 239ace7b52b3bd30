//! Chart Plotter Module
//! Resolves parameter rows into plottable series and draws them with egui_plot.

use egui::{Color32, RichText};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};
use plotboard::data::{ColumnData, TableStore};
use plotboard::params::{LineMode, ParamTable};

/// Special `x` value selecting the table index instead of a column.
pub const INDEX_AXIS: &str = "index";

/// Color palette for series without an explicit color
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

/// One line of the chart, resolved from a parameter row.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<[f64; 2]>,
    pub mode: LineMode,
    pub color: Color32,
    /// X values are epoch milliseconds.
    pub x_is_time: bool,
}

/// Creates line charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Parse `#rrggbb` or a basic color name.
    pub fn parse_color(value: &str) -> Option<Color32> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            if hex.len() != 6 {
                return None;
            }
            let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
            return Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        match value.to_ascii_lowercase().as_str() {
            "black" => Some(Color32::BLACK),
            "white" => Some(Color32::WHITE),
            "gray" | "grey" => Some(Color32::GRAY),
            "red" => Some(PALETTE[1]),
            "green" => Some(PALETTE[2]),
            "blue" => Some(PALETTE[0]),
            "purple" => Some(PALETTE[3]),
            "orange" => Some(PALETTE[4]),
            "teal" => Some(PALETTE[5]),
            "pink" => Some(PALETTE[6]),
            "cyan" => Some(PALETTE[7]),
            "brown" => Some(PALETTE[8]),
            "yellow" => Some(Color32::YELLOW),
            _ => None,
        }
    }

    /// Build one series per complete parameter row.
    ///
    /// Rows whose file is not loaded, or whose `y` column is missing or not
    /// numeric, are skipped. Non-finite points are dropped. A blank `x` or `index` plots against the index;
    /// a text x column plots against row position.
    pub fn resolve_series(params: &ParamTable, store: &TableStore) -> Vec<ChartSeries> {
        let mut series = Vec::new();

        for row in 0..params.row_count() {
            let field = |column: &str| params.get(row, column).unwrap_or("").trim();
            let file = field("file");
            let y_name = field("y");
            if file.is_empty() || y_name.is_empty() || !store.contains(file) {
                continue;
            }

            let none: [&str; 0] = [];
            let table = store.get(file, &none);
            let Some(y) = table.column(y_name).filter(|c| c.data.is_numeric()) else {
                continue;
            };

            let x_name = field("x");
            let x = if x_name.is_empty() || x_name == INDEX_AXIS {
                &table.index().data
            } else {
                match table.column(x_name) {
                    Some(column) => &column.data,
                    None => continue,
                }
            };

            let points = (0..table.height())
                .filter_map(|i| {
                    let x_value = if x.is_numeric() { x.get_f64(i)? } else { i as f64 };
                    Some([x_value, y.data.get_f64(i)?])
                })
                .filter(|p| p[0].is_finite() && p[1].is_finite())
                .collect();

            let label = match params.get(row, "name").map(str::trim) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => format!("{}: {}", file, y_name),
            };

            series.push(ChartSeries {
                label,
                points,
                mode: LineMode::parse(field("mode")),
                color: Self::parse_color(field("color"))
                    .unwrap_or(PALETTE[series.len() % PALETTE.len()]),
                x_is_time: matches!(x, ColumnData::Timestamp(_)),
            });
        }

        series
    }

    /// Render epoch milliseconds as a calendar date.
    pub fn format_time(millis: f64) -> String {
        chrono::DateTime::from_timestamp_millis(millis.round() as i64)
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    /// Draw all series on one interactive plot
    pub fn draw_line_chart(ui: &mut egui::Ui, series: &[ChartSeries]) {
        if series.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        let time_axis = series.iter().all(|s| s.x_is_time);

        let mut plot = Plot::new("line_chart")
            .legend(Legend::default())
            .allow_scroll(false)
            .y_axis_label("Value");
        if time_axis {
            plot = plot
                .x_axis_label("Date")
                .x_axis_formatter(|mark, _range| Self::format_time(mark.value));
        }

        plot.show(ui, |plot_ui| {
            for s in series {
                if s.mode.draws_line() {
                    plot_ui.line(
                        Line::new(PlotPoints::from(s.points.clone()))
                            .color(s.color)
                            .width(1.5)
                            .name(&s.label),
                    );
                }
                if s.mode.draws_markers() {
                    plot_ui.points(
                        Points::new(PlotPoints::from(s.points.clone()))
                            .radius(3.0)
                            .color(s.color)
                            .name(&s.label),
                    );
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotboard::data::{Column, Index, Table};
    use plotboard::params::DuplicateColumnPolicy;

    fn store() -> TableStore {
        let sales = Table::with_index(
            Index {
                name: Some("Date".to_string()),
                data: ColumnData::Timestamp(vec![Some(0), Some(86_400_000), Some(172_800_000)]),
            },
            vec![
                Column::new("Value", ColumnData::Float(vec![Some(1.0), None, Some(3.0)])),
                Column::new(
                    "Region",
                    ColumnData::Str(vec![
                        Some("n".to_string()),
                        Some("s".to_string()),
                        Some("e".to_string()),
                    ]),
                ),
            ],
        )
        .unwrap();

        let mut store = TableStore::new();
        store.insert("sales", sales);
        store
    }

    fn params(rows: &[[&str; 5]]) -> ParamTable {
        let mut params = ParamTable::default();
        for (i, row) in rows.iter().enumerate() {
            params.add_row();
            for (column, value) in ["file", "x", "y", "mode", "color"].iter().zip(row) {
                params.set(i, column, *value).unwrap();
            }
        }
        params
    }

    #[test]
    fn parse_colors() {
        assert_eq!(
            ChartPlotter::parse_color("#ff8000"),
            Some(Color32::from_rgb(255, 128, 0))
        );
        assert_eq!(ChartPlotter::parse_color("Black"), Some(Color32::BLACK));
        assert_eq!(ChartPlotter::parse_color("#ff80"), None);
        assert_eq!(ChartPlotter::parse_color("#gg0000"), None);
        assert_eq!(ChartPlotter::parse_color(""), None);
    }

    #[test]
    fn resolves_series_against_index() {
        let series = ChartPlotter::resolve_series(
            &params(&[["sales", "", "Value", "markers", "red"]]),
            &store(),
        );

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "sales: Value");
        assert_eq!(series[0].points, vec![[0.0, 1.0], [172_800_000.0, 3.0]]);
        assert_eq!(series[0].mode, LineMode::Markers);
        assert_eq!(series[0].color, PALETTE[1]);
        assert!(series[0].x_is_time);
    }

    #[test]
    fn text_x_column_plots_by_position() {
        let series = ChartPlotter::resolve_series(
            &params(&[["sales", "Region", "Value", "", ""]]),
            &store(),
        );

        assert_eq!(series[0].points, vec![[0.0, 1.0], [2.0, 3.0]]);
        assert!(!series[0].x_is_time);
        assert_eq!(series[0].color, PALETTE[0]);
    }

    #[test]
    fn infinite_values_are_dropped() {
        let mut store = TableStore::new();
        store.insert(
            "wild",
            Table::new(vec![Column::new(
                "v",
                ColumnData::Float(vec![Some(1.0), Some(f64::INFINITY), Some(f64::NEG_INFINITY), Some(2.0)]),
            )])
            .unwrap(),
        );

        let series =
            ChartPlotter::resolve_series(&params(&[["wild", "", "v", "", ""]]), &store);

        assert_eq!(series[0].points, vec![[0.0, 1.0], [3.0, 2.0]]);
    }

    #[test]
    fn incomplete_rows_are_skipped() {
        let series = ChartPlotter::resolve_series(
            &params(&[
                ["", "", "Value", "", ""],
                ["costs", "", "Value", "", ""],
                ["sales", "", "Region", "", ""],
                ["sales", "Missing", "Value", "", ""],
                ["sales", "", "", "", ""],
            ]),
            &store(),
        );

        assert!(series.is_empty());
    }

    #[test]
    fn name_column_overrides_label() {
        let mut params = ParamTable::new(&["file", "x", "y"], DuplicateColumnPolicy::Reject);
        params.add_column("name").unwrap();
        params.add_row();
        params.set(0, "file", "sales").unwrap();
        params.set(0, "y", "Value").unwrap();
        params.set(0, "name", "Revenue").unwrap();

        let series = ChartPlotter::resolve_series(&params, &store());

        assert_eq!(series[0].label, "Revenue");
        assert_eq!(series[0].mode, LineMode::Lines);
    }

    #[test]
    fn formats_epoch_millis_as_date() {
        assert_eq!(ChartPlotter::format_time(86_400_000.0), "1970-01-02");
    }
}
