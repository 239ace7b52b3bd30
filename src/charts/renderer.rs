//! Static Chart Renderer
//! Writes the current line chart to a PNG file with plotters.

use crate::charts::{ChartPlotter, ChartSeries};
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No data to render")]
    NoData,
    #[error("Drawing failed: {0}")]
    DrawError(String),
}

fn draw_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::DrawError(err.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Axis ranges covering every finite point, padded when a range is degenerate.
    pub fn bounds(series: &[ChartSeries]) -> Option<(Range<f64>, Range<f64>)> {
        let mut points = series
            .iter()
            .flat_map(|s| s.points.iter())
            .filter(|p| p[0].is_finite() && p[1].is_finite());
        let first = points.next()?;
        let (mut x_min, mut x_max) = (first[0], first[0]);
        let (mut y_min, mut y_max) = (first[1], first[1]);

        for p in points {
            x_min = x_min.min(p[0]);
            x_max = x_max.max(p[0]);
            y_min = y_min.min(p[1]);
            y_max = y_max.max(p[1]);
        }

        let pad = |min: f64, max: f64| {
            if max > min {
                min..max
            } else {
                (min - 1.0)..(max + 1.0)
            }
        };
        Some((pad(x_min, x_max), pad(y_min, y_max)))
    }

    /// Render all series into a PNG at `path`.
    pub fn render_png(
        series: &[ChartSeries],
        title: &str,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let (x_range, y_range) = Self::bounds(series).ok_or(RenderError::NoData)?;
        let time_axis = series.iter().all(|s| s.x_is_time);

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .map_err(draw_err)?;

        let format_x = |x: &f64| {
            if time_axis {
                ChartPlotter::format_time(*x)
            } else {
                format!("{}", x)
            }
        };
        chart
            .configure_mesh()
            .x_label_formatter(&format_x)
            .draw()
            .map_err(draw_err)?;

        for s in series {
            let color = RGBColor(s.color.r(), s.color.g(), s.color.b());
            let points: Vec<(f64, f64)> = s
                .points
                .iter()
                .filter(|p| p[0].is_finite() && p[1].is_finite())
                .map(|p| (p[0], p[1]))
                .collect();

            if s.mode.draws_line() {
                chart
                    .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                    .map_err(draw_err)?
                    .label(s.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
            if s.mode.draws_markers() {
                let markers = chart
                    .draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))
                    .map_err(draw_err)?;
                if !s.mode.draws_line() {
                    markers
                        .label(s.label.as_str())
                        .legend(move |(x, y)| Circle::new((x + 10, y), 3, color.filled()));
                }
            }
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }
}
