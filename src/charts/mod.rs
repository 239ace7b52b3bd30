//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, ChartSeries, INDEX_AXIS};
pub use renderer::StaticChartRenderer;
