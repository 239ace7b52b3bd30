//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;
mod param_editor;

pub use app::PlotboardApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use param_editor::ParamEditor;
