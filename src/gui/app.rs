//! Plotboard Main Application
//! Main window with page routing, control panel, parameter editor and chart viewer.

use crate::charts::{ChartPlotter, StaticChartRenderer};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, ParamEditor};
use egui::{RichText, SidePanel, TopBottomPanel};
use log::{error, info, warn};
use plotboard::conf::Config;
use plotboard::data::{list_csv_files, CsvLoader, TableStore};
use plotboard::params::ParamTable;
use plotboard::session::Session;
use std::path::{Path, PathBuf};

const EXPORT_SIZE: (u32, u32) = (1400, 800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Index,
    DataViewer,
}

/// Main application window.
pub struct PlotboardApp {
    page: Page,
    session: Session,
    /// Store decoded after the last session step, used for rendering.
    store: TableStore,
    control_panel: ControlPanel,
    param_editor: ParamEditor,
    chart_viewer: ChartViewer,
}

impl PlotboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let params = ParamTable::new(
            &config.params.required_columns,
            config.params.duplicate_columns,
        );
        let session = Session::new(
            CsvLoader::new(config.data.csv.clone()),
            config.store.empty_policy.clone(),
        );

        let mut app = Self {
            page: Page::Index,
            session,
            store: TableStore::new(),
            control_panel: ControlPanel::new(),
            param_editor: ParamEditor::new(params),
            chart_viewer: ChartViewer::new(),
        };

        if let Some(dir) = &config.data.directory {
            app.control_panel.directory = dir.display().to_string();
            app.page = Page::DataViewer;
            app.handle_list_directory();
        }
        app.refresh_store();
        app
    }

    /// List the entered directory. On failure the previous list stays.
    fn handle_list_directory(&mut self) {
        let dir = PathBuf::from(self.control_panel.directory.trim());
        match list_csv_files(&dir) {
            Ok(files) => {
                info!("Listed {} CSV files in {}", files.len(), dir.display());
                let count = files.len();
                let changed = self.control_panel.update_files(files);
                self.control_panel
                    .set_status(&format!("{} CSV files found", count));
                if changed {
                    self.handle_selection_changed();
                }
            }
            Err(e) => {
                warn!("Keeping previous file list: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn handle_browse_directory(&mut self) {
        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
            self.control_panel.directory = dir.display().to_string();
            self.handle_list_directory();
        }
    }

    /// Reconcile the session with the ticked files.
    fn handle_selection_changed(&mut self) {
        let selected = self.control_panel.selected_files();

        let outcome = match self.session.select(&selected) {
            Err(e) => {
                error!("Discarding unreadable store: {}", e);
                self.session.reset(&selected)
            }
            ok => ok,
        };

        match outcome {
            Ok(report) => {
                info!(
                    "Store reconciled: added {:?}, removed {:?}",
                    report.added, report.removed
                );
                if report.failed.is_empty() {
                    self.control_panel
                        .set_status(&format!("{} files loaded", selected.len()));
                } else {
                    for (name, e) in &report.failed {
                        warn!("Could not load {}: {}", name, e);
                    }
                    let names: Vec<&str> =
                        report.failed.iter().map(|(n, _)| n.as_str()).collect();
                    self.control_panel
                        .set_status(&format!("Error: could not load {}", names.join(", ")));
                }
            }
            Err(e) => {
                error!("Could not rebuild the store: {}", e);
                self.session.restore(None);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }

        self.refresh_store();
    }

    /// Decode the session blob for rendering.
    fn refresh_store(&mut self) {
        self.store = match self.session.store() {
            Ok(store) => store,
            Err(e) => {
                error!("Stored tables are unreadable: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
                TableStore::new()
            }
        };
    }

    fn handle_export_png(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("plot.png")
            .save_file()
        else {
            return;
        };

        match StaticChartRenderer::render_png(
            &self.chart_viewer.series,
            "Data visualisation",
            &path,
            EXPORT_SIZE,
        ) {
            Ok(()) => {
                info!("Exported chart to {}", path.display());
                self.control_panel
                    .set_status(&format!("Exported {}", path.display()));
                Self::open_export(&path);
            }
            Err(e) => {
                warn!("Export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn open_export(path: &Path) {
        if let Err(e) = open::that(path) {
            warn!("Could not open {}: {}", path.display(), e);
        }
    }

    fn show_index(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(RichText::new("📊 Plotboard").size(24.0).strong());
            ui.add_space(20.0);
            if ui.link("Navigate to \"data_viewer\"").clicked() {
                self.page = Page::DataViewer;
            }
        });
    }

    fn show_data_viewer(&mut self, ctx: &egui::Context) {
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::ListDirectory => self.handle_list_directory(),
                        ControlPanelAction::BrowseDirectory => self.handle_browse_directory(),
                        ControlPanelAction::SelectionChanged => self.handle_selection_changed(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        TopBottomPanel::bottom("param_editor")
            .resizable(true)
            .min_height(160.0)
            .show(ctx, |ui| {
                egui::ScrollArea::both().show(ui, |ui| {
                    if let Err(e) = self.param_editor.show(ui, &self.store) {
                        self.control_panel.set_status(&format!("Error: {}", e));
                    }
                });
            });

        self.chart_viewer.set_series(ChartPlotter::resolve_series(
            &self.param_editor.params,
            &self.store,
        ));

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

impl eframe::App for PlotboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        TopBottomPanel::top("navigation").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.page, Page::Index, "Index");
                ui.selectable_value(&mut self.page, Page::DataViewer, "Data viewer");
            });
        });

        match self.page {
            Page::Index => {
                egui::CentralPanel::default().show(ctx, |ui| self.show_index(ui));
            }
            Page::DataViewer => self.show_data_viewer(ctx),
        }
    }
}
