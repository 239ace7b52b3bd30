//! Control Panel Widget
//! Left side panel with directory entry, file selection and export controls.

use egui::{Color32, RichText, ScrollArea};
use plotboard::data::table_name;
use std::path::PathBuf;

/// Left side control panel with directory browsing and file selection.
pub struct ControlPanel {
    pub directory: String,
    pub files: Vec<PathBuf>,
    pub selected: Vec<bool>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            directory: String::new(),
            files: Vec::new(),
            selected: Vec::new(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the file list, keeping the selection of files still listed.
    /// Returns whether the selection changed.
    pub fn update_files(&mut self, files: Vec<PathBuf>) -> bool {
        let previous = self.selected_files();
        self.selected = files.iter().map(|f| previous.contains(f)).collect();
        self.files = files;
        self.selected_files() != previous
    }

    /// Files currently ticked, in listing order.
    pub fn selected_files(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .zip(self.selected.iter())
            .filter(|(_, &selected)| selected)
            .map(|(file, _)| file.clone())
            .collect()
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // ===== Directory Section =====
        ui.label(RichText::new("📁 Data Directory").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.directory)
                    .hint_text("/path/to/csv/files")
                    .desired_width(190.0),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                action = ControlPanelAction::ListDirectory;
            }
            if ui.button("📂 Browse").clicked() {
                action = ControlPanelAction::BrowseDirectory;
            }
        });
        if ui.small_button("⟳ Refresh").clicked() {
            action = ControlPanelAction::ListDirectory;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== File Selection Section =====
        ui.label(RichText::new("🗂 Files").size(14.0).strong());
        ui.add_space(5.0);

        if self.files.is_empty() {
            ui.label(RichText::new("No CSV files listed").color(Color32::GRAY));
        } else {
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(5.0)
                .show(ui, |ui| {
                    ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                        for (file, selected) in self.files.iter().zip(self.selected.iter_mut()) {
                            let name = table_name(file).unwrap_or_default();
                            if ui.checkbox(selected, name).changed() {
                                action = ControlPanelAction::SelectionChanged;
                            }
                        }
                    });
                });

            ui.add_space(5.0);
            ui.horizontal(|ui| {
                if ui.small_button("Select All").clicked() {
                    self.selected.iter_mut().for_each(|v| *v = true);
                    action = ControlPanelAction::SelectionChanged;
                }
                if ui.small_button("Clear All").clicked() {
                    self.selected.iter_mut().for_each(|v| *v = false);
                    action = ControlPanelAction::SelectionChanged;
                }
            });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                .min_size(egui::vec2(150.0, 30.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::ExportPng;
            }
        });

        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    ListDirectory,
    BrowseDirectory,
    SelectionChanged,
    ExportPng,
}
