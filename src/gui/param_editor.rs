//! Parameter Editor Widget
//! Editable grid of plot parameter rows with dropdowns fed by the table store.

use crate::charts::INDEX_AXIS;
use egui::{ComboBox, Grid, RichText};
use plotboard::data::TableStore;
use plotboard::params::{column_options, file_options, LineMode, ParamError, ParamTable};

const CELL_WIDTH: f32 = 110.0;

pub struct ParamEditor {
    pub params: ParamTable,
    new_column: String,
}

impl ParamEditor {
    pub fn new(params: ParamTable) -> Self {
        Self {
            params,
            new_column: String::new(),
        }
    }

    /// Draw the editor. Returns an error when a column edit was refused.
    pub fn show(&mut self, ui: &mut egui::Ui, store: &TableStore) -> Result<(), ParamError> {
        let columns = self.params.columns().to_vec();
        let files = file_options(store);
        let mut remove_row = None;
        let mut remove_column = None;

        ui.label(RichText::new("⚙️ Plot Parameters").size(14.0).strong());
        ui.add_space(5.0);

        Grid::new("param_table").striped(true).show(ui, |ui| {
            for column in &columns {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(column).strong());
                    if !self.params.is_required(column) && ui.small_button("✖").clicked() {
                        remove_column = Some(column.clone());
                    }
                });
            }
            ui.end_row();

            for row in 0..self.params.row_count() {
                let file = self.params.get(row, "file").unwrap_or("").to_string();

                for column in &columns {
                    let id = format!("param_{}_{}", row, column);
                    let Some(cell) = self.params.cell_mut(row, column) else {
                        ui.label("");
                        continue;
                    };

                    match column.as_str() {
                        "file" => Self::dropdown(ui, &id, cell, &files),
                        "x" => {
                            let mut options = vec![INDEX_AXIS.to_string()];
                            options.extend(column_options(store, &file));
                            Self::dropdown(ui, &id, cell, &options);
                        }
                        "y" => Self::dropdown(ui, &id, cell, &column_options(store, &file)),
                        "mode" => {
                            let modes: Vec<String> =
                                LineMode::ALL.iter().map(|m| m.as_str().to_string()).collect();
                            Self::dropdown(ui, &id, cell, &modes);
                        }
                        _ => {
                            ui.add(egui::TextEdit::singleline(cell).desired_width(CELL_WIDTH));
                        }
                    }
                }

                if ui.small_button("🗑").clicked() {
                    remove_row = Some(row);
                }
                ui.end_row();
            }
        });

        ui.add_space(8.0);

        let mut result = Ok(());
        ui.horizontal(|ui| {
            if ui.button("➕ Add Row").clicked() {
                self.params.add_row();
            }
            ui.separator();
            ui.add(
                egui::TextEdit::singleline(&mut self.new_column)
                    .hint_text("column name")
                    .desired_width(CELL_WIDTH),
            );
            if ui.button("➕ Add Column").clicked() {
                result = self.params.add_column(&self.new_column);
                if result.is_ok() {
                    self.new_column.clear();
                }
            }
        });

        if let Some(row) = remove_row {
            self.params.remove_row(row)?;
        }
        if let Some(column) = remove_column {
            self.params.remove_column(&column)?;
        }
        result
    }

    fn dropdown(ui: &mut egui::Ui, id: &str, value: &mut String, options: &[String]) {
        ComboBox::from_id_salt(id)
            .width(CELL_WIDTH)
            .selected_text(value.as_str())
            .show_ui(ui, |ui| {
                for option in options {
                    ui.selectable_value(value, option.clone(), option.as_str());
                }
            });
    }
}
