//! Plotboard - CSV Directory Dashboard & Interactive Line Plot Viewer
//!
//! Select CSV files from a directory and plot their columns as lines.

mod charts;
mod gui;

use anyhow::{anyhow, Context};
use clap::Parser;
use eframe::egui;
use gui::PlotboardApp;
use log::info;
use plotboard::conf::Config;
use plotboard::core::{setup_logging, CliArgs};

fn main() -> anyhow::Result<()> {
    setup_logging();

    let args = CliArgs::parse();
    let mut config =
        Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = args.dir {
        config.data.directory = Some(dir);
    }
    info!("Plotboard started.");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1000.0, 600.0])
            .with_title("Plotboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Plotboard",
        options,
        Box::new(|cc| Ok(Box::new(PlotboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("{}", e))
}
