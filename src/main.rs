mod app;
mod config;
mod data;
mod error;
mod grading;
mod registry;
mod session;
mod state;
mod theme;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use app::GradeLookupApp;
use config::Settings;
use data::loader::{HttpFetcher, Loader};
use eframe::egui;
use registry::Registry;
use session::GradeService;

fn main() -> Result<()> {
    env_logger::init();

    let settings = Settings::from_env().context("reading settings")?;
    let fetcher = HttpFetcher::new(settings.http_timeout)?;
    let service = Arc::new(GradeService::new(Registry::from_env(), Loader::new(fetcher)));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 820.0])
            .with_min_inner_size([480.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sistema de Consulta de Notas",
        options,
        Box::new(|_cc| Ok(Box::new(GradeLookupApp::new(service)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
