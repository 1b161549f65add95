// Desktop dashboard for the BEL and ALM workbook
#![allow(non_snake_case)]

use anyhow::Context;
use clap::Parser;
use dioxus::prelude::*;
use dioxus_desktop::{Config as DesktopConfig, LogicalSize, WindowBuilder};
use engine::config::EngineSettings;
use std::path::PathBuf;

mod app;
mod components;
mod config;
mod state;

use app::App;
use config::AppConfig;
use state::app_state::AppState;

#[derive(Parser, Debug)]
#[command(name = "bel-dashboard", version, about = "Interactive BEL and ALM duration dashboard")]
struct Args {
    /// Workbook to open (defaults to the configured path)
    #[arg(long)]
    workbook: Option<PathBuf>,

    /// Engine settings overriding the built-in sheet layout
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window, chart and palette settings
    #[arg(long)]
    ui_config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let engine_settings = match &args.config {
        Some(path) => EngineSettings::load_from_path(path).with_context(|| format!("reading {}", path.display()))?,
        None => EngineSettings::load_default()?,
    };
    let app_config = match &args.ui_config {
        Some(path) => AppConfig::load_from_path(path).with_context(|| format!("reading {}", path.display()))?,
        None => AppConfig::load_default()?,
    };
    tracing::info!("Loaded GUI configuration version {}", app_config.version);

    let workbook = args.workbook.unwrap_or_else(|| engine_settings.workbook_path.clone());
    tracing::info!(workbook = %workbook.display(), "Starting dashboard");

    let desktop_config = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title(app_config.app.title.clone())
            .with_inner_size(LogicalSize::new(app_config.app.window_width, app_config.app.window_height)),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_config)
        .with_context(AppState::new(workbook, engine_settings, app_config))
        .launch(App);
    Ok(())
}
