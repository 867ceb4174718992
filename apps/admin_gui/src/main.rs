use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{load_settings, ClientSettings, ConfigError};
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::{controller::events::UiError, ui::AdminApp};

#[derive(Parser, Debug)]
#[command(name = "ereport-admin-gui", about = "Desktop admin client for e-Report")]
struct Args {
    /// Settings file. Defaults to ./ereport.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_base_url: Option<String>,
    /// Route to open first, e.g. `/dashboard` or `/reports/attendance/3`.
    #[arg(long, default_value = "/")]
    route: String,
}

fn startup_settings(args: &Args) -> Result<ClientSettings, ConfigError> {
    let mut raw = load_settings(args.config.as_deref())?;
    if let Some(url) = &args.api_base_url {
        raw.api_base_url = Some(url.clone());
    }
    raw.validate()
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    // Configuration problems are shown in place of the first page.
    let settings = startup_settings(&args).map_err(|err| {
        tracing::error!(error = %err, "invalid client configuration");
        UiError::from_config(&err)
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("e-Report Admin")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "e-Report Admin",
        options,
        Box::new(move |cc| {
            Ok(Box::new(AdminApp::new(
                cc.egui_ctx.clone(),
                settings,
                &args.route,
            )))
        }),
    )
}
