use anyhow::{anyhow, Context};
use clap::Parser;
use eframe::egui;
use log::{debug, error};
use std::path::PathBuf;

mod app;
mod command;
mod controller;
mod error;
mod localizations;
mod models;
mod runner;
mod settings;
mod system;
mod theme;
mod ui;

use app::SpotdlApp;
use controller::Controller;
use settings::{Settings, SettingsStore, DEFAULT_CONFIG_FILE};

/// Desktop front-end for the spotdl downloader
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file, created with defaults when missing
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Use this spotdl executable instead of the one next to the application
    #[arg(long)]
    companion: Option<PathBuf>,

    /// Pre-fill the URL field
    #[arg(short, long)]
    url: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let store = SettingsStore::new(&args.config);
    let (settings, startup_error) = match store.load() {
        Ok(settings) => (settings, None),
        Err(e) => {
            error!("Failed to load {}: {}", store.path().display(), e);
            (Settings::default(), Some(e))
        }
    };
    debug!("Loaded settings: {:?}", settings);

    let companion = match args.companion {
        Some(path) => path,
        None => command::companion_path().context("could not locate the running executable")?,
    };

    let controller = Controller::new(store, settings, companion);
    debug!("Companion executable: {}", controller.companion().display());

    let mut app = SpotdlApp::new(controller, startup_error);
    if let Some(url) = args.url {
        app.state.url = url;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([600.0, 520.0])
            .with_title("SpotDL GUI"),
        ..Default::default()
    };

    eframe::run_native(
        "SpotDL GUI",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            app.install_waker(&cc.egui_ctx);
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow!("failed to start the window: {e}"))
}
