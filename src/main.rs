mod app;
mod config;
mod mindmap;
mod util;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, Overrides};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Optional TOML file with `[storage]` and `[layout]` tables.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON document holding the tree.
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Directory that "Download" writes into.
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// File name that "Download" writes.
    #[arg(long)]
    export_name: Option<String>,

    /// Seed each new layout from the previous node positions.
    #[arg(long)]
    keep_positions: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = Config::load(
        args.config.as_deref(),
        Overrides {
            data_file: args.data_file,
            export_dir: args.export_dir,
            export_name: args.export_name,
            keep_positions: args.keep_positions,
        },
    )
    .context("failed to load configuration")?;
    info!(
        data_file = %config.data_file.display(),
        keep_positions = config.layout.keep_positions,
        "starting mindmap explorer"
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Mindmap Explorer",
        options,
        Box::new(move |cc| Ok(Box::new(app::MindmapApp::new(cc, config)))),
    )
    .map_err(|error| anyhow::anyhow!("failed to run the window: {error}"))
}
