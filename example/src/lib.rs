mod app;
mod config;
mod terminal;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use app::{Script, replay};
pub use config::load_config;

/// Replays a scripted browsing session and draws the navigation progress bar
/// in the terminal.
#[derive(Debug, Parser)]
#[command(name = "example", version, about, long_about = None)]
pub struct Cli {
    /// TOML file with a `[progress]` table overriding the animation constants
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Locations to navigate to, in order
    #[arg(short, long = "route", default_values_t = default_routes())]
    pub routes: Vec<String>,
    /// Delay between consecutive navigations, in milliseconds
    #[arg(long, default_value_t = 250)]
    pub gap_ms: u64,
    /// How long the last page takes to load before completion is signalled
    #[arg(long, default_value_t = 400)]
    pub load_ms: u64,
    /// Width of the drawn bar in terminal columns
    #[arg(short, long, default_value_t = 60)]
    pub width: u16,
    /// Grow the bar left to right instead of right to left
    #[arg(long)]
    pub ltr: bool,
}

fn default_routes() -> Vec<String> {
    ["/questions", "/questions?sort=votes", "/tags/rust", "/authors/17"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub fn run(cli: Cli) -> Result<()> {
    init_tracing();
    let config = load_config(cli.config.as_deref())?;
    let script = Script::from_cli(&cli);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build the demo runtime")?;
    runtime.block_on(replay(config, script))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("off,porsesh_progress=info,example=info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
