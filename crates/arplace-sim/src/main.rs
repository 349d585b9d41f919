//! arplace-sim: drive a placement session from a scripted scene
//!
//! Usage:
//!   arplace-sim                          # synthetic floor scene, 120 frames
//!   arplace-sim --scene scenes/tabletop.json --frames 300
//!   arplace-sim --print-config           # dump the effective config as TOML
//!
//! Logging is controlled with `RUST_LOG`, e.g. `RUST_LOG=arplace_core=debug`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use arplace_config::PlacementConfig;
use arplace_sim::{SceneDescription, SimulationOptions};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "arplace-sim")]
#[command(about = "Run an AR placement session against a scripted scene", long_about = None)]
struct Args {
    /// Placement config (TOML); defaults to the platform config location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scene description (JSON); a synthetic floor scene is used when omitted
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Frame rate of the simulated camera
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for the synthetic scene's feature cloud
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Print the effective config and exit
    #[arg(long)]
    print_config: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<PlacementConfig> {
    match path {
        Some(path) => PlacementConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => match PlacementConfig::default_path() {
            Some(path) => PlacementConfig::load_or_default(&path)
                .with_context(|| format!("Failed to load config {}", path.display())),
            None => Ok(PlacementConfig::default()),
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let scene = match &args.scene {
        Some(path) => SceneDescription::load(path)?,
        None => SceneDescription::synthetic(args.seed),
    };

    let options = SimulationOptions {
        frames: args.frames,
        fps: args.fps,
    };
    let report = arplace_sim::run(scene, config, options).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );
    Ok(())
}
