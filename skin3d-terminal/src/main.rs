//! skin3d - render Minecraft skins as 3D figures
//!
//! ```bash
//! # Interactive preview in the terminal
//! skin3d steve.png --cape cape.png
//!
//! # Write a PNG instead
//! skin3d alex.png --slim --hr -35 --ratio 8 --aa --output alex.png
//!
//! # Pose from a file, with overrides
//! skin3d steve.png --config wave.toml --vr 10
//! ```
//!
//! Controls: arrows/WASD rotate, h/l/c toggle hair/layer/cape, x toggles
//! antialiasing, space spins, q/Esc quits.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use skin3d_terminal::{load_skin, render_to_file, ArmModel, Overrides, PoseFile, TerminalApp};
use tracing_subscriber::EnvFilter;

/// Render Minecraft skins as 3D figures
#[derive(Parser)]
#[command(name = "skin3d")]
#[command(about = "Render Minecraft skins as 3D figures")]
#[command(version)]
struct Cli {
    /// Skin atlas PNG
    skin: PathBuf,

    /// Cape atlas PNG
    #[arg(long)]
    cape: Option<PathBuf>,

    /// Force the slim (3px) arm model
    #[arg(long, conflicts_with = "classic")]
    slim: bool,

    /// Force the classic (4px) arm model
    #[arg(long)]
    classic: bool,

    /// TOML pose file with [render] and [preview] tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Vertical view rotation in degrees
    #[arg(long, allow_hyphen_values = true)]
    vr: Option<f64>,

    /// Horizontal view rotation in degrees
    #[arg(long, allow_hyphen_values = true)]
    hr: Option<f64>,

    /// Output pixels per model unit
    #[arg(long)]
    ratio: Option<u32>,

    /// Render only the head
    #[arg(long)]
    head: bool,

    /// Antialias by rendering at twice the size and downsampling
    #[arg(long)]
    aa: bool,

    /// Write a PNG instead of opening the preview
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let pose = match &cli.config {
        Some(path) => PoseFile::load(path)?,
        None => PoseFile::default(),
    };
    let mut config = pose.render;
    Overrides {
        vr: cli.vr,
        hr: cli.hr,
        ratio: cli.ratio,
        head: cli.head,
        antialias: cli.aa,
    }
    .apply(&mut config);

    let model = if cli.slim {
        ArmModel::Slim
    } else if cli.classic {
        ArmModel::Classic
    } else {
        ArmModel::Detect
    };
    let skin = load_skin(&cli.skin, cli.cape.as_deref(), model)?;

    match &cli.output {
        Some(output) => render_to_file(&skin, &config, output),
        None => {
            let mut app = TerminalApp::new(skin, config, pose.preview)?;
            app.run()
        }
    }
}
