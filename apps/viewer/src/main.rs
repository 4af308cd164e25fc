use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use modelview_app_lib::RunOptions;
use modelview_io::ViewerConfig;

#[derive(Parser, Debug)]
#[command(name = "modelview", about = "View a GLTF/GLB model, driven by commands on stdin")]
struct Cli {
    /// Model to load (.gltf or .glb)
    asset: Option<PathBuf>,

    /// JSON viewer configuration
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Target frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Write each frame as a JSON line to this file
    #[arg(long)]
    frames_out: Option<PathBuf>,

    /// Start with the light theme
    #[arg(long)]
    light_theme: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut ViewerConfig) {
        if let Some(asset) = &self.asset {
            config.asset = Some(asset.clone());
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(fps) = self.fps {
            config.target_fps = fps;
        }
        if self.light_theme {
            config.light_theme = true;
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    cli.apply(&mut config);
    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }
    log::info!("Starting modelview ({}x{})", config.width, config.height);

    modelview_app_lib::run(
        config,
        RunOptions {
            max_frames: cli.max_frames,
            frames_out: cli.frames_out,
        },
    )
}
