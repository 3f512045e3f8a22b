//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::ocean::SpawnMode;
use crate::params::{RenderConfig, WaterParams};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "causticsea")]
#[command(about = "Wave pool ocean with refracted caustics on a textured bottom", long_about = None)]
pub struct Args {
    /// Water grid resolution (vertices per side)
    #[arg(long, value_name = "N", default_value_t = 200)]
    pub grid_size: usize,

    /// Number of wave slots in the pool
    #[arg(long, value_name = "COUNT", default_value_t = 10)]
    pub waves: usize,

    /// Initial water depth above the bottom (world units)
    #[arg(long, value_name = "UNITS", default_value_t = 1.0)]
    pub depth: f32,

    /// Start in interactive mode (click the water to spawn waves)
    #[arg(long)]
    pub interactive: bool,

    /// Bottom texture image (a sand pattern is generated when omitted)
    #[arg(long, value_name = "PATH")]
    pub bottom: Option<PathBuf>,

    /// Seed for ambient wave placement
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Still-image export target for the S key
    #[arg(long, value_name = "PATH", default_value = "scene.png")]
    pub export: PathBuf,
}

impl Args {
    pub fn water_params(&self) -> WaterParams {
        WaterParams {
            grid_size: self.grid_size,
            pool_size: self.waves,
            initial_depth: self.depth,
            ..WaterParams::default()
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            export_path: self.export.clone(),
            ..RenderConfig::default()
        }
    }

    pub fn spawn_mode(&self) -> SpawnMode {
        if self.interactive {
            SpawnMode::Interactive
        } else {
            SpawnMode::Ambient
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["causticsea"]);
        let params = args.water_params();

        assert_eq!(params.grid_size, 200);
        assert_eq!(params.pool_size, 10);
        assert_eq!(params.initial_depth, 1.0);
        assert_eq!(args.spawn_mode(), SpawnMode::Ambient);
        assert_eq!(args.bottom, None);
        assert_eq!(args.render_config().export_path, PathBuf::from("scene.png"));
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "causticsea",
            "--grid-size",
            "64",
            "--waves",
            "8",
            "--depth",
            "0.5",
            "--interactive",
            "--bottom",
            "pebbles.png",
            "--seed",
            "42",
            "--export",
            "out/frame.png",
        ]);
        let params = args.water_params();

        assert_eq!(params.grid_size, 64);
        assert_eq!(params.pool_size, 8);
        assert_eq!(params.initial_depth, 0.5);
        assert_eq!(args.spawn_mode(), SpawnMode::Interactive);
        assert_eq!(args.bottom, Some(PathBuf::from("pebbles.png")));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.render_config().export_path, PathBuf::from("out/frame.png"));
    }
}
