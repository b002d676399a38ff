//! gqcnn-depth - synthetic depth capture for grasp planning
//!
//! Renders a mesh from a virtual camera and writes depth/<stem>.png,
//! depthnpy/<stem>.npy, segmask/<stem>.png and the camera intrinsics.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use gqcnn_depth::config::RenderConfig;
use gqcnn_depth::pipeline::{self, Overrides};

#[derive(Parser)]
#[command(name = "gqcnn-depth")]
#[command(about = "Render a depth map, segmentation mask and camera intrinsics from a mesh")]
#[command(version)]
struct Cli {
    /// Input mesh (OBJ/STL/glTF/GLB)
    mesh: PathBuf,

    /// Depth image scale: pixel value = round(depth * scale)
    depth_scale: Option<f64>,

    /// TOML render configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output root (overrides the directory derived from the mesh path)
    #[arg(long)]
    output_root: Option<PathBuf>,

    /// Intrinsics output file
    #[arg(long)]
    intrinsics: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading render config {:?}", path);
            RenderConfig::load(path)?
        }
        None => RenderConfig::default(),
    };
    let config = Overrides {
        depth_scale: cli.depth_scale,
        output_root: cli.output_root,
        intrinsics_path: cli.intrinsics,
    }
    .apply(config)?;

    tracing::info!("Rendering {:?}", cli.mesh);
    let written = pipeline::run(&cli.mesh, &config)
        .with_context(|| format!("failed to render {:?}", cli.mesh))?;
    tracing::info!(
        "Done! {:?}, {:?}, {:?}, {:?}",
        written.depth_image,
        written.depth_array,
        written.segmask,
        written.intrinsics
    );

    Ok(())
}
