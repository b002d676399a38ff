//! One run: resolve paths, build the camera, load, render, write.

use std::path::{Path, PathBuf};

use crate::artifacts::{self, WrittenArtifacts};
use crate::camera::PinholeCamera;
use crate::config::RenderConfig;
use crate::error::{DepthError, Result};
use crate::mesh;
use crate::paths::OutputPaths;
use crate::render;

/// Command-line values that take precedence over the configuration file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub depth_scale: Option<f64>,
    pub output_root: Option<PathBuf>,
    pub intrinsics_path: Option<PathBuf>,
}

impl Overrides {
    /// Fold the overrides into `config` and re-validate it
    pub fn apply(&self, mut config: RenderConfig) -> Result<RenderConfig> {
        if let Some(scale) = self.depth_scale {
            config.output.depth_scale = scale;
        }
        if let Some(root) = &self.output_root {
            config.output.root = Some(root.clone());
        }
        if let Some(path) = &self.intrinsics_path {
            config.output.intrinsics_path = path.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Render one mesh and write every artifact
///
/// Stops at the first failing stage; nothing after it runs.
pub fn run(mesh_path: &Path, config: &RenderConfig) -> Result<WrittenArtifacts> {
    if !mesh_path.is_file() {
        return Err(DepthError::load(mesh_path, "no such file"));
    }

    let paths = OutputPaths::resolve(mesh_path, config.output.root.as_deref())?;
    paths.create_dirs()?;
    tracing::debug!("Output paths: {:?}", paths);

    let camera = PinholeCamera::from_config(&config.camera)?;
    let (fx, fy) = camera.focal_length();
    let (cx, cy) = camera.principal_point();
    tracing::info!(
        "Camera {}x{}, f = ({}, {}), c = ({}, {})",
        camera.width(),
        camera.height(),
        fx,
        fy,
        cx,
        cy
    );

    let mut mesh = mesh::load_mesh(mesh_path)?;
    let depth = render::render_depth(&mut mesh, &camera, &config.render)?;

    artifacts::write_all(&depth, &camera, &paths, &config.output)
}
