//! Output path resolution
//!
//! `data/meshes/cube.obj` renders into `data/depth/cube.png`,
//! `data/depthnpy/cube.npy` and `data/segmask/cube.png`.

use std::path::{Path, PathBuf};

use crate::error::{DepthError, Result};

pub const DEPTH_DIR: &str = "depth";
pub const DEPTH_ARRAY_DIR: &str = "depthnpy";
pub const SEGMASK_DIR: &str = "segmask";

/// Output locations for a single mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Mesh file name without extension
    pub stem: String,
    pub depth_image: PathBuf,
    pub depth_array: PathBuf,
    pub segmask: PathBuf,
}

impl OutputPaths {
    /// Derive output paths from the mesh path
    ///
    /// Outputs go under the parent of the mesh's parent directory unless `root`
    /// is given. A mesh without a grandparent directory writes under `.`.
    pub fn resolve(mesh_path: &Path, root: Option<&Path>) -> Result<Self> {
        let stem = mesh_path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                DepthError::Argument(format!("mesh path has no file name: {:?}", mesh_path))
            })?
            .to_string();

        let root = match root {
            Some(r) => r.to_path_buf(),
            None => derived_root(mesh_path),
        };

        Ok(Self {
            depth_image: root.join(DEPTH_DIR).join(format!("{}.png", stem)),
            depth_array: root.join(DEPTH_ARRAY_DIR).join(format!("{}.npy", stem)),
            segmask: root.join(SEGMASK_DIR).join(format!("{}.png", stem)),
            stem,
        })
    }

    /// Create the output directories. Existing directories are fine.
    pub fn create_dirs(&self) -> Result<()> {
        for file in [&self.depth_image, &self.depth_array, &self.segmask] {
            if let Some(dir) = file.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir).map_err(|source| DepthError::Path {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}

fn derived_root(mesh_path: &Path) -> PathBuf {
    mesh_path
        .parent()
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
