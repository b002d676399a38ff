//! Render configuration
//!
//! Parses an optional TOML file. Every field has a default, so an empty file
//! (or no file at all) reproduces the stock virtual camera:
//! 1000x1000 pixels, f = 3000, placed 100 units along +z from the mesh origin.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{DepthError, Result};

/// Default intrinsics file, written to the working directory
pub const DEFAULT_INTRINSICS_PATH: &str = "virtualcam.intr";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub render: RasterConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    #[serde(default = "default_size")]
    pub width: u32,
    #[serde(default = "default_size")]
    pub height: u32,
    /// Shared focal length; `fx`/`fy` override it per axis
    #[serde(default = "default_focal")]
    pub focal: f64,
    #[serde(default)]
    pub fx: Option<f64>,
    #[serde(default)]
    pub fy: Option<f64>,
    /// Principal point, defaults to the image center under the pixel-center convention
    #[serde(default)]
    pub cx: Option<f64>,
    #[serde(default)]
    pub cy: Option<f64>,
    #[serde(default)]
    pub skew: f64,
    /// Translation of an identity-rotation extrinsic
    #[serde(default = "default_translation")]
    pub translation: [f64; 3],
    /// Full world-to-camera transform (row-major); replaces `translation`
    #[serde(default)]
    pub extrinsic: Option<[[f64; 4]; 4]>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: default_size(),
            height: default_size(),
            focal: default_focal(),
            fx: None,
            fy: None,
            cx: None,
            cy: None,
            skew: 0.0,
            translation: default_translation(),
            extrinsic: None,
        }
    }
}

fn default_size() -> u32 {
    1000
}

fn default_focal() -> f64 {
    3000.0
}

fn default_translation() -> [f64; 3] {
    [0.0, 0.0, 100.0]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RasterConfig {
    /// Near clipping distance along the camera's forward axis
    #[serde(default = "default_near")]
    pub near: f64,
    #[serde(default)]
    pub cull_back_faces: bool,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            near: default_near(),
            cull_back_faces: false,
        }
    }
}

fn default_near() -> f64 {
    1e-3
}

/// Unit of the values stored in the raw depth array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayUnit {
    #[default]
    Meters,
    Millimeters,
}

impl ArrayUnit {
    /// Multiplier applied to scene-unit depth before it is stored
    pub fn factor(self) -> f32 {
        match self {
            ArrayUnit::Meters => 1.0,
            ArrayUnit::Millimeters => 1000.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Replaces the directory derived from the mesh path
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default = "default_depth_scale")]
    pub depth_scale: f64,
    #[serde(default = "default_depth_bits")]
    pub depth_bits: u8,
    #[serde(default)]
    pub array_unit: ArrayUnit,
    #[serde(default = "default_intrinsics_path")]
    pub intrinsics_path: PathBuf,
    #[serde(default = "default_precision")]
    pub intrinsics_precision: usize,
    /// Write the fy value into both `_fy` and `_fx`, as downstream tooling expects
    #[serde(default = "default_legacy_focal")]
    pub legacy_focal_fields: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: None,
            depth_scale: default_depth_scale(),
            depth_bits: default_depth_bits(),
            array_unit: ArrayUnit::default(),
            intrinsics_path: default_intrinsics_path(),
            intrinsics_precision: default_precision(),
            legacy_focal_fields: default_legacy_focal(),
        }
    }
}

fn default_depth_scale() -> f64 {
    1000.0
}

fn default_depth_bits() -> u8 {
    16
}

fn default_intrinsics_path() -> PathBuf {
    PathBuf::from(DEFAULT_INTRINSICS_PATH)
}

fn default_precision() -> usize {
    6
}

fn default_legacy_focal() -> bool {
    true
}

impl RenderConfig {
    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: RenderConfig =
            toml::from_str(content).map_err(|e| DepthError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DepthError::Config(format!("failed to read config {:?}: {}", path, e))
        })?;
        Self::parse(&content)
    }

    /// Check output settings. Camera parameters are checked when the camera is built.
    pub fn validate(&self) -> Result<()> {
        let out = &self.output;
        if !out.depth_scale.is_finite() || out.depth_scale <= 0.0 {
            return Err(DepthError::Config(format!(
                "depth_scale must be positive, got {}",
                out.depth_scale
            )));
        }
        if out.depth_bits != 8 && out.depth_bits != 16 {
            return Err(DepthError::Config(format!(
                "depth_bits must be 8 or 16, got {}",
                out.depth_bits
            )));
        }
        if out.intrinsics_path.file_stem().is_none() {
            return Err(DepthError::Config(format!(
                "intrinsics_path has no file name: {:?}",
                out.intrinsics_path
            )));
        }
        if !self.render.near.is_finite() || self.render.near <= 0.0 {
            return Err(DepthError::Config(format!(
                "near plane must be positive, got {}",
                self.render.near
            )));
        }
        Ok(())
    }
}
