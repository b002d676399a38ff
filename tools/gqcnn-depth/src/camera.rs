//! Pinhole camera model
//!
//! Camera frame follows the OpenCV convention: +x right, +y down, +z forward.
//! Pixel `(col, row)` has its center at image coordinates `(col, row)`, which is
//! why the default principal point sits at `(w/2 - 0.5, h/2 - 0.5)`.

use glam::{DMat3, DMat4, DVec2, DVec3, DVec4};

use crate::config::CameraConfig;
use crate::error::{DepthError, Result};
use crate::formats::IntrinsicsRecord;

/// Tolerance for the rotation part of a supplied extrinsic
const ROTATION_EPSILON: f64 = 1e-6;

/// Intrinsics + world-to-camera extrinsic. No lens distortion.
#[derive(Debug, Clone, PartialEq)]
pub struct PinholeCamera {
    width: u32,
    height: u32,
    fx: f64,
    fy: f64,
    cx: f64,
    cy: f64,
    skew: f64,
    extrinsic: DMat4,
}

impl PinholeCamera {
    /// Build a camera, checking the intrinsic contract and that the extrinsic is rigid
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        width: u32,
        height: u32,
        fx: f64,
        fy: f64,
        cx: f64,
        cy: f64,
        skew: f64,
        extrinsic: DMat4,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(DepthError::Config(format!(
                "image size must be positive, got {}x{}",
                width, height
            )));
        }
        for (name, value) in [("fx", fx), ("fy", fy), ("cx", cx), ("cy", cy)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DepthError::Config(format!(
                    "{} must be strictly positive, got {}",
                    name, value
                )));
            }
        }
        if !skew.is_finite() {
            return Err(DepthError::Config(format!("skew must be finite, got {}", skew)));
        }
        check_rigid(&extrinsic)?;

        Ok(Self {
            width,
            height,
            fx,
            fy,
            cx,
            cy,
            skew,
            extrinsic,
        })
    }

    /// Camera with identity rotation, placed `distance` units from the world origin
    pub fn looking_at_origin(width: u32, height: u32, focal: f64, distance: f64) -> Result<Self> {
        let (cx, cy) = centered_principal_point(width, height);
        let extrinsic = DMat4::from_translation(DVec3::new(0.0, 0.0, distance));
        Self::new(width, height, focal, focal, cx, cy, 0.0, extrinsic)
    }

    /// Build from the `[camera]` configuration section
    pub fn from_config(config: &CameraConfig) -> Result<Self> {
        let (default_cx, default_cy) = centered_principal_point(config.width, config.height);
        let extrinsic = match config.extrinsic {
            // Rows in the file, columns in glam
            Some(rows) => DMat4::from_cols_array_2d(&rows).transpose(),
            None => DMat4::from_translation(DVec3::from_array(config.translation)),
        };

        Self::new(
            config.width,
            config.height,
            config.fx.unwrap_or(config.focal),
            config.fy.unwrap_or(config.focal),
            config.cx.unwrap_or(default_cx),
            config.cy.unwrap_or(default_cy),
            config.skew,
            extrinsic,
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn focal_length(&self) -> (f64, f64) {
        (self.fx, self.fy)
    }

    pub fn principal_point(&self) -> (f64, f64) {
        (self.cx, self.cy)
    }

    pub fn skew(&self) -> f64 {
        self.skew
    }

    pub fn extrinsic(&self) -> DMat4 {
        self.extrinsic
    }

    /// 3x3 intrinsic matrix K
    pub fn intrinsic_matrix(&self) -> DMat3 {
        DMat3::from_cols(
            DVec3::new(self.fx, 0.0, 0.0),
            DVec3::new(self.skew, self.fy, 0.0),
            DVec3::new(self.cx, self.cy, 1.0),
        )
    }

    /// Transform a world-space point into the camera frame
    pub fn world_to_camera(&self, point: DVec3) -> DVec3 {
        self.extrinsic.transform_point3(point)
    }

    /// Rotate a world-space direction into the camera frame
    pub fn world_to_camera_vector(&self, vector: DVec3) -> DVec3 {
        self.extrinsic.transform_vector3(vector)
    }

    /// Project a camera-frame point (z > 0) onto the image plane
    #[inline]
    pub fn project(&self, p: DVec3) -> DVec2 {
        let inv_z = 1.0 / p.z;
        DVec2::new(
            self.fx * p.x * inv_z + self.skew * p.y * inv_z + self.cx,
            self.fy * p.y * inv_z + self.cy,
        )
    }

    /// Intrinsics record tagged with `frame`
    pub fn intrinsics_record(&self, frame: impl Into<String>) -> IntrinsicsRecord {
        IntrinsicsRecord::from_camera(self, frame)
    }
}

/// Principal point under the pixel-center convention
pub fn centered_principal_point(width: u32, height: u32) -> (f64, f64) {
    (width as f64 / 2.0 - 0.5, height as f64 / 2.0 - 0.5)
}

fn check_rigid(m: &DMat4) -> Result<()> {
    if !m.is_finite() {
        return Err(DepthError::Config("extrinsic contains non-finite values".into()));
    }
    if m.row(3).abs_diff_eq(DVec4::W, ROTATION_EPSILON) {
        let rotation = DMat3::from_mat4(*m);
        let gram = rotation.transpose() * rotation;
        if gram.abs_diff_eq(DMat3::IDENTITY, ROTATION_EPSILON)
            && (rotation.determinant() - 1.0).abs() < ROTATION_EPSILON
        {
            return Ok(());
        }
    }
    Err(DepthError::Config(
        "extrinsic must be a rigid transform (rotation + translation)".into(),
    ))
}
