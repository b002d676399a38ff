//! GQ-CNN camera intrinsics record (`.intr`)
//!
//! A single-line JSON object in a fixed field order:
//! ```text
//! {"_cy": 499.500000, "_cx": 499.500000, "_fy": 3000.000000, "_height": 1000, "_fx": 3000.000000, "_width": 1000, "_skew": 0.000000, "_K": 0, "_frame": "virtualcam"}
//! ```
//! `_K` is a placeholder for distortion coefficients and is always 0.

use std::fmt::Write as _;

use crate::camera::PinholeCamera;

/// Intrinsic parameters captured from the camera used for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct IntrinsicsRecord {
    pub cx: f64,
    pub cy: f64,
    pub fx: f64,
    pub fy: f64,
    pub width: u32,
    pub height: u32,
    pub skew: f64,
    pub frame: String,
}

impl IntrinsicsRecord {
    pub fn from_camera(camera: &PinholeCamera, frame: impl Into<String>) -> Self {
        let (fx, fy) = camera.focal_length();
        let (cx, cy) = camera.principal_point();
        Self {
            cx,
            cy,
            fx,
            fy,
            width: camera.width(),
            height: camera.height(),
            skew: camera.skew(),
            frame: frame.into(),
        }
    }

    /// Render the record with `precision` decimals
    ///
    /// With `legacy_focal_fields`, `_fx` repeats the fy value the way existing
    /// `.intr` consumers were fed; otherwise it carries the true fx.
    pub fn encode(&self, precision: usize, legacy_focal_fields: bool) -> String {
        let fx_field = if legacy_focal_fields { self.fy } else { self.fx };

        format!(
            "{{\"_cy\": {:.p$}, \"_cx\": {:.p$}, \"_fy\": {:.p$}, \"_height\": {}, \
             \"_fx\": {:.p$}, \"_width\": {}, \"_skew\": {:.p$}, \"_K\": 0, \"_frame\": \"{}\"}}",
            self.cy,
            self.cx,
            self.fy,
            self.height,
            fx_field,
            self.width,
            self.skew,
            escape(&self.frame),
            p = precision,
        )
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DMat4;

    #[test]
    fn test_default_camera_record() {
        let camera = PinholeCamera::looking_at_origin(1000, 1000, 3000.0, 100.0).unwrap();
        let record = IntrinsicsRecord::from_camera(&camera, "virtualcam");
        assert_eq!(
            record.encode(6, true),
            "{\"_cy\": 499.500000, \"_cx\": 499.500000, \"_fy\": 3000.000000, \
             \"_height\": 1000, \"_fx\": 3000.000000, \"_width\": 1000, \
             \"_skew\": 0.000000, \"_K\": 0, \"_frame\": \"virtualcam\"}"
        );
    }

    #[test]
    fn test_legacy_focal_fields() {
        let camera =
            PinholeCamera::new(640, 480, 525.0, 520.0, 319.5, 239.5, 0.0, DMat4::IDENTITY)
                .unwrap();
        let record = IntrinsicsRecord::from_camera(&camera, "cam");

        let legacy = record.encode(2, true);
        assert!(legacy.contains("\"_fy\": 520.00"));
        assert!(legacy.contains("\"_fx\": 520.00"));

        let exact = record.encode(2, false);
        assert!(exact.contains("\"_fy\": 520.00"));
        assert!(exact.contains("\"_fx\": 525.00"));
        assert!(exact.contains("\"_width\": 640, \"_skew\": 0.00"));
    }

    #[test]
    fn test_frame_is_escaped() {
        let camera = PinholeCamera::looking_at_origin(10, 10, 10.0, 1.0).unwrap();
        let record = IntrinsicsRecord::from_camera(&camera, "a\"b\\c");
        assert!(record.encode(6, true).ends_with("\"_frame\": \"a\\\"b\\\\c\"}"));
    }
}
