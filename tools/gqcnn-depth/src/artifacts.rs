//! Artifact writer: depth array, depth image, segmentation mask, intrinsics

use image::{GrayImage, ImageBuffer, ImageFormat, Luma, Pixel};
use ndarray::Array3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::camera::PinholeCamera;
use crate::config::{ArrayUnit, OutputConfig};
use crate::error::{DepthError, Result};
use crate::formats::{IntrinsicsRecord, write_npy_f32};
use crate::paths::OutputPaths;
use crate::render::DepthBuffer;

/// 16-bit grayscale image
pub type Gray16Image = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Mask value for pixels where a surface was hit
pub const MASK_HIT: u8 = 255;

/// Files produced by one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifacts {
    pub depth_array: PathBuf,
    pub depth_image: PathBuf,
    pub segmask: PathBuf,
    pub intrinsics: PathBuf,
}

/// Depth buffer as a `(height, width, 1)` tensor in the requested unit
pub fn depth_tensor(depth: &DepthBuffer, unit: ArrayUnit) -> Array3<f32> {
    let factor = unit.factor();
    let shape = (depth.height() as usize, depth.width() as usize, 1);
    Array3::from_shape_fn(shape, |(row, col, _)| {
        depth.as_slice()[row * shape.1 + col] * factor
    })
}

/// Scale and round one depth value, saturating to `[0, max]`
///
/// NaN and negative values map to 0.
#[inline]
pub fn quantize(depth: f32, scale: f64, max: u16) -> u16 {
    let scaled = (depth as f64 * scale).round();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else if scaled >= max as f64 {
        max
    } else {
        scaled as u16
    }
}

/// Wrap per-pixel values in an image of the buffer's size
fn gray_image<T>(depth: &DepthBuffer, values: Vec<T>) -> Result<ImageBuffer<Luma<T>, Vec<T>>>
where
    Luma<T>: Pixel<Subpixel = T>,
{
    let len = values.len();
    ImageBuffer::from_raw(depth.width(), depth.height(), values).ok_or_else(|| {
        DepthError::Render(format!(
            "{} pixel values do not fill a {}x{} image",
            len,
            depth.width(),
            depth.height()
        ))
    })
}

/// Quantized 16-bit depth image
pub fn depth_image_16(depth: &DepthBuffer, scale: f64) -> Result<Gray16Image> {
    let values = depth
        .as_slice()
        .iter()
        .map(|&d| quantize(d, scale, u16::MAX))
        .collect();
    gray_image(depth, values)
}

/// Quantized 8-bit depth image
pub fn depth_image_8(depth: &DepthBuffer, scale: f64) -> Result<GrayImage> {
    let values = depth
        .as_slice()
        .iter()
        .map(|&d| quantize(d, scale, u8::MAX as u16) as u8)
        .collect();
    gray_image(depth, values)
}

/// 255 where depth is nonzero, 0 elsewhere
pub fn segmentation_mask(depth: &DepthBuffer) -> Result<GrayImage> {
    let values = depth
        .as_slice()
        .iter()
        .map(|&d| if d != 0.0 { MASK_HIT } else { 0 })
        .collect();
    gray_image(depth, values)
}

/// Write the raw depth tensor as `.npy`
pub fn write_depth_array(path: &Path, depth: &DepthBuffer, unit: ArrayUnit) -> Result<()> {
    let tensor = depth_tensor(depth, unit);
    let file = File::create(path).map_err(|e| DepthError::write(path, e))?;
    let mut writer = BufWriter::new(file);
    write_npy_f32(&mut writer, &tensor).map_err(|e| DepthError::write(path, e))?;
    writer.flush().map_err(|e| DepthError::write(path, e))?;

    tracing::info!(
        "Wrote depth array {:?}: shape {:?}, unit {:?}",
        path,
        tensor.shape(),
        unit
    );
    Ok(())
}

/// Write the quantized depth image as PNG (8 or 16 bits)
pub fn write_depth_image(path: &Path, depth: &DepthBuffer, scale: f64, bits: u8) -> Result<()> {
    let saved = match bits {
        8 => depth_image_8(depth, scale)?.save_with_format(path, ImageFormat::Png),
        16 => depth_image_16(depth, scale)?.save_with_format(path, ImageFormat::Png),
        other => {
            return Err(DepthError::Config(format!(
                "depth_bits must be 8 or 16, got {}",
                other
            )));
        }
    };
    saved.map_err(|e| DepthError::write(path, e))?;

    tracing::info!(
        "Wrote {}-bit depth image {:?} (scale {})",
        bits,
        path,
        scale
    );
    Ok(())
}

/// Write the segmentation mask as an 8-bit PNG
pub fn write_segmask(path: &Path, depth: &DepthBuffer) -> Result<()> {
    segmentation_mask(depth)?
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| DepthError::write(path, e))?;
    tracing::info!("Wrote segmentation mask {:?}", path);
    Ok(())
}

/// Write the intrinsics record; `_frame` is the file's stem
pub fn write_intrinsics(
    path: &Path,
    camera: &PinholeCamera,
    precision: usize,
    legacy_focal_fields: bool,
) -> Result<IntrinsicsRecord> {
    let frame = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| DepthError::write(path, "intrinsics path has no file name"))?;
    let record = camera.intrinsics_record(frame);

    std::fs::write(path, record.encode(precision, legacy_focal_fields))
        .map_err(|e| DepthError::write(path, e))?;

    tracing::info!("Wrote intrinsics {:?}", path);
    Ok(record)
}

/// Write every artifact for one capture. Files already written stay on failure.
pub fn write_all(
    depth: &DepthBuffer,
    camera: &PinholeCamera,
    paths: &OutputPaths,
    output: &OutputConfig,
) -> Result<WrittenArtifacts> {
    if depth.width() != camera.width() || depth.height() != camera.height() {
        return Err(DepthError::Render(format!(
            "depth buffer is {}x{} but camera is {}x{}",
            depth.width(),
            depth.height(),
            camera.width(),
            camera.height()
        )));
    }

    write_depth_array(&paths.depth_array, depth, output.array_unit)?;
    write_depth_image(
        &paths.depth_image,
        depth,
        output.depth_scale,
        output.depth_bits,
    )?;
    write_segmask(&paths.segmask, depth)?;
    write_intrinsics(
        &output.intrinsics_path,
        camera,
        output.intrinsics_precision,
        output.legacy_focal_fields,
    )?;

    Ok(WrittenArtifacts {
        depth_array: paths.depth_array.clone(),
        depth_image: paths.depth_image.clone(),
        segmask: paths.segmask.clone(),
        intrinsics: output.intrinsics_path.clone(),
    })
}
