//! Off-screen depth rendering
//!
//! A [`RenderSurface`] owns the depth target for one camera. It is released
//! when dropped, so every exit path (including `?` early returns) tears it down.

mod buffer;
mod raster;

pub use buffer::DepthBuffer;
pub use raster::RasterStats;

use crate::camera::PinholeCamera;
use crate::config::RasterConfig;
use crate::error::{DepthError, Result};
use crate::mesh::TriangleMesh;

/// Largest surface edge accepted, in pixels
pub const MAX_SURFACE_DIMENSION: u32 = 16384;

/// Depth target bound to a camera
pub struct RenderSurface<'a> {
    camera: &'a PinholeCamera,
    options: RasterConfig,
    depth: DepthBuffer,
}

impl<'a> RenderSurface<'a> {
    /// Create a surface matching the camera's image size
    pub fn open(camera: &'a PinholeCamera, options: &RasterConfig) -> Result<Self> {
        let (width, height) = (camera.width(), camera.height());
        if width == 0
            || height == 0
            || width > MAX_SURFACE_DIMENSION
            || height > MAX_SURFACE_DIMENSION
        {
            return Err(DepthError::Render(format!(
                "cannot create a {}x{} surface (each side must be 1..={})",
                width, height, MAX_SURFACE_DIMENSION
            )));
        }
        if !options.near.is_finite() || options.near <= 0.0 {
            return Err(DepthError::Render(format!(
                "near plane must be positive, got {}",
                options.near
            )));
        }

        tracing::debug!("Opened {}x{} render surface", width, height);
        Ok(Self {
            camera,
            options: options.clone(),
            depth: DepthBuffer::new(width, height),
        })
    }

    /// Rasterize a mesh into the surface
    ///
    /// Back-face culling needs vertex normals; call
    /// [`TriangleMesh::compute_vertex_normals`] first.
    pub fn draw(&mut self, mesh: &TriangleMesh) -> Result<RasterStats> {
        check_mesh(mesh)?;

        let normals = if self.options.cull_back_faces {
            if !mesh.has_vertex_normals() {
                return Err(DepthError::Render(
                    "back-face culling requires vertex normals".into(),
                ));
            }
            mesh.normals.as_deref()
        } else {
            None
        };

        let stats = raster::draw_triangles(
            &mut self.depth,
            self.camera,
            &mesh.positions,
            &mesh.triangles,
            normals,
            self.options.near,
        );
        tracing::debug!(
            "Rasterized {} triangles ({} culled, {} behind camera, {} degenerate), {} fragments",
            stats.drawn,
            stats.culled,
            stats.clipped,
            stats.degenerate,
            stats.fragments
        );
        Ok(stats)
    }

    /// Read back the depth target
    pub fn capture(&self) -> Result<DepthBuffer> {
        let (w, h) = (self.camera.width(), self.camera.height());
        if self.depth.width() != w || self.depth.height() != h {
            return Err(DepthError::Render(format!(
                "captured {}x{} depth but camera is {}x{}",
                self.depth.width(),
                self.depth.height(),
                w,
                h
            )));
        }
        Ok(self.depth.clone())
    }
}

impl Drop for RenderSurface<'_> {
    fn drop(&mut self) {
        tracing::debug!(
            "Released {}x{} render surface",
            self.depth.width(),
            self.depth.height()
        );
    }
}

/// Reject geometry the rasterizer cannot index or project
fn check_mesh(mesh: &TriangleMesh) -> Result<()> {
    if let Some(i) = mesh
        .positions
        .iter()
        .position(|p| p.iter().any(|c| !c.is_finite()))
    {
        return Err(DepthError::Render(format!(
            "vertex {} has a non-finite coordinate",
            i
        )));
    }
    if let Some((tri, index)) = mesh.find_out_of_range() {
        return Err(DepthError::Render(format!(
            "triangle {} references missing vertex {}",
            tri, index
        )));
    }
    Ok(())
}

/// Render the depth of `mesh` as seen by `camera`
///
/// Attaches vertex normals to the mesh before drawing.
pub fn render_depth(
    mesh: &mut TriangleMesh,
    camera: &PinholeCamera,
    options: &RasterConfig,
) -> Result<DepthBuffer> {
    check_mesh(mesh)?;
    mesh.compute_vertex_normals();

    let mut surface = RenderSurface::open(camera, options)?;
    surface.draw(mesh)?;
    let depth = surface.capture()?;

    match depth.depth_range() {
        Some((near, far)) => tracing::info!(
            "Captured depth: {} of {} pixels hit, range {:.6}..{:.6}",
            depth.hit_count(),
            depth.as_slice().len(),
            near,
            far
        ),
        None => tracing::warn!("Captured depth is empty: no surface visible to the camera"),
    }

    Ok(depth)
}
