//! Triangle rasterization into a depth buffer
//!
//! Triangles are clipped against the near plane in camera space, projected,
//! and covered at pixel centers with edge functions. Depth is interpolated
//! linearly in 1/z so it stays perspective-correct.

use glam::{DVec2, DVec3};

use super::buffer::DepthBuffer;
use crate::camera::PinholeCamera;

/// Projected triangles smaller than this (in squared pixels) cover nothing
const MIN_AREA: f64 = 1e-12;

/// Counters from one draw call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    pub drawn: usize,
    pub culled: usize,
    pub clipped: usize,
    pub degenerate: usize,
    pub fragments: usize,
}

/// Camera-space vertex after projection
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    pos: DVec2,
    inv_z: f64,
}

/// Clip a camera-space triangle to `z >= near`, returning 0, 3 or 4 vertices
pub(crate) fn clip_near(tri: [DVec3; 3], near: f64) -> Vec<DVec3> {
    let mut out = Vec::with_capacity(4);
    for i in 0..3 {
        let a = tri[i];
        let b = tri[(i + 1) % 3];
        let a_in = a.z >= near;
        let b_in = b.z >= near;
        if a_in {
            out.push(a);
        }
        if a_in != b_in {
            let t = (near - a.z) / (b.z - a.z);
            let mut p = a.lerp(b, t);
            p.z = near;
            out.push(p);
        }
    }
    out
}

/// Signed doubled area of (a, b, p)
#[inline]
fn edge(a: DVec2, b: DVec2, p: DVec2) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Shared edges are walked in opposite directions by their two triangles;
/// owning only one direction fills every center on such an edge exactly once.
#[inline]
fn owns_edge(a: DVec2, b: DVec2) -> bool {
    let d = b - a;
    d.y > 0.0 || (d.y == 0.0 && d.x < 0.0)
}

#[inline]
fn covers(w: f64, owned: bool) -> bool {
    w > 0.0 || (w == 0.0 && owned)
}

/// Rasterize one projected triangle. Returns the number of depth writes.
fn fill_triangle(buffer: &mut DepthBuffer, mut v: [ScreenVertex; 3]) -> Option<usize> {
    let mut area = edge(v[0].pos, v[1].pos, v[2].pos);
    if !area.is_finite() || area.abs() < MIN_AREA {
        return None;
    }
    if area < 0.0 {
        v.swap(1, 2);
        area = -area;
    }

    let (w, h) = (buffer.width() as f64, buffer.height() as f64);
    let min = v[0].pos.min(v[1].pos).min(v[2].pos);
    let max = v[0].pos.max(v[1].pos).max(v[2].pos);
    if max.x < 0.0 || max.y < 0.0 || min.x > w - 1.0 || min.y > h - 1.0 {
        return Some(0);
    }
    let col_start = min.x.ceil().max(0.0) as u32;
    let col_end = max.x.floor().min(w - 1.0) as u32;
    let row_start = min.y.ceil().max(0.0) as u32;
    let row_end = max.y.floor().min(h - 1.0) as u32;

    let owned = [
        owns_edge(v[1].pos, v[2].pos),
        owns_edge(v[2].pos, v[0].pos),
        owns_edge(v[0].pos, v[1].pos),
    ];
    let inv_area = 1.0 / area;
    let mut written = 0;

    for row in row_start..=row_end {
        for col in col_start..=col_end {
            let p = DVec2::new(col as f64, row as f64);
            let w0 = edge(v[1].pos, v[2].pos, p);
            let w1 = edge(v[2].pos, v[0].pos, p);
            let w2 = edge(v[0].pos, v[1].pos, p);
            if !(covers(w0, owned[0]) && covers(w1, owned[1]) && covers(w2, owned[2])) {
                continue;
            }

            let inv_z = (w0 * v[0].inv_z + w1 * v[1].inv_z + w2 * v[2].inv_z) * inv_area;
            if inv_z <= 0.0 {
                continue;
            }
            if buffer.test_and_set(col, row, (1.0 / inv_z) as f32) {
                written += 1;
            }
        }
    }

    Some(written)
}

/// Draw world-space triangles as seen by `camera`
///
/// `normals` are world-space vertex normals; when given, triangles whose
/// averaged normal points away from the camera are skipped.
pub(crate) fn draw_triangles(
    buffer: &mut DepthBuffer,
    camera: &PinholeCamera,
    positions: &[[f32; 3]],
    triangles: &[[u32; 3]],
    normals: Option<&[[f32; 3]]>,
    near: f64,
) -> RasterStats {
    let mut stats = RasterStats::default();
    let to_camera =
        |i: u32| camera.world_to_camera(DVec3::from(positions[i as usize].map(f64::from)));

    for tri in triangles {
        let cam = tri.map(to_camera);

        if let Some(normals) = normals {
            let n = tri
                .iter()
                .map(|&i| DVec3::from(normals[i as usize].map(f64::from)))
                .sum::<DVec3>();
            let centroid = (cam[0] + cam[1] + cam[2]) / 3.0;
            // Camera sits at the origin of its own frame
            if camera.world_to_camera_vector(n).dot(centroid) >= 0.0 {
                stats.culled += 1;
                continue;
            }
        }

        let polygon = clip_near(cam, near);
        if polygon.len() < 3 {
            stats.clipped += 1;
            continue;
        }

        let screen: Vec<ScreenVertex> = polygon
            .iter()
            .map(|&p| ScreenVertex {
                pos: camera.project(p),
                inv_z: 1.0 / p.z,
            })
            .collect();

        let mut any = false;
        for i in 1..screen.len() - 1 {
            if let Some(n) = fill_triangle(buffer, [screen[0], screen[i], screen[i + 1]]) {
                stats.fragments += n;
                any = true;
            }
        }
        if any {
            stats.drawn += 1;
        } else {
            stats.degenerate += 1;
        }
    }

    stats
}
