//! In-memory triangle mesh

use glam::Vec3;

/// Indexed triangle surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub positions: Vec<[f32; 3]>,
    /// Counter-clockwise triangles indexing into `positions`
    pub triangles: Vec<[u32; 3]>,
    /// Per-vertex normals, once computed or read from the source file
    pub normals: Option<Vec<[f32; 3]>>,
}

impl TriangleMesh {
    pub fn new(positions: Vec<[f32; 3]>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            triangles,
            normals: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn has_vertex_normals(&self) -> bool {
        self.normals
            .as_ref()
            .is_some_and(|n| n.len() == self.positions.len())
    }

    /// Replace vertex normals with the area-weighted average of incident face normals
    ///
    /// Vertices touched only by degenerate faces end up with a zero normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.positions.len()];

        let count = self.positions.len();
        // Out-of-range triangles are left to the renderer to reject
        let valid = self
            .triangles
            .iter()
            .filter(|t| t.iter().all(|&i| (i as usize) < count));
        for tri in valid {
            let [a, b, c] = tri.map(|i| Vec3::from_array(self.positions[i as usize]));
            // Unnormalized cross product weights by twice the face area
            let face = (b - a).cross(c - a);
            for &i in tri {
                accum[i as usize] += face;
            }
        }

        self.normals = Some(
            accum
                .into_iter()
                .map(|n| n.normalize_or_zero().to_array())
                .collect(),
        );
    }

    /// Append another mesh, rebasing its indices
    pub fn append(&mut self, other: TriangleMesh) {
        let base = self.positions.len() as u32;
        self.positions.extend(other.positions);
        self.triangles
            .extend(other.triangles.into_iter().map(|t| t.map(|i| i + base)));
        // Merged normals would be partial; recomputed before rendering anyway
        self.normals = None;
    }

    /// First triangle index that points past the vertex list, if any
    pub fn find_out_of_range(&self) -> Option<(usize, u32)> {
        let count = self.positions.len() as u32;
        self.triangles
            .iter()
            .enumerate()
            .find_map(|(t, tri)| tri.iter().find(|&&i| i >= count).map(|&i| (t, i)))
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut iter = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(mn, mx), p| (mn.min(p), mx.max(p)));
        Some((min.to_array(), max.to_array()))
    }
}
