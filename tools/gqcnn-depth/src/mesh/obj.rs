//! Wavefront OBJ loading

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::types::TriangleMesh;
use crate::error::{DepthError, Result};

/// Load an OBJ file. Only geometry is read; `vn`/`vt` records are ignored.
pub fn load_obj(input: &Path) -> Result<TriangleMesh> {
    let file = File::open(input).map_err(|e| DepthError::load(input, e))?;
    parse_obj(BufReader::new(file)).map_err(|reason| DepthError::load(input, reason))
}

/// Parse OBJ text into positions and triangles
pub(crate) fn parse_obj<R: BufRead>(reader: R) -> std::result::Result<TriangleMesh, String> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut triangles: Vec<[u32; 3]> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| e.to_string())?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts[0] {
            "v" if parts.len() >= 4 => {
                let mut p = [0.0f32; 3];
                for (axis, s) in parts[1..4].iter().enumerate() {
                    p[axis] = s.parse().map_err(|_| {
                        format!("line {}: invalid vertex coordinate {:?}", line_no + 1, s)
                    })?;
                }
                positions.push(p);
            }
            "f" if parts.len() >= 4 => {
                let face: Vec<u32> = parts[1..]
                    .iter()
                    .map(|v| parse_obj_vertex(v, positions.len()))
                    .collect::<Option<_>>()
                    .ok_or_else(|| format!("line {}: invalid face {:?}", line_no + 1, line))?;

                // Fan triangulation, fine for the convex faces exporters emit
                for i in 1..face.len() - 1 {
                    triangles.push([face[0], face[i], face[i + 1]]);
                }
            }
            _ => {}
        }
    }

    let mesh = TriangleMesh::new(positions, triangles);
    if let Some((tri, index)) = mesh.find_out_of_range() {
        return Err(format!(
            "face {} references vertex {} but only {} vertices exist",
            tri,
            index + 1,
            mesh.vertex_count()
        ));
    }
    Ok(mesh)
}

/// Resolve the position index of a face vertex: "v", "v/vt", "v/vt/vn" or "v//vn"
///
/// OBJ indices are 1-based; negative indices count back from the latest vertex.
fn parse_obj_vertex(s: &str, seen: usize) -> Option<u32> {
    let index: i64 = s.split('/').next()?.parse().ok()?;
    let resolved = match index {
        0 => return None,
        i if i > 0 => i - 1,
        i => seen as i64 + i,
    };
    u32::try_from(resolved).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_triangle() {
        let mesh = parse_obj(Cursor::new("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n")).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangles, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_quad_is_fan_triangulated() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1/1/1 2/2/1 3/3/1 4/4/1\n";
        let mesh = parse_obj(Cursor::new(src)).unwrap();
        assert_eq!(mesh.triangles, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_negative_and_normal_only_indices() {
        let src = "# comment\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf -3//1 -2//1 -1//1\n";
        let mesh = parse_obj(Cursor::new(src)).unwrap();
        assert_eq!(mesh.triangles, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_out_of_range_face() {
        let err = parse_obj(Cursor::new("v 0 0 0\nv 1 0 0\nf 1 2 3\n")).unwrap_err();
        assert!(err.contains("vertex 3"));
    }

    #[test]
    fn test_bad_coordinate() {
        let err = parse_obj(Cursor::new("v 0 zero 0\n")).unwrap_err();
        assert!(err.contains("line 1"));
    }

    #[test]
    fn test_zero_index_rejected() {
        assert!(parse_obj(Cursor::new("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n")).is_err());
    }
}
