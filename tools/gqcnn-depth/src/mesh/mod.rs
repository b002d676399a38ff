//! Mesh loading (OBJ, glTF/GLB, STL)

mod gltf;
mod obj;
mod stl;
mod types;

use std::path::Path;

use crate::error::{DepthError, Result};

pub use gltf::load_gltf;
pub use obj::load_obj;
pub use stl::load_stl;
pub use types::TriangleMesh;

/// Load a triangle mesh, picking the loader from the file extension
///
/// Fails if the file is unreadable, unparseable, or holds no triangles.
pub fn load_mesh(path: &Path) -> Result<TriangleMesh> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    let mesh = match ext.as_str() {
        "obj" => load_obj(path)?,
        "gltf" | "glb" => load_gltf(path)?,
        "stl" => load_stl(path)?,
        _ => {
            return Err(DepthError::load(
                path,
                format!(
                    "unsupported mesh format '{}' (use .obj, .stl, .gltf, or .glb)",
                    ext
                ),
            ));
        }
    };

    if mesh.is_empty() {
        return Err(DepthError::load(path, "mesh contains no triangles"));
    }

    tracing::info!(
        "Loaded mesh {:?}: {} vertices, {} triangles",
        path,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    if let Some((min, max)) = mesh.bounds() {
        tracing::debug!("Mesh bounds: {:?} .. {:?}", min, max);
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file() {
        let err = load_mesh(Path::new("/nonexistent/cube.obj")).unwrap_err();
        assert!(matches!(err, DepthError::Load { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cube.fbx");
        std::fs::write(&path, b"").unwrap();
        let err = load_mesh(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported mesh format"));
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\n").unwrap();
        let err = load_mesh(&path).unwrap_err();
        assert!(err.to_string().contains("no triangles"));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("TRI.OBJ");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(load_mesh(&path).unwrap().triangle_count(), 1);
    }
}
