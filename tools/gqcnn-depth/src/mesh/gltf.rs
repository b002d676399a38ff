//! glTF/GLB loading

use glam::{Mat4, Vec3};
use std::path::Path;

use super::types::TriangleMesh;
use crate::error::{DepthError, Result};

/// Load every triangle primitive of a glTF/GLB file into one mesh
///
/// Node transforms of the default scene (or the first scene) are baked into
/// the positions. Files without scenes fall back to all meshes untransformed.
pub fn load_gltf(input: &Path) -> Result<TriangleMesh> {
    let (document, buffers, _images) =
        gltf::import(input).map_err(|e| DepthError::load(input, e))?;

    let mut mesh = TriangleMesh::default();
    let result = match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => scene
            .nodes()
            .try_for_each(|node| collect_node(&node, Mat4::IDENTITY, &buffers, &mut mesh)),
        None => document
            .meshes()
            .try_for_each(|m| append_mesh(&m, Mat4::IDENTITY, &buffers, &mut mesh)),
    };
    result.map_err(|reason| DepthError::load(input, reason))?;

    Ok(mesh)
}

fn collect_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut TriangleMesh,
) -> std::result::Result<(), String> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        append_mesh(&mesh, world, buffers, out)?;
    }
    for child in node.children() {
        collect_node(&child, world, buffers, out)?;
    }
    Ok(())
}

fn append_mesh(
    mesh: &gltf::Mesh,
    transform: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut TriangleMesh,
) -> std::result::Result<(), String> {
    // Mirroring transforms flip winding
    let mirrored = transform.determinant() < 0.0;

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            tracing::warn!(
                "Skipping non-triangle primitive {} of mesh {:?} ({:?})",
                primitive.index(),
                mesh.name().unwrap_or("<unnamed>"),
                primitive.mode()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .ok_or_else(|| format!("primitive {} has no positions", primitive.index()))?
            .map(|p| transform.transform_point3(Vec3::from_array(p)).to_array())
            .collect();

        // Non-indexed primitives list vertices in triangle order
        let indices: Vec<u32> = match reader.read_indices() {
            Some(iter) => iter.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let triangles = indices
            .chunks_exact(3)
            .map(|c| {
                if mirrored {
                    [c[0], c[2], c[1]]
                } else {
                    [c[0], c[1], c[2]]
                }
            })
            .collect();

        let part = TriangleMesh::new(positions, triangles);
        if let Some((tri, index)) = part.find_out_of_range() {
            return Err(format!(
                "primitive {} triangle {} references vertex {} past {} vertices",
                primitive.index(),
                tri,
                index,
                part.vertex_count()
            ));
        }
        out.append(part);
    }

    Ok(())
}
