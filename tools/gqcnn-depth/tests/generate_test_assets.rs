//! Test mesh generation
//!
//! Every generator writes the same axis-aligned unit cube centered at the
//! origin, wound counter-clockwise when seen from outside.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

const HALF: f32 = 0.5;

pub fn cube_positions() -> [[f32; 3]; 8] {
    let h = HALF;
    [
        [-h, -h, -h],
        [h, -h, -h],
        [h, h, -h],
        [-h, h, -h],
        [-h, -h, h],
        [h, -h, h],
        [h, h, h],
        [-h, h, h],
    ]
}

pub fn cube_triangles() -> [[u32; 3]; 12] {
    [
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [3, 6, 2],
        [3, 7, 6],
        [0, 4, 7],
        [0, 7, 3],
        [1, 2, 6],
        [1, 6, 5],
    ]
}

/// Cube as OBJ, faces written as quads to exercise triangulation
pub fn generate_cube_obj(path: &Path) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "# unit cube")?;
    for [x, y, z] in cube_positions() {
        writeln!(file, "v {} {} {}", x, y, z)?;
    }
    // Each quad fans into the triangle pairs of cube_triangles()
    for quad in [
        [1, 4, 3, 2],
        [5, 6, 7, 8],
        [1, 2, 6, 5],
        [4, 8, 7, 3],
        [1, 5, 8, 4],
        [2, 3, 7, 6],
    ] {
        writeln!(file, "f {} {} {} {}", quad[0], quad[1], quad[2], quad[3])?;
    }
    Ok(())
}

/// Cube as binary STL (80-byte header, u32 count, 50-byte facets)
pub fn generate_cube_stl(path: &Path) -> std::io::Result<()> {
    let positions = cube_positions();
    let triangles = cube_triangles();

    let mut data = Vec::with_capacity(84 + 50 * triangles.len());
    let mut header = [0u8; 80];
    header[..10].copy_from_slice(b"solid cube");
    data.extend_from_slice(&header);
    data.extend_from_slice(&(triangles.len() as u32).to_le_bytes());

    for tri in triangles {
        // Readers recompute normals
        data.extend_from_slice(&[0u8; 12]);
        for i in tri {
            for c in positions[i as usize] {
                data.extend_from_slice(&c.to_le_bytes());
            }
        }
        data.extend_from_slice(&0u16.to_le_bytes());
    }

    std::fs::write(path, data)
}

/// Cube as `.gltf` JSON with an external `.bin` buffer next to it
///
/// The mesh sits under a node translated by `offset`.
pub fn generate_cube_gltf(path: &Path, offset: [f32; 3]) -> std::io::Result<()> {
    let positions = cube_positions();
    let triangles = cube_triangles();

    let mut bin = Vec::new();
    for p in positions {
        for c in p {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    let index_offset = bin.len();
    for tri in triangles {
        for i in tri {
            bin.extend_from_slice(&(i as u16).to_le_bytes());
        }
    }
    let index_length = bin.len() - index_offset;

    let bin_name = format!(
        "{}.bin",
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("buffer")
    );
    let bin_path = path.with_file_name(&bin_name);
    std::fs::write(&bin_path, &bin)?;

    let json = format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "mesh": 0, "translation": [{}, {}, {}] }}],
  "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0 }}, "indices": 1 }}] }}],
  "buffers": [{{ "uri": "{}", "byteLength": {} }}],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": {} }},
    {{ "buffer": 0, "byteOffset": {}, "byteLength": {} }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 8, "type": "VEC3",
      "min": [-{h}, -{h}, -{h}], "max": [{h}, {h}, {h}] }},
    {{ "bufferView": 1, "componentType": 5123, "count": {}, "type": "SCALAR" }}
  ]
}}"#,
        offset[0],
        offset[1],
        offset[2],
        bin_name,
        bin.len(),
        index_offset,
        index_offset,
        index_length,
        triangles.len() * 3,
        h = HALF,
    );

    std::fs::write(path, json)
}
