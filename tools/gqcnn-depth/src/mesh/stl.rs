//! STL loading (ASCII and binary)
//!
//! STL stores unshared triangle soup; every facet contributes three vertices.

use std::path::Path;

use super::types::TriangleMesh;
use crate::error::{DepthError, Result};

/// Binary header: 80-byte comment + u32 triangle count
const BINARY_HEADER_SIZE: usize = 84;
/// Per facet: normal + 3 vertices (12 f32) + u16 attribute
const BINARY_FACET_SIZE: usize = 50;

pub fn load_stl(input: &Path) -> Result<TriangleMesh> {
    let data = std::fs::read(input).map_err(|e| DepthError::load(input, e))?;
    parse_stl(&data).map_err(|reason| DepthError::load(input, reason))
}

pub(crate) fn parse_stl(data: &[u8]) -> std::result::Result<TriangleMesh, String> {
    if is_binary(data) {
        parse_binary(data)
    } else {
        let text = std::str::from_utf8(data).map_err(|_| "not a valid STL file".to_string())?;
        parse_ascii(text)
    }
}

/// Binary files may also begin with "solid", so trust the size arithmetic first
fn is_binary(data: &[u8]) -> bool {
    if data.len() >= BINARY_HEADER_SIZE {
        let count = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
        if count
            .checked_mul(BINARY_FACET_SIZE)
            .and_then(|n| n.checked_add(BINARY_HEADER_SIZE))
            == Some(data.len())
        {
            return true;
        }
    }
    !data.trim_ascii_start().starts_with(b"solid")
}

fn parse_binary(data: &[u8]) -> std::result::Result<TriangleMesh, String> {
    if data.len() < BINARY_HEADER_SIZE {
        return Err(format!("binary STL too small: {} bytes", data.len()));
    }
    let count = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
    let body = &data[BINARY_HEADER_SIZE..];
    if body.len() < count * BINARY_FACET_SIZE {
        return Err(format!(
            "binary STL declares {} facets but holds {} bytes of facet data",
            count,
            body.len()
        ));
    }

    let mut positions = Vec::with_capacity(count * 3);
    for facet in body.chunks_exact(BINARY_FACET_SIZE).take(count) {
        // Skip the stored facet normal (first 12 bytes)
        for v in 0..3 {
            let base = 12 + v * 12;
            let mut p = [0.0f32; 3];
            for (axis, value) in p.iter_mut().enumerate() {
                let o = base + axis * 4;
                *value = f32::from_le_bytes([facet[o], facet[o + 1], facet[o + 2], facet[o + 3]]);
            }
            positions.push(p);
        }
    }

    Ok(soup(positions))
}

fn parse_ascii(text: &str) -> std::result::Result<TriangleMesh, String> {
    let mut positions = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        if parts.next() != Some("vertex") {
            continue;
        }
        let mut p = [0.0f32; 3];
        for value in p.iter_mut() {
            let s = parts
                .next()
                .ok_or_else(|| format!("line {}: vertex needs 3 coordinates", line_no + 1))?;
            *value = s
                .parse()
                .map_err(|_| format!("line {}: invalid coordinate {:?}", line_no + 1, s))?;
        }
        positions.push(p);
    }

    if positions.len() % 3 != 0 {
        return Err(format!(
            "ASCII STL has {} vertices, not a multiple of 3",
            positions.len()
        ));
    }
    Ok(soup(positions))
}

fn soup(positions: Vec<[f32; 3]>) -> TriangleMesh {
    let triangles = (0..positions.len() as u32 / 3)
        .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
        .collect();
    TriangleMesh::new(positions, triangles)
}
