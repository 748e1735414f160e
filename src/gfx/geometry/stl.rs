//! STL mesh reader (binary and ASCII).
//!
//! Facets are welded on exact position so that smooth shading has shared
//! vertices to average over; vertex normals are recomputed from the faces.

use std::collections::HashMap;
use std::path::Path;

use super::GeometryData;
use crate::error::{Result, SceneError};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Reads an STL file from disk
pub fn read_stl(path: &Path) -> Result<GeometryData> {
    let bytes = std::fs::read(path).map_err(|e| SceneError::io(path, e))?;
    parse_stl(&bytes).map_err(|reason| SceneError::parse(path, reason))
}

/// Parses STL bytes, choosing binary or ASCII by the declared facet count
pub fn parse_stl(bytes: &[u8]) -> std::result::Result<GeometryData, String> {
    let triangles = if is_binary(bytes) {
        parse_binary(bytes)?
    } else if bytes.trim_ascii_start().starts_with(b"solid") {
        parse_ascii(bytes)?
    } else {
        return Err("neither a binary nor an ASCII STL".to_string());
    };

    if triangles.is_empty() {
        return Err("no facets".to_string());
    }
    Ok(weld(&triangles))
}

fn is_binary(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_LEN + 4 {
        return false;
    }
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    count
        .checked_mul(FACET_LEN)
        .and_then(|n| n.checked_add(HEADER_LEN + 4))
        .is_some_and(|expected| expected == bytes.len())
}

fn parse_binary(bytes: &[u8]) -> std::result::Result<Vec<[[f32; 3]; 3]>, String> {
    let body = &bytes[HEADER_LEN + 4..];
    body.chunks_exact(FACET_LEN)
        .map(|facet| {
            // 12 bytes of facet normal precede the three vertices
            let mut tri = [[0.0f32; 3]; 3];
            for (v, vertex) in tri.iter_mut().enumerate() {
                for (c, coord) in vertex.iter_mut().enumerate() {
                    let at = 12 + v * 12 + c * 4;
                    let raw: [u8; 4] = facet[at..at + 4]
                        .try_into()
                        .map_err(|_| "truncated facet".to_string())?;
                    *coord = f32::from_le_bytes(raw);
                }
            }
            Ok(tri)
        })
        .collect()
}

fn parse_ascii(bytes: &[u8]) -> std::result::Result<Vec<[[f32; 3]; 3]>, String> {
    let text = std::str::from_utf8(bytes).map_err(|e| format!("invalid UTF-8: {e}"))?;

    let mut triangles = Vec::new();
    let mut pending: Vec<[f32; 3]> = Vec::with_capacity(3);

    for (line_no, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("vertex") => {
                let mut vertex = [0.0f32; 3];
                for coord in vertex.iter_mut() {
                    *coord = tokens
                        .next()
                        .and_then(|t| t.parse().ok())
                        .ok_or_else(|| format!("line {}: bad vertex", line_no + 1))?;
                }
                pending.push(vertex);
            }
            Some("endloop") => {
                if pending.len() != 3 {
                    return Err(format!(
                        "line {}: facet has {} vertices",
                        line_no + 1,
                        pending.len()
                    ));
                }
                triangles.push([pending[0], pending[1], pending[2]]);
                pending.clear();
            }
            _ => {}
        }
    }

    Ok(triangles)
}

fn weld(triangles: &[[[f32; 3]; 3]]) -> GeometryData {
    let mut data = GeometryData::new();
    let mut lookup: HashMap<[u32; 3], u32> = HashMap::new();

    for tri in triangles {
        for vertex in tri {
            let key = vertex.map(f32::to_bits);
            let index = *lookup.entry(key).or_insert_with(|| {
                data.vertices.push(*vertex);
                data.tex_coords.push([0.0, 0.0]);
                (data.vertices.len() - 1) as u32
            });
            data.indices.push(index);
        }
    }

    data.compute_vertex_normals();
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASCII_TETRA: &str = "solid tetra
  facet normal 0 0 -1
    outer loop
      vertex 0 0 0
      vertex 0 1 0
      vertex 1 0 0
    endloop
  endfacet
  facet normal 0 -1 0
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 0 1
    endloop
  endfacet
  facet normal -1 0 0
    outer loop
      vertex 0 0 0
      vertex 0 0 1
      vertex 0 1 0
    endloop
  endfacet
  facet normal 1 1 1
    outer loop
      vertex 1 0 0
      vertex 0 1 0
      vertex 0 0 1
    endloop
  endfacet
endsolid tetra
";

    fn binary_stl(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for tri in triangles {
            bytes.extend_from_slice(&[0u8; 12]);
            for vertex in tri {
                for c in vertex {
                    bytes.extend_from_slice(&c.to_le_bytes());
                }
            }
            bytes.extend_from_slice(&[0u8; 2]);
        }
        bytes
    }

    #[test]
    fn test_ascii_tetrahedron_is_welded() {
        let mesh = parse_stl(ASCII_TETRA.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.normals.len(), 4);
    }

    #[test]
    fn test_binary_quad() {
        let quad = [
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
            [[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        ];
        let mesh = parse_stl(&binary_stl(&quad)).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_binary_header_starting_with_solid_is_still_binary() {
        let tri = [[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]];
        let mut bytes = binary_stl(&tri);
        bytes[..5].copy_from_slice(b"solid");
        assert_eq!(parse_stl(&bytes).unwrap().triangle_count(), 1);
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        assert!(parse_stl(b"not a mesh").is_err());
        assert!(parse_stl(b"solid empty\nendsolid empty\n").is_err());
        let broken = "solid x\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nendloop\nendfacet\n";
        assert!(parse_stl(broken.as_bytes()).is_err());
    }
}
