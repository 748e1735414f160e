//! Wavefront OBJ reader built on `tobj`.
//!
//! All models in the file are merged into one mesh; MTL materials are
//! ignored because appearances are bound explicitly.

use std::path::Path;

use super::GeometryData;
use crate::error::{Result, SceneError};

pub fn read_obj(path: &Path) -> Result<GeometryData> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| SceneError::ObjLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let mut data = GeometryData::new();
    let mut missing_normals = false;

    for model in models {
        let mesh = model.mesh;
        let vertex_count = mesh.positions.len() / 3;

        let mut part = GeometryData::new();
        part.vertices = mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        part.indices = mesh.indices;

        // Use normals from OBJ if available, otherwise calculate them
        if mesh.normals.len() == mesh.positions.len() {
            part.normals = mesh
                .normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect();
        } else {
            missing_normals = true;
        }

        part.tex_coords = if mesh.texcoords.len() == vertex_count * 2 {
            mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect()
        } else {
            vec![[0.0, 0.0]; vertex_count]
        };

        log::debug!(
            "OBJ model '{}': {} vertices, {} triangles",
            model.name,
            part.vertex_count(),
            part.triangle_count()
        );
        data.append(part);
    }

    if data.is_empty() {
        return Err(SceneError::parse(path, "no faces"));
    }
    if missing_normals {
        data.compute_vertex_normals();
    }
    if let Some(&bad) = data.indices.iter().find(|&&i| i as usize >= data.vertices.len()) {
        return Err(SceneError::parse(path, format!("index {bad} out of range")));
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obj_quad_without_normals() {
        let path = std::env::temp_dir().join(format!("tableau-quad-{}.obj", std::process::id()));
        std::fs::write(
            &path,
            "o quad\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();

        let mesh = read_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
    }
}
