use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glium::implement_vertex;

use crate::error::ViewerError;

/// Interleaved layout for lit meshes. Field order is fixed: texcoord,
/// normal, position.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub texcoord: [f32; 2],
    pub normal: [f32; 3],
    pub position: [f32; 3],
}
implement_vertex!(Vertex, texcoord, normal, position);

impl Vertex {
    pub const ATTRIBUTES: &'static [&'static str] = &["texcoord", "normal", "position"];
}

/// Position-only layout for the skybox cube and the fullscreen triangle.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SkyVertex {
    pub position: [f32; 3],
}
implement_vertex!(SkyVertex, position);

impl SkyVertex {
    pub const ATTRIBUTES: &'static [&'static str] = &["position"];
}

/// The eight corners of the unit cube.
pub const CUBE_CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
];

/// Twelve triangles, two per face, as indices into [`CUBE_CORNERS`].
/// These tables are authored, not computed; the per-face UV and normal
/// assignment below depends on this exact ordering.
pub const CUBE_TRIANGLES: [[usize; 3]; 12] = [
    [0, 2, 3],
    [0, 1, 2],
    [1, 7, 2],
    [1, 6, 7],
    [6, 5, 4],
    [4, 7, 6],
    [3, 4, 5],
    [3, 5, 0],
    [3, 7, 4],
    [3, 2, 7],
    [0, 6, 1],
    [0, 5, 6],
];

const UV_CORNERS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

const UV_TRIANGLES: [[usize; 3]; 12] = [
    [0, 2, 3],
    [0, 1, 2],
    [0, 2, 3],
    [0, 1, 2],
    [0, 1, 2],
    [2, 3, 0],
    [2, 3, 0],
    [2, 0, 1],
    [0, 2, 3],
    [0, 1, 2],
    [3, 1, 2],
    [3, 0, 1],
];

/// One flat normal per face, shared by that face's six vertices.
const FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, -1.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
];

/// Depth of the fullscreen triangle, just inside the far clip plane.
pub const SKY_TRIANGLE_DEPTH: f32 = 0.9999;

/// 36 vertices for the unit cube, flat-shaded, in draw order.
pub fn cube_vertices() -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(36);
    for (triangle_index, (triangle, uv_triangle)) in
        CUBE_TRIANGLES.iter().zip(UV_TRIANGLES.iter()).enumerate()
    {
        let normal = FACE_NORMALS[triangle_index / 2];
        for (&corner, &uv_corner) in triangle.iter().zip(uv_triangle.iter()) {
            vertices.push(Vertex {
                texcoord: UV_CORNERS[uv_corner],
                normal,
                position: CUBE_CORNERS[corner],
            });
        }
    }
    vertices
}

/// Same cube, position-only, with each position's component order reversed.
/// The mirroring flips the winding so the faces are visible from inside.
pub fn skybox_vertices() -> Vec<SkyVertex> {
    CUBE_TRIANGLES
        .iter()
        .flat_map(|triangle| triangle.iter())
        .map(|&corner| {
            let [x, y, z] = CUBE_CORNERS[corner];
            SkyVertex { position: [z, y, x] }
        })
        .collect()
}

/// Single triangle covering the whole screen after projection; avoids a
/// fourth vertex and an index buffer for the advanced skybox pass.
pub fn fullscreen_triangle() -> Vec<SkyVertex> {
    let z = SKY_TRIANGLE_DEPTH;
    vec![
        SkyVertex { position: [-1.0, -1.0, z] },
        SkyVertex { position: [3.0, -1.0, z] },
        SkyVertex { position: [-1.0, 3.0, z] },
    ]
}

/// Loads an OBJ mesh as a flat sequence of vertices in draw order. The
/// parser is external; only the expanded triple stream matters here.
pub fn load_obj_vertices(path: &Path) -> Result<Vec<Vertex>, ViewerError> {
    let (models, _materials) =
        tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|e| ViewerError::asset(path, e))?;

    let mut vertices = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        for &index in &mesh.indices {
            let i = index as usize;
            let texcoord = if mesh.texcoords.is_empty() {
                [0.0, 0.0]
            } else {
                [mesh.texcoords[2 * i], mesh.texcoords[2 * i + 1]]
            };
            let normal = if mesh.normals.is_empty() {
                [0.0, 1.0, 0.0]
            } else {
                [
                    mesh.normals[3 * i],
                    mesh.normals[3 * i + 1],
                    mesh.normals[3 * i + 2],
                ]
            };
            let position = [
                mesh.positions[3 * i],
                mesh.positions[3 * i + 1],
                mesh.positions[3 * i + 2],
            ];
            vertices.push(Vertex {
                texcoord,
                normal,
                position,
            });
        }
    }

    if vertices.is_empty() {
        return Err(ViewerError::asset(path, "mesh contains no triangles"));
    }
    Ok(vertices)
}
