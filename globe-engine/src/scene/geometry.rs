// geometry.rs - Vertex data for scene primitives
//
// Flat f32 arrays ready for upload: positions and normals are xyz triples,
// uvs are uv pairs, colors are rgb triples.

use std::f32::consts::PI;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointData {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GeometryData {
    Mesh(MeshData),
    Points(PointData),
}

impl GeometryData {
    pub fn vertex_count(&self) -> usize {
        match self {
            GeometryData::Mesh(m) => m.positions.len() / 3,
            GeometryData::Points(p) => p.positions.len() / 3,
        }
    }
}

impl MeshData {
    /// Latitude/longitude sphere. The seam column is duplicated so
    /// equirectangular textures wrap without a visible stitch; pole rows
    /// shift u by half a segment so each pole triangle samples its own column.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let verts = ((ws + 1) * (hs + 1)) as usize;

        let mut mesh = MeshData {
            positions: Vec::with_capacity(verts * 3),
            normals: Vec::with_capacity(verts * 3),
            uvs: Vec::with_capacity(verts * 2),
            indices: Vec::with_capacity((ws * (hs - 1) * 6) as usize),
        };

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            let u_offset = if iy == 0 {
                0.5 / ws as f32
            } else if iy == hs {
                -0.5 / ws as f32
            } else {
                0.0
            };

            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let (sin_t, cos_t) = (v * PI).sin_cos();
                let (sin_p, cos_p) = (u * 2.0 * PI).sin_cos();

                let nx = -cos_p * sin_t;
                let ny = cos_t;
                let nz = sin_p * sin_t;

                mesh.positions.extend_from_slice(&[nx * radius, ny * radius, nz * radius]);
                mesh.normals.extend_from_slice(&[nx, ny, nz]);
                mesh.uvs.extend_from_slice(&[u + u_offset, 1.0 - v]);
            }
        }

        let row = ws + 1;
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                // Degenerate triangles at the poles are skipped
                if iy != 0 {
                    mesh.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 {
                    mesh.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = MeshData::sphere(2.592, 24, 16);
        for p in mesh.positions.chunks_exact(3) {
            let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((len - 2.592).abs() < 1e-4);
        }
        for n in mesh.normals.chunks_exact(3) {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn sphere_counts() {
        let mesh = MeshData::sphere(1.0, 8, 4);
        assert_eq!(mesh.positions.len() / 3, 9 * 5);
        assert_eq!(mesh.uvs.len() / 2, 9 * 5);
        // Two triangles per quad minus one per pole quad
        assert_eq!(mesh.indices.len() / 3, 8 * 4 * 2 - 8 * 2);
        let max = *mesh.indices.iter().max().unwrap() as usize;
        assert!(max < mesh.positions.len() / 3);
    }

    #[test]
    fn uvs_stay_in_unit_square() {
        let mesh = MeshData::sphere(1.0, 12, 6);
        for uv in mesh.uvs.chunks_exact(2) {
            assert!((-0.1..=1.1).contains(&uv[0]));
            assert!((0.0..=1.0).contains(&uv[1]));
        }
    }
}
