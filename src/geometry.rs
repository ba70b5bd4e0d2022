use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

/// Indexed triangle list uploaded once and drawn every frame.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Full viewport quad in the z = 0 plane, texcoords spanning 0..1.
    pub fn quad() -> Self {
        let normal = [0.0, 0.0, 1.0];
        #[rustfmt::skip]
        let vertices = vec![
            Vertex { position: [-1.0, -1.0, 0.0], normal, texcoord: [0.0, 0.0] }, // BOTTOM LEFT
            Vertex { position: [ 1.0, -1.0, 0.0], normal, texcoord: [1.0, 0.0] }, // BOTTOM RIGHT
            Vertex { position: [-1.0,  1.0, 0.0], normal, texcoord: [0.0, 1.0] }, // TOP LEFT
            Vertex { position: [ 1.0,  1.0, 0.0], normal, texcoord: [1.0, 1.0] }, // TOP RIGHT
        ];
        Self {
            vertices,
            indices: vec![0, 1, 2, 2, 1, 3],
        }
    }

    /// UV sphere around the Z axis. The seam column is duplicated so texcoords wrap.
    pub fn sphere(radius: f32, slices: u16, stacks: u16) -> Self {
        let slices = slices.max(3);
        let stacks = stacks.max(2);

        let mut vertices = Vec::with_capacity((slices as usize + 1) * (stacks as usize + 1));
        for stack in 0..=stacks {
            let v = stack as f32 / stacks as f32;
            // From the south pole (-Z) up to the north pole (+Z).
            let phi = PI * v - PI / 2.0;
            let (sin_phi, cos_phi) = phi.sin_cos();
            for slice in 0..=slices {
                let u = slice as f32 / slices as f32;
                let theta = 2.0 * PI * u;
                let (sin_theta, cos_theta) = theta.sin_cos();
                let normal = [cos_phi * cos_theta, cos_phi * sin_theta, sin_phi];
                vertices.push(Vertex {
                    position: normal.map(|n| n * radius),
                    normal,
                    texcoord: [u, v],
                });
            }
        }

        let row = slices + 1;
        let mut indices = Vec::with_capacity(6 * slices as usize * stacks as usize);
        for stack in 0..stacks {
            for slice in 0..slices {
                let a = stack * row + slice;
                let b = a + row;
                indices.extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
            }
        }

        Self { vertices, indices }
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length(v: [f32; 3]) -> f32 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    #[test]
    fn quad_covers_the_viewport() {
        let quad = Mesh::quad();
        assert_eq!(quad.vertices.len(), 4);
        assert_eq!(quad.indices, vec![0, 1, 2, 2, 1, 3]);
        for vertex in &quad.vertices {
            assert_eq!(vertex.position[0].abs(), 1.0);
            assert_eq!(vertex.position[1].abs(), 1.0);
            assert_eq!(vertex.position[2], 0.0);
            // texcoords follow the position, mapped from -1..1 to 0..1
            assert_eq!(vertex.texcoord[0], (vertex.position[0] + 1.0) / 2.0);
            assert_eq!(vertex.texcoord[1], (vertex.position[1] + 1.0) / 2.0);
        }
    }

    #[test]
    fn sphere_counts() {
        let sphere = Mesh::sphere(1.0, 20, 20);
        assert_eq!(sphere.vertices.len(), 21 * 21);
        assert_eq!(sphere.indices.len(), 6 * 20 * 20);
        let max = *sphere.indices.iter().max().unwrap();
        assert!((max as usize) < sphere.vertices.len());
    }

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let sphere = Mesh::sphere(2.5, 8, 6);
        for vertex in &sphere.vertices {
            assert!((length(vertex.position) - 2.5).abs() < 1e-5);
            assert!((length(vertex.normal) - 1.0).abs() < 1e-5);
        }
        let first = sphere.vertices.first().unwrap();
        let last = sphere.vertices.last().unwrap();
        assert!((first.position[2] + 2.5).abs() < 1e-5);
        assert!((last.position[2] - 2.5).abs() < 1e-5);
    }

    #[test]
    fn degenerate_tessellation_is_clamped() {
        let sphere = Mesh::sphere(1.0, 0, 1);
        assert_eq!(sphere.vertices.len(), 4 * 3);
        assert_eq!(sphere.indices.len(), 6 * 3 * 2);
    }

    #[test]
    fn byte_views_match_layout() {
        let quad = Mesh::quad();
        assert_eq!(quad.vertex_bytes().len(), 4 * std::mem::size_of::<Vertex>());
        assert_eq!(std::mem::size_of::<Vertex>(), 8 * std::mem::size_of::<f32>());
        assert_eq!(quad.index_bytes().len(), 6 * 2);
    }
}
