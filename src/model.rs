use std::hash::{Hash, Hasher};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
    pub tangent: Vec3,
}

impl Vertex {
    /// Tangent written for every vertex; no tangent space is computed on export.
    pub const DEFAULT_TANGENT: Vec3 = Vec3::X;

    pub fn new(position: Vec3, normal: Vec3, tex_coords: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coords,
            tangent: Self::DEFAULT_TANGENT,
        }
    }
}

// Identity is the exact bit pattern of all eleven components, so 0.0 and -0.0 are distinct
// and a NaN equals itself.
impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        bytemuck::bytes_of(self) == bytemuck::bytes_of(other)
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        bytemuck::bytes_of(self).hash(state);
    }
}

/// The part of a mesh that uses a single material.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPartition {
    pub material_id: Option<u32>,
    pub vertices: Vec<Vertex>,
    /// Triangle list, three entries per triangle, each indexing `vertices`.
    pub indices: Vec<u32>,
}

impl MeshPartition {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(|triangle| {
            [
                self.vertices[triangle[0] as usize],
                self.vertices[triangle[1] as usize],
                self.vertices[triangle[2] as usize],
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn vertices_compare_bitwise() {
        let a = Vertex::new(Vec3::ZERO, Vec3::Y, Vec2::ZERO);
        let b = Vertex::new(Vec3::new(-0.0, 0.0, 0.0), Vec3::Y, Vec2::ZERO);

        assert_ne!(a, b);
        let copy = a;
        assert_eq!(a, copy);

        let nan = Vertex::new(Vec3::splat(f32::NAN), Vec3::Y, Vec2::ZERO);
        assert_eq!(nan, nan);
    }

    #[test]
    fn equal_vertices_hash_alike() {
        let mut set = HashSet::new();
        set.insert(Vertex::new(Vec3::ONE, Vec3::Z, Vec2::new(0.5, -0.5)));
        set.insert(Vertex::new(Vec3::ONE, Vec3::Z, Vec2::new(0.5, -0.5)));
        set.insert(Vertex::new(Vec3::ONE, Vec3::Z, Vec2::new(0.5, 0.5)));

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn triangles_resolve_indices() {
        let a = Vertex::new(Vec3::ZERO, Vec3::Y, Vec2::ZERO);
        let b = Vertex::new(Vec3::X, Vec3::Y, Vec2::X);
        let c = Vertex::new(Vec3::Z, Vec3::Y, Vec2::Y);
        let partition = MeshPartition {
            material_id: Some(3),
            vertices: vec![a, b, c],
            indices: vec![1, 2, 0],
        };

        assert_eq!(partition.triangle_count(), 1);
        assert_eq!(partition.triangles().collect::<Vec<_>>(), vec![[b, c, a]]);
    }
}
