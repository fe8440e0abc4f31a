use glam::{Vec2, Vec3};
use itertools::Itertools;

use crate::math::bounds::AABB;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureTransform {
    pub scale: Vec2,
    pub offset: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub texture_transform: Option<TextureTransform>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture_transform: None,
        }
    }

    pub fn with_texture_transform(mut self, scale: Vec2, offset: Vec2) -> Self {
        self.texture_transform = Some(TextureTransform { scale, offset });
        self
    }
}

/// An authored polygon. Corners index into the mesh's vertex arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub vertices: Vec<u32>,
    pub material_index: usize,
}

impl Face {
    pub fn new(vertices: impl Into<Vec<u32>>, material_index: usize) -> Self {
        Self {
            vertices: vertices.into(),
            material_index,
        }
    }
}

/// Mesh geometry as the authoring tool stores it, in object-local space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub faces: Vec<Face>,
    /// Active UV layer: one coordinate per face corner, parallel to `faces`.
    pub uv_layer: Option<Vec<Vec<Vec2>>>,
    /// Material slots. A slot can exist without a material in it.
    pub materials: Vec<Option<Material>>,
}

impl MeshData {
    pub fn local_bounds(&self) -> Option<AABB> {
        AABB::from_points(self.positions.iter().copied())
    }

    /// Triangles and quads of the mesh, larger polygons fanned. Released when dropped.
    pub fn evaluate(&self) -> DerivedMesh<'_> {
        let mut faces = Vec::with_capacity(self.faces.len());

        for (index, face) in self.faces.iter().enumerate() {
            let uvs = self
                .uv_layer
                .as_ref()
                .and_then(|layer| layer.get(index))
                .filter(|uvs| uvs.len() == face.vertices.len());

            if face.vertices.len() <= 4 {
                faces.push(TessFace {
                    source_index: index,
                    vertices: face.vertices.clone(),
                    uvs: uvs.cloned(),
                    material_index: face.material_index,
                });
                continue;
            }

            for (a, b) in (1..face.vertices.len()).tuple_windows() {
                faces.push(TessFace {
                    source_index: index,
                    vertices: vec![face.vertices[0], face.vertices[a], face.vertices[b]],
                    uvs: uvs.map(|uvs| vec![uvs[0], uvs[a], uvs[b]]),
                    material_index: face.material_index,
                });
            }
        }

        log::trace!(
            "Acquired derived mesh ({} faces from {} polygons)",
            faces.len(),
            self.faces.len()
        );

        DerivedMesh {
            positions: &self.positions,
            normals: &self.normals,
            faces,
            has_uv_layer: self.uv_layer.is_some(),
            materials: &self.materials,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TessFace {
    pub source_index: usize,
    pub vertices: Vec<u32>,
    pub uvs: Option<Vec<Vec2>>,
    pub material_index: usize,
}

pub struct DerivedMesh<'a> {
    pub positions: &'a [Vec3],
    pub normals: &'a [Vec3],
    pub faces: Vec<TessFace>,
    pub has_uv_layer: bool,
    pub materials: &'a [Option<Material>],
}

impl Drop for DerivedMesh<'_> {
    fn drop(&mut self) {
        log::trace!("Released derived mesh ({} faces)", self.faces.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon(corners: u32) -> MeshData {
        MeshData {
            positions: (0..corners).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect(),
            normals: vec![Vec3::Z; corners as usize],
            faces: vec![Face::new((0..corners).collect::<Vec<_>>(), 0)],
            uv_layer: Some(vec![(0..corners)
                .map(|i| Vec2::new(i as f32, 0.0))
                .collect()]),
            materials: vec![Some(Material::new("Asphalt"))],
        }
    }

    #[test]
    fn triangles_and_quads_pass_through() {
        let quad = polygon(4);
        let derived = quad.evaluate();

        assert_eq!(derived.faces.len(), 1);
        assert_eq!(derived.faces[0].vertices, vec![0, 1, 2, 3]);
        assert!(derived.has_uv_layer);
    }

    #[test]
    fn ngons_become_fans() {
        let hexagon = polygon(6);
        let derived = hexagon.evaluate();

        let fans: Vec<_> = derived.faces.iter().map(|f| f.vertices.clone()).collect();
        assert_eq!(
            fans,
            vec![vec![0, 1, 2], vec![0, 2, 3], vec![0, 3, 4], vec![0, 4, 5]]
        );
        assert_eq!(
            derived.faces[2].uvs,
            Some(vec![Vec2::ZERO, Vec2::new(3.0, 0.0), Vec2::new(4.0, 0.0)])
        );
        assert!(derived.faces.iter().all(|f| f.source_index == 0));
    }

    #[test]
    fn local_bounds() {
        let bounds = polygon(3).local_bounds().expect("mesh has vertices");

        assert_eq!(bounds.size(), Vec3::new(2.0, 0.0, 0.0));
        assert!(MeshData::default().local_bounds().is_none());
    }
}
