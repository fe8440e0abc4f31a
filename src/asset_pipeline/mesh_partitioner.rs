use std::collections::BTreeSet;

use glam::{Mat4, Vec2, Vec3};

use crate::asset_pipeline::materials::MaterialsWriter;
use crate::asset_pipeline::vertex_dedup::VertexDeduplicator;
use crate::error::{ExportError, Result};
use crate::math::coordinates::convert_vector3;
use crate::model::{MeshPartition, Vertex};
use crate::scene_graph::mesh::{DerivedMesh, Material, TessFace};
use crate::scene_graph::object3d::is_excluded_name;
use crate::scene_graph::{Object3D, Scene};

/// Corner order of the triangles emitted per face. Flips the winding for the engine.
const TRIANGLE_CORNERS: [usize; 3] = [1, 2, 0];
const QUAD_SECOND_TRIANGLE_CORNERS: [usize; 3] = [2, 3, 0];

/// One partition per used material slot, in slot order, with vertices in converted world space.
pub fn split_object_by_materials(
    scene: &Scene,
    object: &Object3D,
    materials: &dyn MaterialsWriter,
) -> Result<Vec<MeshPartition>> {
    let Some(mesh) = object.mesh_data() else {
        return Ok(Vec::new());
    };

    let derived = mesh.evaluate();
    let partitioner = Partitioner {
        object,
        derived: &derived,
        world_matrix: scene.world_matrix(object),
        dimensions: object.dimensions(),
    };

    if derived.materials.is_empty() {
        return Err(ExportError::NoMaterials(object.name.clone()));
    }

    let used_slots: BTreeSet<usize> = derived.faces.iter().map(|f| f.material_index).collect();

    used_slots
        .into_iter()
        .map(|slot| -> Result<MeshPartition> {
            let material = partitioner.material(slot)?;
            let mut partition = partitioner.partition(slot, material)?;
            partition.material_id = materials.material_id(&material.name);

            log::debug!(
                "'{}' material '{}': {} vertices, {} triangles",
                object.name,
                material.name,
                partition.vertices.len(),
                partition.triangle_count()
            );

            Ok(partition)
        })
        .collect()
}

struct Partitioner<'a> {
    object: &'a Object3D,
    derived: &'a DerivedMesh<'a>,
    world_matrix: Mat4,
    dimensions: Vec3,
}

impl<'a> Partitioner<'a> {
    fn material(&self, slot: usize) -> Result<&'a Material> {
        let material = self
            .derived
            .materials
            .get(slot)
            .and_then(Option::as_ref)
            .ok_or_else(|| ExportError::EmptyMaterialSlot {
                slot,
                object: self.object.name.clone(),
            })?;

        if is_excluded_name(&material.name) {
            return Err(ExportError::ExcludedMaterialUsed {
                material: material.name.clone(),
                object: self.object.name.clone(),
            });
        }

        Ok(material)
    }

    fn partition(&self, slot: usize, material: &Material) -> Result<MeshPartition> {
        let mut deduplicator = VertexDeduplicator::new();
        let mut indices = Vec::new();

        for face in self.derived.faces.iter().filter(|f| f.material_index == slot) {
            if !(3..=4).contains(&face.vertices.len()) {
                return Err(self.invalid(format!(
                    "face {} has {} corners",
                    face.source_index,
                    face.vertices.len()
                )));
            }

            let mut face_indices = [0u32; 4];
            for corner in 0..face.vertices.len() {
                let vertex = self.vertex(face, corner, material)?;
                face_indices[corner] = deduplicator.insert(vertex);
            }

            indices.extend(TRIANGLE_CORNERS.map(|corner| face_indices[corner]));
            if face.vertices.len() == 4 {
                indices.extend(QUAD_SECOND_TRIANGLE_CORNERS.map(|corner| face_indices[corner]));
            }
        }

        Ok(MeshPartition {
            material_id: None,
            vertices: deduplicator.into_vertices(),
            indices,
        })
    }

    fn vertex(&self, face: &TessFace, corner: usize, material: &Material) -> Result<Vertex> {
        let index = face.vertices[corner] as usize;
        let (Some(&local_position), Some(&normal)) = (
            self.derived.positions.get(index),
            self.derived.normals.get(index),
        ) else {
            return Err(self.invalid(format!(
                "face {} references missing vertex {}",
                face.source_index, index
            )));
        };

        let position = convert_vector3(self.world_matrix.transform_point3(local_position));
        let normal = convert_vector3(normal);

        let tex_coords = if self.derived.has_uv_layer {
            face.uvs
                .as_ref()
                .map(|uvs| Vec2::new(uvs[corner].x, -uvs[corner].y))
                .unwrap_or(Vec2::ZERO)
        } else {
            self.fallback_uv(local_position, material)
        };

        Ok(Vertex::new(position, normal, tex_coords))
    }

    /// Planar projection on the object's X/Y extent, for meshes without a UV layer.
    fn fallback_uv(&self, local_position: Vec3, material: &Material) -> Vec2 {
        let project = |coordinate: f32, size: f32| {
            if size == 0.0 {
                0.0
            } else {
                coordinate / size
            }
        };
        let uv = Vec2::new(
            project(local_position.x, self.dimensions.x),
            project(local_position.y, self.dimensions.y),
        );

        match material.texture_transform {
            Some(transform) => uv * transform.scale + transform.offset,
            None => uv,
        }
    }

    fn invalid(&self, reason: String) -> ExportError {
        ExportError::InvalidMesh {
            object: self.object.name.clone(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use glam::Quat;

    use super::*;
    use crate::scene_graph::{Face, MeshData, Transform};

    fn material_ids() -> HashMap<String, u32> {
        HashMap::from([("Asphalt".to_string(), 4), ("Grass".to_string(), 7)])
    }

    fn quad_mesh() -> MeshData {
        MeshData {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            normals: vec![Vec3::Z; 4],
            faces: vec![Face::new([0, 1, 2, 3], 0)],
            uv_layer: Some(vec![vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ]]),
            materials: vec![Some(Material::new("Asphalt"))],
        }
    }

    fn split(mesh: MeshData) -> Result<Vec<MeshPartition>> {
        split_transformed(mesh, Transform::IDENTITY)
    }

    fn split_transformed(mesh: MeshData, transform: Transform) -> Result<Vec<MeshPartition>> {
        let mut scene = Scene::new();
        let id = scene.add_object(Object3D::mesh("Track", mesh).with_transform(transform));
        split_object_by_materials(&scene, scene.get_object(id).unwrap(), &material_ids())
    }

    #[test]
    fn quad_becomes_two_triangles() {
        let partitions = split(quad_mesh()).unwrap();

        assert_eq!(partitions.len(), 1);
        let partition = &partitions[0];
        // A, B, C, D are first seen in order, so they get indices 0..4.
        assert_eq!(partition.indices, vec![1, 2, 0, 2, 3, 0]);
        assert_eq!(partition.material_id, Some(4));
    }

    #[test]
    fn positions_are_converted_and_uvs_flipped() {
        let partition = split(quad_mesh()).unwrap().remove(0);

        assert_eq!(partition.vertices[2].position, Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(partition.vertices[2].normal, Vec3::Y);
        assert_eq!(partition.vertices[2].tex_coords, Vec2::new(1.0, -1.0));
        assert_eq!(partition.vertices[2].tangent, Vec3::X);
    }

    #[test]
    fn positions_use_the_world_matrix_but_normals_do_not() {
        let transform = Transform::from_scale_rotation_translation(
            Vec3::ONE,
            Quat::IDENTITY,
            Vec3::new(10.0, 0.0, 5.0),
        );
        let partition = split_transformed(quad_mesh(), transform).unwrap().remove(0);

        assert_eq!(partition.vertices[0].position, Vec3::new(10.0, 5.0, 0.0));
        assert_eq!(partition.vertices[0].normal, Vec3::Y);
    }

    #[test]
    fn shared_corners_are_merged() {
        let mut mesh = quad_mesh();
        mesh.faces = vec![Face::new([0, 1, 2], 0), Face::new([0, 2, 3], 0)];
        mesh.uv_layer = None;

        let partition = split(mesh).unwrap().remove(0);

        assert_eq!(partition.vertices.len(), 4);
        assert_eq!(partition.indices, vec![1, 2, 0, 2, 3, 0]);
    }

    #[test]
    fn differing_uvs_split_corners() {
        let mut mesh = quad_mesh();
        mesh.faces = vec![Face::new([0, 1, 2], 0), Face::new([0, 2, 3], 0)];
        mesh.uv_layer = Some(vec![
            vec![Vec2::ZERO, Vec2::X, Vec2::ONE],
            vec![Vec2::ZERO, Vec2::new(0.5, 0.5), Vec2::Y],
        ]);

        let partition = split(mesh).unwrap().remove(0);

        assert_eq!(partition.vertices.len(), 5);
        assert_eq!(partition.indices, vec![1, 2, 0, 3, 4, 0]);
    }

    #[test]
    fn faces_without_matching_uvs_get_zero_uvs() {
        let mut mesh = quad_mesh();
        mesh.uv_layer = Some(vec![vec![Vec2::ONE; 3]]);

        let partition = split(mesh).unwrap().remove(0);

        assert_eq!(partition.vertices.len(), 4);
        assert!(partition
            .vertices
            .iter()
            .all(|vertex| vertex.tex_coords == Vec2::ZERO));
    }

    #[test]
    fn partitions_follow_slot_order() {
        let mut mesh = quad_mesh();
        mesh.materials = vec![
            Some(Material::new("Asphalt")),
            None,
            Some(Material::new("Grass")),
        ];
        mesh.faces = vec![Face::new([0, 1, 2], 2), Face::new([0, 2, 3], 0)];
        mesh.uv_layer = None;

        let partitions = split(mesh).unwrap();

        assert_eq!(
            partitions.iter().map(|p| p.material_id).collect::<Vec<_>>(),
            vec![Some(4), Some(7)]
        );
        assert!(partitions.iter().all(|p| p.vertices.len() == 3));
    }

    #[test]
    fn unknown_material_has_no_id() {
        let mut mesh = quad_mesh();
        mesh.materials = vec![Some(Material::new("Gravel"))];

        assert_eq!(split(mesh).unwrap()[0].material_id, None);
    }

    #[test]
    fn fallback_uvs_project_local_positions() {
        let mut mesh = quad_mesh();
        mesh.uv_layer = None;
        mesh.materials = vec![Some(
            Material::new("Asphalt").with_texture_transform(Vec2::splat(2.0), Vec2::new(0.5, 0.0)),
        )];
        let transform = Transform::from_scale_rotation_translation(
            Vec3::new(2.0, 4.0, 1.0),
            Quat::IDENTITY,
            Vec3::new(100.0, 0.0, 0.0),
        );

        let partition = split_transformed(mesh, transform).unwrap().remove(0);

        // dimensions are (2, 4, 0), vertex C sits at local (1, 1)
        assert_eq!(partition.vertices[2].tex_coords, Vec2::new(1.5, 0.5));
    }

    #[test]
    fn objects_without_materials_fail() {
        let mut mesh = quad_mesh();
        mesh.materials.clear();

        assert!(matches!(split(mesh), Err(ExportError::NoMaterials(name)) if name == "Track"));
    }

    #[test]
    fn empty_slots_fail() {
        let mut mesh = quad_mesh();
        mesh.materials = vec![None];

        assert!(matches!(
            split(mesh),
            Err(ExportError::EmptyMaterialSlot { slot: 0, .. })
        ));
    }

    #[test]
    fn excluded_materials_fail_when_used() {
        let mut mesh = quad_mesh();
        mesh.materials = vec![Some(Material::new("__Collider"))];
        assert!(matches!(
            split(mesh),
            Err(ExportError::ExcludedMaterialUsed { material, .. }) if material == "__Collider"
        ));

        let mut mesh = quad_mesh();
        mesh.materials.push(Some(Material::new("__Unused")));
        assert!(split(mesh).is_ok());
    }

    #[test]
    fn dangling_vertex_references_fail() {
        let mut mesh = quad_mesh();
        mesh.faces = vec![Face::new([0, 1, 9], 0)];

        assert!(matches!(split(mesh), Err(ExportError::InvalidMesh { .. })));
    }
}
