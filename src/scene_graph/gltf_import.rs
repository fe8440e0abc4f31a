//! Builds a scene snapshot from a glTF document.
//!
//! glTF is Y-up; the snapshot is in the authoring tool's Z-up space, so every position, normal
//! and transform is rotated on the way in.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context};
use glam::{Mat4, Vec2, Vec3, Vec4};
use gltf::buffer;

use crate::asset_pipeline::materials::MaterialTable;
use crate::kn5::node_settings::NodeProperties;
use crate::scene_graph::mesh::{Face, Material, MeshData};
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::scene::Scene;
use crate::scene_graph::transform::Transform;
use crate::settings::NodeOverrides;

pub type Buffers<'a> = &'a [buffer::Data];

/// glTF (x, y, z) -> (x, -z, y)
const Y_UP_TO_Z_UP: Mat4 = Mat4::from_cols(Vec4::X, Vec4::Z, Vec4::NEG_Y, Vec4::W);

pub fn import_gltf(path: &Path) -> anyhow::Result<(Scene, MaterialTable)> {
    let (document, buffers, _images) =
        gltf::import(path).with_context(|| format!("Failed to import {}", path.display()))?;

    let gltf_scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("No scenes in gltf")?;

    let materials = material_table(&document);
    let scene = GltfImporter::new(&buffers).import_scene(&gltf_scene)?;

    log::info!(
        "Imported {} objects and {} materials from {}",
        scene.len(),
        materials.len(),
        path.display()
    );

    Ok((scene, materials))
}

fn material_table(document: &gltf::Document) -> MaterialTable {
    MaterialTable::from_names(document.materials().map(|m| material_name(&m)))
}

fn material_name(material: &gltf::Material) -> String {
    match (material.name(), material.index()) {
        (Some(name), _) => name.to_string(),
        (None, Some(index)) => format!("Material.{}", index),
        (None, None) => "Default material".to_string(),
    }
}

pub struct GltfImporter<'a> {
    buffers: Buffers<'a>,
    scene: Scene,
    gltf_mesh_to_mesh: HashMap<usize, MeshData>,
}

impl<'a> GltfImporter<'a> {
    pub fn new(buffers: Buffers<'a>) -> Self {
        Self {
            buffers,
            scene: Scene::new(),
            gltf_mesh_to_mesh: HashMap::new(),
        }
    }

    pub fn import_scene(mut self, gltf_scene: &gltf::Scene) -> anyhow::Result<Scene> {
        for node in gltf_scene.nodes() {
            self.import_node(&node, None)?;
        }

        Ok(self.scene)
    }

    fn import_node(
        &mut self,
        node: &gltf::Node,
        parent: Option<ObjectId>,
    ) -> anyhow::Result<ObjectId> {
        let node_name = node.name().unwrap_or("Unnamed").to_string();

        let mut object = match node.mesh() {
            Some(mesh) => Object3D::mesh(node_name, self.mesh_data(&mesh)?),
            None => Object3D::empty(node_name),
        };

        let local_matrix = Mat4::from_cols_array_2d(&node.transform().matrix());
        object.transform =
            Transform::from_matrix(Y_UP_TO_Z_UP * local_matrix * Y_UP_TO_Z_UP.inverse());
        object.properties = node_properties(node);

        let object_id = self.scene.add_object(object);
        if let Some(parent_id) = parent {
            self.scene.set_object_parent(object_id, Some(parent_id));
        }

        for child in node.children() {
            self.import_node(&child, Some(object_id))?;
        }

        Ok(object_id)
    }

    fn mesh_data(&mut self, mesh: &gltf::Mesh) -> anyhow::Result<MeshData> {
        if let Some(data) = self.gltf_mesh_to_mesh.get(&mesh.index()) {
            return Ok(data.clone());
        }

        let data = read_mesh(mesh, self.buffers)?;
        self.gltf_mesh_to_mesh.insert(mesh.index(), data.clone());
        Ok(data)
    }
}

fn read_mesh(mesh: &gltf::Mesh, buffers: Buffers) -> anyhow::Result<MeshData> {
    let mesh_name = mesh.name().unwrap_or("Unnamed mesh");
    let mut data = MeshData::default();
    let mut slots_by_material: HashMap<Option<usize>, usize> = HashMap::new();
    let mut corner_uvs = Vec::new();
    let mut has_uvs = true;

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            bail!(
                "Unsupported primitive mode in '{}': {:?}",
                mesh_name,
                primitive.mode()
            );
        }

        let material = primitive.material();
        let slot = *slots_by_material.entry(material.index()).or_insert_with(|| {
            data.materials
                .push(material.index().map(|_| Material::new(material_name(&material))));
            data.materials.len() - 1
        });

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .with_context(|| format!("Failed to read positions of '{}'", mesh_name))?
            .map(|p| Y_UP_TO_Z_UP.transform_vector3(Vec3::from(p)))
            .collect();

        let normals: Vec<Vec3> = match reader.read_normals() {
            Some(normals) => normals
                .map(|n| Y_UP_TO_Z_UP.transform_vector3(Vec3::from(n)))
                .collect(),
            None => {
                log::warn!("Mesh '{}' has no normals", mesh_name);
                vec![Vec3::Z; positions.len()]
            }
        };

        // The authoring tool's V axis points up, glTF's points down.
        let tex_coords: Option<Vec<Vec2>> = reader.read_tex_coords(0).map(|tex_coords| {
            tex_coords
                .into_f32()
                .map(|[u, v]| Vec2::new(u, 1.0 - v))
                .collect()
        });
        has_uvs &= tex_coords.is_some();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let vertex_offset = data.positions.len() as u32;
        for triangle in indices.chunks_exact(3) {
            data.faces.push(Face::new(
                triangle.iter().map(|&i| i + vertex_offset).collect::<Vec<_>>(),
                slot,
            ));
            corner_uvs.push(
                triangle
                    .iter()
                    .map(|&i| {
                        tex_coords
                            .as_ref()
                            .and_then(|uvs| uvs.get(i as usize).copied())
                            .unwrap_or(Vec2::ZERO)
                    })
                    .collect::<Vec<_>>(),
            );
        }

        data.positions.extend(positions);
        data.normals.extend(normals);
    }

    if has_uvs {
        data.uv_layer = Some(corner_uvs);
    }

    Ok(data)
}

fn node_properties(node: &gltf::Node) -> NodeProperties {
    let mut properties = NodeProperties::default();

    if let Some(extras) = node.extras() {
        match serde_json::from_str::<NodeOverrides>(extras.get()) {
            Ok(overrides) => properties.apply(&overrides),
            Err(err) => log::warn!(
                "Ignoring extras of node '{}': {}",
                node.name().unwrap_or("Unnamed"),
                err
            ),
        }
    }

    properties
}
