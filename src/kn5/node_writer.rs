use std::io::Write;

use glam::Mat4;
use itertools::Itertools;

use crate::asset_pipeline::materials::MaterialsWriter;
use crate::asset_pipeline::mesh_partitioner::split_object_by_materials;
use crate::asset_pipeline::vertex_limit::{split_meshes_for_vertex_limit, VERTEX_LIMIT};
use crate::error::{ExportError, Result};
use crate::kn5::binary::{Kn5WriteExt, NodeClass};
use crate::kn5::engine_objects::is_engine_object;
use crate::kn5::node_settings::{resolve_properties, NodeProperties, NodeSettings};
use crate::math::bounds::BoundingSphere;
use crate::math::coordinates::convert_matrix;
use crate::model::MeshPartition;
use crate::scene_graph::{Object3D, Scene};
use crate::settings::Settings;

/// Name of the synthetic node holding every top-level object.
pub const ROOT_NODE_NAME: &str = "BlenderFile";

/// Writes the node tree of a scene.
///
/// The stream starts with one root node whose children are the top-level objects. Top-level
/// objects are visited by ascending descendant count (stable), everything below them in native
/// child order. Objects named `__*` are skipped along with their subtree.
pub struct NodeWriter<'a> {
    scene: &'a Scene,
    materials: &'a dyn MaterialsWriter,
    node_settings: Vec<NodeSettings>,
    root_name: String,
}

impl<'a> NodeWriter<'a> {
    pub fn new(scene: &'a Scene, settings: &Settings, materials: &'a dyn MaterialsWriter) -> Self {
        Self {
            scene,
            materials,
            node_settings: NodeSettings::from_settings(settings),
            root_name: ROOT_NODE_NAME.to_string(),
        }
    }

    pub fn with_root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = root_name.into();
        self
    }

    /// Appends the node stream to `sink` and any warnings to `warnings`.
    ///
    /// The stream is assembled in memory first; on error neither `sink` nor `warnings` is touched.
    pub fn write(&self, sink: &mut impl Write, warnings: &mut Vec<String>) -> Result<()> {
        let mut stream = NodeStream::default();

        self.write_root(&mut stream)?;
        for (_, object) in self
            .scene
            .root_objects()
            .sorted_by_key(|(_, object)| self.scene.descendant_count(object))
        {
            self.write_object(&mut stream, object)?;
        }

        sink.write_all(&stream.out)?;

        log::info!(
            "Wrote {} nodes ({} bytes) with {} warnings",
            stream.node_count,
            stream.out.len(),
            stream.warnings.len()
        );
        warnings.extend(stream.warnings);

        Ok(())
    }

    pub fn to_bytes(&self) -> Result<(Vec<u8>, Vec<String>)> {
        let mut out = Vec::new();
        let mut warnings = Vec::new();
        self.write(&mut out, &mut warnings)?;
        Ok((out, warnings))
    }

    fn write_root(&self, stream: &mut NodeStream) -> Result<()> {
        let child_count = self
            .scene
            .root_objects()
            .filter(|(_, object)| !object.is_excluded())
            .count();

        stream.write_base_node_data(&self.root_name, child_count, &Mat4::IDENTITY)
    }

    fn write_object(&self, stream: &mut NodeStream, object: &Object3D) -> Result<()> {
        if object.is_excluded() {
            log::debug!("Skipping excluded object '{}'", object.name);
            return Ok(());
        }

        if object.is_mesh() {
            if !object.child_ids.is_empty() {
                return Err(ExportError::MeshWithChildren(object.name.clone()));
            }
            return self.write_mesh_node(stream, object);
        }

        self.write_base_node(stream, object)?;
        for (_, child) in self.scene.children(object) {
            self.write_object(stream, child)?;
        }

        Ok(())
    }

    fn write_base_node(&self, stream: &mut NodeStream, object: &Object3D) -> Result<()> {
        if !is_engine_object(&object.name) && !self.scene.any_descendant_is_mesh(object) {
            stream.warn(format!(
                "Unknown logical object '{0}' might prevent other objects from loading.\n\tRename it to '__{0}' if you do not want to export it.",
                object.name
            ));
        }

        let child_count = self
            .scene
            .children(object)
            .filter(|(_, child)| !child.is_excluded())
            .count();
        let transform = convert_matrix(object.transform.local_matrix());

        stream.write_base_node_data(&object.name, child_count, &transform)
    }

    fn write_mesh_node(&self, stream: &mut NodeStream, object: &Object3D) -> Result<()> {
        let partitions = split_object_by_materials(self.scene, object, self.materials)?;
        let partitions = split_meshes_for_vertex_limit(partitions);

        let parent = object.parent_id.and_then(|id| self.scene.get_object(id));

        // Vertices are in world space, so a parent's transform has to be undone.
        if parent.is_some() || partitions.len() != 1 {
            let transform = parent
                .map(|parent| convert_matrix(self.scene.world_matrix(parent).inverse()))
                .unwrap_or(Mat4::IDENTITY);

            stream.write_base_node_data(&object.name, partitions.len(), &transform)?;
        }

        let properties = resolve_properties(&self.node_settings, &object.name, object.properties);
        for partition in &partitions {
            stream.write_mesh(&object.name, partition, &properties)?;
        }

        Ok(())
    }
}

#[derive(Default)]
struct NodeStream {
    out: Vec<u8>,
    warnings: Vec<String>,
    node_count: usize,
}

impl NodeStream {
    fn warn(&mut self, warning: String) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn write_base_node_data(
        &mut self,
        name: &str,
        child_count: usize,
        transform: &Mat4,
    ) -> Result<()> {
        log::debug!("Node '{}' with {} children", name, child_count);
        self.node_count += 1;

        self.out.write_node_class(NodeClass::Node)?;
        self.out.write_string(name)?;
        self.out.write_u32(child_count as u32)?;
        self.out.write_bool(true)?;
        self.out.write_mat4(transform)?;
        Ok(())
    }

    fn write_mesh(
        &mut self,
        name: &str,
        mesh: &MeshPartition,
        properties: &NodeProperties,
    ) -> Result<()> {
        if mesh.vertices.len() > VERTEX_LIMIT {
            return Err(ExportError::VertexLimitExceeded {
                limit: VERTEX_LIMIT,
                object: name.to_string(),
            });
        }

        log::debug!(
            "Mesh '{}' with {} vertices and {} indices",
            name,
            mesh.vertices.len(),
            mesh.indices.len()
        );
        self.node_count += 1;

        self.out.write_node_class(NodeClass::Mesh)?;
        self.out.write_string(name)?;
        // Meshes never have children
        self.out.write_u32(0)?;
        self.out.write_bool(true)?;
        self.out.write_bool(properties.cast_shadows)?;
        self.out.write_bool(properties.visible)?;
        self.out.write_bool(properties.transparent)?;

        self.out.write_u32(mesh.vertices.len() as u32)?;
        for vertex in &mesh.vertices {
            self.out.write_vertex(vertex)?;
        }

        self.out.write_u32(mesh.indices.len() as u32)?;
        for &index in &mesh.indices {
            let index = u16::try_from(index).map_err(|_| ExportError::VertexLimitExceeded {
                limit: VERTEX_LIMIT,
                object: name.to_string(),
            })?;
            self.out.write_u16(index)?;
        }

        let material_id = match mesh.material_id {
            Some(id) => id,
            None => {
                self.warn(format!("No material to mesh '{}' assigned", name));
                0
            }
        };
        self.out.write_u32(material_id)?;
        self.out.write_u32(properties.layer)?;
        self.out.write_f32(properties.lod_in)?;
        self.out.write_f32(properties.lod_out)?;

        let sphere = BoundingSphere::from_vertices(&mesh.vertices);
        self.out.write_vec3(sphere.center)?;
        self.out.write_f32(sphere.radius)?;

        self.out.write_bool(properties.renderable)?;
        Ok(())
    }
}
