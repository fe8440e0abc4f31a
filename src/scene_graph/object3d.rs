use glam::Vec3;
use id_arena::Id;

use crate::kn5::node_settings::NodeProperties;
use crate::scene_graph::mesh::MeshData;
use crate::scene_graph::transform::Transform;

pub type ObjectId = Id<Object3D>;

/// Objects whose name starts with this prefix are left out of the export, subtree included.
pub const EXCLUDED_PREFIX: &str = "__";

pub fn is_excluded_name(name: &str) -> bool {
    name.starts_with(EXCLUDED_PREFIX)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Mesh(MeshData),
    Empty,
}

#[derive(Debug, Clone)]
pub struct Object3D {
    pub name: String,
    pub kind: ObjectKind,
    pub transform: Transform,
    pub parent_id: Option<ObjectId>,
    pub child_ids: Vec<ObjectId>,
    pub properties: NodeProperties,
    dimensions: Option<Vec3>,
}

impl Object3D {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn mesh(name: impl Into<String>, mesh: MeshData) -> Self {
        Self {
            name: name.into(),
            kind: ObjectKind::Mesh(mesh),
            ..Default::default()
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_properties(mut self, properties: NodeProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_dimensions(mut self, dimensions: Vec3) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn mesh_data(&self) -> Option<&MeshData> {
        match &self.kind {
            ObjectKind::Mesh(mesh) => Some(mesh),
            ObjectKind::Empty => None,
        }
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, ObjectKind::Mesh(_))
    }

    pub fn is_excluded(&self) -> bool {
        is_excluded_name(&self.name)
    }

    /// Size of the object's local bounding box with its own scale applied.
    pub fn dimensions(&self) -> Vec3 {
        if let Some(dimensions) = self.dimensions {
            return dimensions;
        }

        self.mesh_data()
            .and_then(MeshData::local_bounds)
            .map(|bounds| bounds.size() * self.transform.scale().abs())
            .unwrap_or(Vec3::ZERO)
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: ObjectKind::Empty,
            transform: Transform::IDENTITY,
            parent_id: None,
            child_ids: Vec::new(),
            properties: NodeProperties::default(),
            dimensions: None,
        }
    }
}
