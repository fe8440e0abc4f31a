use glam::Mat4;
use id_arena::Arena;

use crate::scene_graph::object3d::{Object3D, ObjectId};

/// Read-only snapshot of the authoring tool's object tree, in native object order.
pub struct Scene {
    objects: Arena<Object3D>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    pub fn add_child(&mut self, parent_id: ObjectId, object: Object3D) -> ObjectId {
        let object_id = self.add_object(object);
        self.set_object_parent(object_id, Some(parent_id));
        object_id
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn root_objects(&self) -> impl Iterator<Item = (ObjectId, &Object3D)> + '_ {
        self.objects
            .iter()
            .filter(|(_, object)| object.parent_id.is_none())
    }

    pub fn children<'a>(
        &'a self,
        object: &'a Object3D,
    ) -> impl Iterator<Item = (ObjectId, &'a Object3D)> + 'a {
        object
            .child_ids
            .iter()
            .filter_map(move |&id| self.objects.get(id).map(|child| (id, child)))
    }

    /// Sets the parent of an object and updates child relationships
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        // Remove from old parent's children list
        if let Some(old_parent_id) = self.objects.get(child_id).and_then(|c| c.parent_id) {
            if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                old_parent.child_ids.retain(|&id| id != child_id);
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;
        }

        if let Some(new_parent) = new_parent_id.and_then(|id| self.objects.get_mut(id)) {
            new_parent.child_ids.push(child_id);
        }
    }

    /// Object-to-world matrix, composed from the local transforms up the parent chain.
    pub fn world_matrix(&self, object: &Object3D) -> Mat4 {
        let local_matrix = object.transform.local_matrix();

        match object.parent_id.and_then(|id| self.objects.get(id)) {
            Some(parent) => self.world_matrix(parent) * local_matrix,
            None => local_matrix,
        }
    }

    pub fn descendant_count(&self, object: &Object3D) -> usize {
        self.children(object)
            .map(|(_, child)| 1 + self.descendant_count(child))
            .sum()
    }

    pub fn any_descendant_is_mesh(&self, object: &Object3D) -> bool {
        self.children(object)
            .any(|(_, child)| child.is_mesh() || self.any_descendant_is_mesh(child))
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.objects.iter().map(|(_, object)| &object.name))
            .finish()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
