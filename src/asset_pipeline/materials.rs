use std::collections::HashMap;

use crate::scene_graph::object3d::is_excluded_name;

/// Hands out the ids the material table of the kn5 file assigns to each material name.
pub trait MaterialsWriter {
    fn material_id(&self, material_name: &str) -> Option<u32>;
}

/// Material ids in order of registration. Excluded (`__`) materials get no id.
#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    names: Vec<String>,
    ids_by_name: HashMap<String, u32>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names(names: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        let mut table = Self::new();
        for name in names {
            table.add_material(name.as_ref());
        }
        table
    }

    pub fn add_material(&mut self, name: &str) -> Option<u32> {
        if is_excluded_name(name) {
            return None;
        }

        if let Some(&id) = self.ids_by_name.get(name) {
            return Some(id);
        }

        let id = self.names.len() as u32;
        self.names.push(name.to_string());
        self.ids_by_name.insert(name.to_string(), id);
        Some(id)
    }

    pub fn materials(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

impl MaterialsWriter for MaterialTable {
    fn material_id(&self, material_name: &str) -> Option<u32> {
        self.ids_by_name.get(material_name).copied()
    }
}

impl MaterialsWriter for HashMap<String, u32> {
    fn material_id(&self, material_name: &str) -> Option<u32> {
        self.get(material_name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_registration_order() {
        let table = MaterialTable::from_names(["Asphalt", "__Helper", "Grass", "Asphalt"]);

        assert_eq!(table.material_id("Asphalt"), Some(0));
        assert_eq!(table.material_id("Grass"), Some(1));
        assert_eq!(table.material_id("__Helper"), None);
        assert_eq!(table.material_id("Missing"), None);
        assert_eq!(table.materials().collect::<Vec<_>>(), ["Asphalt", "Grass"]);
        assert_eq!(table.len(), 2);
    }
}
