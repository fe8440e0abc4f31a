use crate::settings::{NodeOverrides, Settings};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeProperties {
    pub lod_in: f32,
    pub lod_out: f32,
    pub layer: u32,
    pub cast_shadows: bool,
    pub visible: bool,
    pub transparent: bool,
    pub renderable: bool,
}

impl Default for NodeProperties {
    fn default() -> Self {
        Self {
            lod_in: 0.0,
            lod_out: 0.0,
            layer: 0,
            cast_shadows: true,
            visible: true,
            transparent: false,
            renderable: true,
        }
    }
}

impl NodeProperties {
    pub fn apply(&mut self, overrides: &NodeOverrides) {
        if let Some(lod_in) = overrides.lod_in {
            self.lod_in = lod_in;
        }
        if let Some(lod_out) = overrides.lod_out {
            self.lod_out = lod_out;
        }
        if let Some(layer) = overrides.layer {
            self.layer = layer;
        }
        if let Some(cast_shadows) = overrides.cast_shadows {
            self.cast_shadows = cast_shadows;
        }
        if let Some(visible) = overrides.visible {
            self.visible = visible;
        }
        if let Some(transparent) = overrides.transparent {
            self.transparent = transparent;
        }
        if let Some(renderable) = overrides.renderable {
            self.renderable = renderable;
        }
    }
}

/// Anchored, case-insensitive glob where `*` matches any run of characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    // Literal text between the wildcards, lowercased. A single segment means no wildcard.
    segments: Vec<String>,
}

impl WildcardPattern {
    pub fn new(pattern: &str) -> Self {
        Self {
            segments: pattern.to_lowercase().split('*').map(String::from).collect(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();

        let Some((first, rest)) = self.segments.split_first() else {
            return name.is_empty();
        };
        let Some((last, middle)) = rest.split_last() else {
            return name == *first;
        };

        if name.len() < first.len() + last.len()
            || !name.starts_with(first.as_str())
            || !name.ends_with(last.as_str())
        {
            return false;
        }

        let mut remaining = &name[first.len()..name.len() - last.len()];
        for segment in middle {
            match remaining.find(segment.as_str()) {
                Some(position) => remaining = &remaining[position + segment.len()..],
                None => return false,
            }
        }

        true
    }
}

/// One `"nodes"` entry of the settings: `|`-separated name patterns and the overrides they apply.
#[derive(Debug, Clone)]
pub struct NodeSettings {
    key: String,
    patterns: Vec<WildcardPattern>,
    overrides: NodeOverrides,
}

impl NodeSettings {
    pub fn new(key: &str, overrides: NodeOverrides) -> Self {
        Self {
            key: key.to_string(),
            patterns: key.split('|').map(WildcardPattern::new).collect(),
            overrides,
        }
    }

    pub fn from_settings(settings: &Settings) -> Vec<NodeSettings> {
        settings
            .nodes
            .iter()
            .map(|(key, overrides)| NodeSettings::new(key, overrides.clone()))
            .collect()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn matches(&self, node_name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(node_name))
    }

    pub fn apply_to(&self, node_name: &str, properties: &mut NodeProperties) {
        if self.matches(node_name) {
            log::debug!("Node settings '{}' apply to '{}'", self.key, node_name);
            properties.apply(&self.overrides);
        }
    }
}

/// Runs every rule in order over the node's authored properties.
pub fn resolve_properties(
    rules: &[NodeSettings],
    node_name: &str,
    authored: NodeProperties,
) -> NodeProperties {
    let mut properties = authored;
    for rule in rules {
        rule.apply_to(node_name, &mut properties);
    }
    properties
}
