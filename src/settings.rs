use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Per-node render attribute overrides. A missing key means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOverrides {
    pub lod_in: Option<f32>,
    pub lod_out: Option<f32>,
    pub layer: Option<u32>,
    pub cast_shadows: Option<bool>,
    #[serde(rename = "isVisible")]
    pub visible: Option<bool>,
    #[serde(rename = "isTransparent")]
    pub transparent: Option<bool>,
    #[serde(rename = "isRenderable")]
    pub renderable: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    nodes: serde_json::Map<String, serde_json::Value>,
}

/// Export settings. Only the `"nodes"` section is understood, other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub nodes: Vec<(String, NodeOverrides)>,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Settings> {
        let file: SettingsFile = serde_json::from_str(json)?;

        let nodes = file
            .nodes
            .into_iter()
            .map(|(key, value)| -> Result<(String, NodeOverrides)> {
                Ok((key, serde_json::from_value(value)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Settings { nodes })
    }

    /// Reads `settings.json` from `directory`. A missing file yields empty settings.
    pub fn load_from_dir(directory: &Path) -> Result<Settings> {
        let path = directory.join(SETTINGS_FILE_NAME);

        if !path.exists() {
            log::debug!("No settings file at {}", path.display());
            return Ok(Settings::default());
        }

        log::info!("Loading settings from {}", path.display());
        Settings::from_json(&fs::read_to_string(&path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_keys_keep_declaration_order() {
        let settings = Settings::from_json(
            r#"{
                "materials": { "ignored": true },
                "nodes": {
                    "Wheel_*": { "lodOut": 150.0, "castShadows": false },
                    "AC_*|Kerb*": { "layer": 2, "isVisible": false },
                    "Another": {}
                }
            }"#,
        )
        .unwrap();

        let keys: Vec<_> = settings.nodes.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, ["Wheel_*", "AC_*|Kerb*", "Another"]);

        assert_eq!(
            settings.nodes[0].1,
            NodeOverrides {
                lod_out: Some(150.0),
                cast_shadows: Some(false),
                ..Default::default()
            }
        );
        assert_eq!(settings.nodes[1].1.layer, Some(2));
        assert_eq!(settings.nodes[1].1.visible, Some(false));
        assert_eq!(settings.nodes[2].1, NodeOverrides::default());
    }

    #[test]
    fn transparency_and_renderability_keys() {
        let settings = Settings::from_json(
            r#"{ "nodes": { "Glass": { "isTransparent": true, "isRenderable": false, "lodIn": 5 } } }"#,
        )
        .unwrap();

        let overrides = &settings.nodes[0].1;
        assert_eq!(overrides.transparent, Some(true));
        assert_eq!(overrides.renderable, Some(false));
        assert_eq!(overrides.lod_in, Some(5.0));
    }

    #[test]
    fn missing_nodes_section() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn wrong_value_type_is_an_error() {
        assert!(Settings::from_json(r#"{ "nodes": { "A": { "layer": "two" } } }"#).is_err());
    }

    #[test]
    fn missing_settings_file() {
        let directory = std::env::temp_dir().join("kn5export-no-settings-here");

        assert_eq!(
            Settings::load_from_dir(&directory).unwrap(),
            Settings::default()
        );
    }
}
