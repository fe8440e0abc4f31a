//! Exports an authoring-tool scene snapshot as a kn5 node stream.

pub mod asset_pipeline;
pub mod error;
pub mod kn5;
pub mod math;
pub mod model;
pub mod scene_graph;
pub mod settings;

pub use asset_pipeline::materials::{MaterialTable, MaterialsWriter};
pub use error::{ExportError, Result};
pub use kn5::NodeWriter;
pub use settings::Settings;
