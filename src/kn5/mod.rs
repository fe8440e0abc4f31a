pub mod binary;
pub mod engine_objects;
pub mod node_settings;
pub mod node_writer;

pub use node_settings::{NodeProperties, NodeSettings};
pub use node_writer::{NodeWriter, ROOT_NODE_NAME};
