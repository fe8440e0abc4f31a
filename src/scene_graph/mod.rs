pub mod gltf_import;
pub mod mesh;
pub mod object3d;
pub mod scene;
pub mod transform;

pub use mesh::{Face, Material, MeshData, TextureTransform};
pub use object3d::{Object3D, ObjectId, ObjectKind};
pub use scene::Scene;
pub use transform::Transform;
