pub mod materials;
pub mod mesh_partitioner;
pub mod vertex_dedup;
pub mod vertex_limit;
