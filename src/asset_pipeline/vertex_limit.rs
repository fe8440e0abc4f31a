use std::collections::HashMap;

use crate::model::MeshPartition;

/// Vertex ceiling of a single mesh record; indices are written as u16.
pub const VERTEX_LIMIT: usize = 1 << 16;

/// A chunk is closed once it holds this many vertices, leaving room for one more triangle.
const CHUNK_CLOSE_THRESHOLD: usize = VERTEX_LIMIT - 3;

pub fn split_meshes_for_vertex_limit(partitions: Vec<MeshPartition>) -> Vec<MeshPartition> {
    let mut result = Vec::with_capacity(partitions.len());

    for partition in partitions {
        if partition.vertices.len() <= VERTEX_LIMIT {
            result.push(partition);
            continue;
        }

        let chunks = split_partition(&partition);
        log::debug!(
            "Split partition of {} vertices into {} chunks",
            partition.vertices.len(),
            chunks.len()
        );
        result.extend(chunks);
    }

    result
}

// Triangles are never divided between chunks.
fn split_partition(partition: &MeshPartition) -> Vec<MeshPartition> {
    let mut chunks = Vec::new();
    let mut triangles = partition.indices.chunks_exact(3).peekable();

    while triangles.peek().is_some() {
        let mut local_indices: HashMap<u32, u32> = HashMap::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for triangle in triangles.by_ref() {
            for &source_index in triangle {
                let local_index = *local_indices.entry(source_index).or_insert_with(|| {
                    vertices.push(partition.vertices[source_index as usize]);
                    (vertices.len() - 1) as u32
                });
                indices.push(local_index);
            }

            if vertices.len() >= CHUNK_CLOSE_THRESHOLD {
                break;
            }
        }

        chunks.push(MeshPartition {
            material_id: partition.material_id,
            vertices,
            indices,
        });
    }

    chunks
}
