use std::collections::HashMap;

use crate::model::Vertex;

/// Collects unique vertices in first-seen order.
#[derive(Debug, Default)]
pub struct VertexDeduplicator {
    vertices: Vec<Vertex>,
    indices_by_vertex: HashMap<Vertex, u32>,
}

impl VertexDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, vertex: Vertex) -> u32 {
        *self.indices_by_vertex.entry(vertex).or_insert_with(|| {
            self.vertices.push(vertex);
            (self.vertices.len() - 1) as u32
        })
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }
}

/// Splits a raw vertex stream into unique vertices and one index per input vertex.
pub fn dedupe(raw_vertices: impl IntoIterator<Item = Vertex>) -> (Vec<Vertex>, Vec<u32>) {
    let mut deduplicator = VertexDeduplicator::new();
    let indices = raw_vertices
        .into_iter()
        .map(|vertex| deduplicator.insert(vertex))
        .collect();

    (deduplicator.into_vertices(), indices)
}
