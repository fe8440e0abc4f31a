use glam::Vec3;

use crate::model::Vertex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    /// Radius is twice the largest half extent of the box, not the tight sphere.
    pub fn from_vertices(vertices: &[Vertex]) -> BoundingSphere {
        match AABB::from_points(vertices.iter().map(|vertex| vertex.position)) {
            Some(aabb) => BoundingSphere {
                center: aabb.center(),
                radius: aabb.half_extents().max_element() * 2.0,
            },
            None => BoundingSphere {
                center: Vec3::ZERO,
                radius: 0.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(point1: Vec3, point2: Vec3) -> AABB {
        let min = point1.min(point2);
        let max = point1.max(point2);
        AABB { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<AABB> {
        let mut points = points.into_iter();
        let first = points.next()?;

        Some(points.fold(AABB::new(first, first), |aabb, point| AABB {
            min: aabb.min.min(point),
            max: aabb.max.max(point),
        }))
    }

    pub fn center(&self) -> Vec3 {
        self.min + (self.max - self.min) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }
}
