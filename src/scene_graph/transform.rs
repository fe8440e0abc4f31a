use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    local_matrix: Mat4,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        local_matrix: Mat4::IDENTITY,
    };

    pub fn from_matrix(local_matrix: Mat4) -> Self {
        Self { local_matrix }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_matrix(Mat4::from_translation(translation))
    }

    pub fn from_scale_rotation_translation(scale: Vec3, rotation: Quat, translation: Vec3) -> Self {
        Self::from_matrix(Mat4::from_scale_rotation_translation(
            scale,
            rotation,
            translation,
        ))
    }

    pub fn local_matrix(&self) -> Mat4 {
        self.local_matrix
    }

    pub fn scale(&self) -> Vec3 {
        self.local_matrix.to_scale_rotation_translation().0
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
