//! Remaps the authoring tool's right-handed Z-up space into the engine's Y-up space.

use glam::{Mat4, Quat, Vec3};

pub fn convert_vector3(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, -v.y)
}

pub fn convert_rotation(rotation: Quat) -> Quat {
    let (axis, angle) = rotation.to_axis_angle();
    Quat::from_axis_angle(convert_vector3(axis).normalize_or(Vec3::X), angle)
}

pub fn convert_scale(scale: Vec3) -> Vec3 {
    Vec3::new(scale.x, scale.z, scale.y)
}

/// Decomposes `matrix` and recomposes it as translation * rotation * scale in target space.
pub fn convert_matrix(matrix: Mat4) -> Mat4 {
    let (scale, rotation, translation) = matrix.to_scale_rotation_translation();

    Mat4::from_scale_rotation_translation(
        convert_scale(scale),
        convert_rotation(rotation),
        convert_vector3(translation),
    )
}
