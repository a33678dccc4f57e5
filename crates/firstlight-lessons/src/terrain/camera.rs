//! Orbiting camera for the terrain lesson.

use glam::{Mat4, Vec3, Vec4};

/// Vertical field of view, degrees.
pub const FOV_Y_DEG: f32 = 60.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

/// Horizontal distance of the eye from the origin.
pub const ORBIT_RADIUS: f32 = 2.5;
/// Eye height above the ground plane.
pub const ORBIT_HEIGHT: f32 = 1.2;
/// Orbit speed in radians per second.
pub const ORBIT_RATE: f32 = 0.5;
/// Tilt about X applied in eye space, degrees.
pub const TILT_DEG: f32 = -10.0;

/// Eye position after orbiting `angle` radians around the Y axis.
pub fn eye(angle: f32) -> Vec3 {
    Vec3::new(angle.sin() * ORBIT_RADIUS, ORBIT_HEIGHT, angle.cos() * ORBIT_RADIUS)
}

/// Combined projection * tilt * view for the given orbit angle and aspect.
pub fn view_projection(angle: f32, aspect: f32) -> Mat4 {
    let proj = Mat4::perspective_rh(FOV_Y_DEG.to_radians(), aspect, Z_NEAR, Z_FAR);
    let view = Mat4::look_at_rh(eye(angle), Vec3::ZERO, Vec3::Y);
    let tilt = Mat4::from_rotation_x(TILT_DEG.to_radians());

    proj * tilt * view
}

/// Projects a world point to normalized device coordinates.
pub fn to_ndc(view_proj: Mat4, p: Vec3) -> Vec3 {
    let clip: Vec4 = view_proj * p.extend(1.0);
    clip.truncate() / clip.w
}
