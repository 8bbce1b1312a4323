//! Transform component and utilities for spatial positioning.

use glam::{Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Get the forward direction. Vehicles face local -X, matching the
    /// chassis convention used by the vehicle controllers.
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::X
    }

    /// Get the right direction (positive Z in chassis space).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// World-space point for a fixed chassis-local offset. All derived visual
    /// anchors (lights, reticles, emit positions) are computed through this.
    pub fn anchor(&self, local_offset: Vec3) -> Vec3 {
        self.position + self.rotation * local_offset
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Rotate around the Y axis (yaw).
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation = Quat::from_rotation_y(angle) * self.rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_rotates_local_offset() {
        let mut t = Transform::from_position(Vec3::new(10.0, 0.0, 0.0));
        t.rotate_y(std::f32::consts::FRAC_PI_2);
        let a = t.anchor(Vec3::new(1.0, 0.0, 0.0));
        // Quarter turn around Y maps +X to -Z.
        assert!((a - Vec3::new(10.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn default_forward_is_negative_x() {
        let t = Transform::default();
        assert!((t.forward() - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-6);
    }
}
