//! Vehicle-mounted lights and the shield bubble.
//!
//! Pure pose/visibility state: anchors are recomputed from the chassis
//! transform every tick so a renderer always has current world positions.

use engine_core::Transform;
use glam::Vec3;

/// One lamp on a rig: a local mount point plus its derived world position.
#[derive(Debug, Clone)]
pub struct Lamp {
    pub local_offset: Vec3,
    pub world_position: Vec3,
    pub color: [f32; 3],
}

impl Lamp {
    fn new(local_offset: Vec3, color: [f32; 3]) -> Self {
        Self {
            local_offset,
            world_position: local_offset,
            color,
        }
    }
}

/// The light cluster a vehicle carries: headlights, brake lights and an
/// optional emergency flasher pair (police, ambulance, fire truck).
#[derive(Debug, Default)]
pub struct LightRig {
    pub headlights: Vec<Lamp>,
    pub brake_lights: Vec<Lamp>,
    pub emergency_lights: Vec<Lamp>,
    pub visible: bool,
    pub braking: bool,
    /// Alternating flasher phase, advanced only when emergency lamps exist.
    flash_timer: f32,
    pub flash_left: bool,
}

impl LightRig {
    /// Standard rig for a chassis of the given half extents. Headlights sit at
    /// the front face (local -X), brake lights at the rear.
    pub fn for_chassis(half: Vec3, emergency: bool) -> Self {
        let headlights = vec![
            Lamp::new(Vec3::new(-half.x, 0.2, -half.z * 0.6), [1.0, 0.95, 0.8]),
            Lamp::new(Vec3::new(-half.x, 0.2, half.z * 0.6), [1.0, 0.95, 0.8]),
        ];
        let brake_lights = vec![
            Lamp::new(Vec3::new(half.x, 0.2, -half.z * 0.6), [1.0, 0.1, 0.1]),
            Lamp::new(Vec3::new(half.x, 0.2, half.z * 0.6), [1.0, 0.1, 0.1]),
        ];
        let emergency_lights = if emergency {
            vec![
                Lamp::new(Vec3::new(0.0, half.y + 0.3, -half.z * 0.4), [1.0, 0.0, 0.0]),
                Lamp::new(Vec3::new(0.0, half.y + 0.3, half.z * 0.4), [0.0, 0.2, 1.0]),
            ]
        } else {
            Vec::new()
        };
        Self {
            headlights,
            brake_lights,
            emergency_lights,
            visible: true,
            braking: false,
            flash_timer: 0.0,
            flash_left: false,
        }
    }

    /// Re-derive every lamp's world position from the chassis pose and advance
    /// the emergency flasher.
    pub fn update(&mut self, chassis: &Transform, dt: f32) {
        for lamp in self
            .headlights
            .iter_mut()
            .chain(self.brake_lights.iter_mut())
            .chain(self.emergency_lights.iter_mut())
        {
            lamp.world_position = chassis.anchor(lamp.local_offset);
        }

        if !self.emergency_lights.is_empty() {
            self.flash_timer += dt;
            if self.flash_timer >= 0.4 {
                self.flash_timer -= 0.4;
                self.flash_left = !self.flash_left;
            }
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// Spherical shield bubble shown briefly after respawn.
#[derive(Debug)]
pub struct Shield {
    pub center: Vec3,
    pub radius: f32,
    pub visible: bool,
}

impl Shield {
    pub fn new(radius: f32) -> Self {
        Self {
            center: Vec3::ZERO,
            radius,
            visible: false,
        }
    }

    pub fn follow(&mut self, chassis: &Transform) {
        self.center = chassis.position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn lamps_ride_the_chassis() {
        let mut rig = LightRig::for_chassis(Vec3::new(1.5, 0.5, 1.0), false);
        let pose = Transform {
            position: Vec3::new(10.0, 2.0, -4.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        };
        rig.update(&pose, 0.016);
        // Headlights end up ahead of the chassis center (local -X).
        for lamp in &rig.headlights {
            assert!(lamp.world_position.x < pose.position.x);
        }
        for lamp in &rig.brake_lights {
            assert!(lamp.world_position.x > pose.position.x);
        }
    }

    #[test]
    fn emergency_flasher_alternates() {
        let mut rig = LightRig::for_chassis(Vec3::new(1.5, 0.5, 1.0), true);
        let pose = Transform::default();
        let initial = rig.flash_left;
        for _ in 0..30 {
            rig.update(&pose, 0.016);
        }
        assert_ne!(rig.flash_left, initial);
    }

    #[test]
    fn plain_rig_has_no_emergency_lamps() {
        let rig = LightRig::for_chassis(Vec3::ONE, false);
        assert!(rig.emergency_lights.is_empty());
    }
}
