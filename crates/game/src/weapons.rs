//! Projectiles and the per-player projectile factory.
//!
//! Projectiles fly on a constant velocity with a kinematic physics body
//! tracking them, expire after a fixed lifetime, and release every resource
//! they own (body, glow light, exhaust trail) exactly once when killed.

use engine_core::Transform;
use glam::Vec3;
use physics::{PhysicsWorld, RigidBodyHandle};

use crate::effects::{EffectEmitter, ParticleTrail, PointLight};

/// Seconds a projectile may fly before it self-destructs.
pub const PROJECTILE_LIFETIME_SECS: f32 = 5.0;

pub type ProjectileId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileKind {
    Bullet,
    Rocket,
    /// Bomber payload: spawned high above the vehicle, detonates on the
    /// ground (or on the owner's command).
    Airstrike,
}

impl ProjectileKind {
    pub fn speed(self) -> f32 {
        match self {
            ProjectileKind::Bullet => 70.0,
            ProjectileKind::Rocket => 40.0,
            ProjectileKind::Airstrike => 25.0,
        }
    }

    /// Damage applied on a direct hit. Airstrikes damage per tick through
    /// their blast area instead.
    pub fn impact_damage(self) -> f32 {
        match self {
            ProjectileKind::Bullet => 5.0,
            ProjectileKind::Rocket => 20.0,
            ProjectileKind::Airstrike => 0.0,
        }
    }

    /// Distance from a chassis center that counts as a hit.
    pub fn hit_radius(self) -> f32 {
        match self {
            ProjectileKind::Bullet => 2.0,
            ProjectileKind::Rocket => 2.5,
            ProjectileKind::Airstrike => 2.5,
        }
    }

    /// Magnitude of the knockback impulse on impact. Only rockets shove.
    pub fn impact_impulse(self) -> f32 {
        match self {
            ProjectileKind::Rocket => 900.0,
            _ => 0.0,
        }
    }
}

/// One projectile in flight.
pub struct Projectile {
    pub id: ProjectileId,
    /// Seat index of the player who fired it.
    pub owner: usize,
    pub kind: ProjectileKind,
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: f32,
    /// Set when the projectile went off (rocket impact, airstrike command).
    pub detonated: bool,
    dead: bool,
    body: Option<RigidBodyHandle>,
    pub light: Option<PointLight>,
    pub trail: Option<ParticleTrail>,
}

impl Projectile {
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Advance one tick: age out, integrate position, drag the physics body
    /// and attached effects along.
    pub fn update(&mut self, physics: &mut PhysicsWorld, dt: f32) {
        if self.dead {
            return;
        }
        self.age += dt;
        if self.age > PROJECTILE_LIFETIME_SECS {
            self.kill(physics);
            return;
        }
        self.position += self.velocity * dt;
        if let Some(body) = self.body {
            physics.set_kinematic_position(body, self.position);
        }
        if let Some(light) = &mut self.light {
            light.position = self.position;
            light.update(dt);
        }
        if let Some(trail) = &mut self.trail {
            trail.set_emit_position(self.position);
            trail.update(dt);
        }
    }

    /// Mark as gone off, then release resources.
    pub fn detonate(&mut self, physics: &mut PhysicsWorld) {
        self.detonated = true;
        self.kill(physics);
    }

    /// Release the physics body and attached effects. Safe to call twice.
    pub fn kill(&mut self, physics: &mut PhysicsWorld) {
        if self.dead {
            return;
        }
        self.dead = true;
        if let Some(body) = self.body.take() {
            physics.remove_body(body);
        }
        if let Some(light) = &mut self.light {
            light.kill();
        }
        if let Some(trail) = &mut self.trail {
            trail.kill();
        }
    }
}

/// Builds projectiles for one seat, handing out ids and alternating the
/// bullet muzzle between the left and right side of the chassis.
pub struct ProjectileFactory {
    owner: usize,
    next_id: ProjectileId,
    fire_left: bool,
}

impl ProjectileFactory {
    pub fn new(owner: usize) -> Self {
        Self {
            owner,
            next_id: 0,
            fire_left: false,
        }
    }

    fn build(
        &mut self,
        physics: &mut PhysicsWorld,
        kind: ProjectileKind,
        position: Vec3,
        velocity: Vec3,
        light: Option<PointLight>,
        trail: Option<ParticleTrail>,
    ) -> Projectile {
        let id = self.next_id;
        self.next_id += 1;
        let body = physics.add_kinematic_body(position);
        Projectile {
            id,
            owner: self.owner,
            kind,
            position,
            velocity,
            age: 0.0,
            detonated: false,
            dead: false,
            body: Some(body),
            light,
            trail,
        }
    }

    /// Muzzle point on the chassis: ahead of the front face, biased to one
    /// side. `side` is -1 (left), 0 (center) or 1 (right).
    fn muzzle(chassis: &Transform, half: Vec3, side: f32) -> Vec3 {
        chassis.anchor(Vec3::new(-half.x - 0.6, 0.3, side * half.z * 0.8))
    }

    /// One bullet, alternating sides shot to shot.
    pub fn fire_bullet(
        &mut self,
        physics: &mut PhysicsWorld,
        chassis: &Transform,
        half: Vec3,
    ) -> Projectile {
        self.fire_left = !self.fire_left;
        let side = if self.fire_left { -1.0 } else { 1.0 };
        let position = Self::muzzle(chassis, half, side);
        let velocity = chassis.forward() * ProjectileKind::Bullet.speed();
        self.build(physics, ProjectileKind::Bullet, position, velocity, None, None)
    }

    /// One rocket from the center rail, carrying a glow light and an exhaust
    /// trail.
    pub fn fire_rocket(
        &mut self,
        physics: &mut PhysicsWorld,
        chassis: &Transform,
        half: Vec3,
    ) -> Projectile {
        self.fire_rocket_from(physics, chassis, half, 0.0)
    }

    fn fire_rocket_from(
        &mut self,
        physics: &mut PhysicsWorld,
        chassis: &Transform,
        half: Vec3,
        side: f32,
    ) -> Projectile {
        let position = Self::muzzle(chassis, half, side) + Vec3::Y * 0.4;
        let velocity = chassis.forward() * ProjectileKind::Rocket.speed();
        let light = PointLight::new(position, [1.0, 0.55, 0.15], 3.0, 0.0);
        let trail = ParticleTrail::new(position, 4, 0.6);
        self.build(
            physics,
            ProjectileKind::Rocket,
            position,
            velocity,
            Some(light),
            Some(trail),
        )
    }

    /// Three rockets in a fan: center rail plus both sides.
    pub fn fire_tri_rockets(
        &mut self,
        physics: &mut PhysicsWorld,
        chassis: &Transform,
        half: Vec3,
    ) -> Vec<Projectile> {
        [-1.0, 0.0, 1.0]
            .into_iter()
            .map(|side| self.fire_rocket_from(physics, chassis, half, side))
            .collect()
    }

    /// Bomber payload: dropped from well above the vehicle, gliding forward
    /// and down until it meets the ground.
    pub fn fire_airstrike(
        &mut self,
        physics: &mut PhysicsWorld,
        chassis: &Transform,
        half: Vec3,
    ) -> Projectile {
        let position = Self::muzzle(chassis, half, 0.0) + Vec3::Y * 20.0;
        let direction = (chassis.forward() - Vec3::Y * 0.8).normalize();
        let velocity = direction * ProjectileKind::Airstrike.speed();
        self.build(physics, ProjectileKind::Airstrike, position, velocity, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_pose() -> Transform {
        Transform::from_position(Vec3::new(0.0, 2.0, 0.0))
    }

    const HALF: Vec3 = Vec3::new(1.5, 0.5, 1.0);

    #[test]
    fn bullets_alternate_muzzle_sides() {
        let mut physics = PhysicsWorld::new();
        let mut factory = ProjectileFactory::new(0);
        let a = factory.fire_bullet(&mut physics, &flat_pose(), HALF);
        let b = factory.fire_bullet(&mut physics, &flat_pose(), HALF);
        // Identity rotation: side offset lands on world Z.
        assert!(a.position.z * b.position.z < 0.0, "sides should alternate");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn rocket_timeout_releases_everything() {
        let mut physics = PhysicsWorld::new();
        let mut factory = ProjectileFactory::new(0);
        let mut rocket = factory.fire_rocket(&mut physics, &flat_pose(), HALF);
        assert!(rocket.light.is_some());
        assert!(rocket.trail.is_some());

        let bodies_before = physics.rigid_body_set.len();
        for _ in 0..510 {
            rocket.update(&mut physics, 0.01);
        }
        assert!(rocket.is_dead());
        assert!(!rocket.detonated, "timeout is not a detonation");
        assert_eq!(physics.rigid_body_set.len(), bodies_before - 1);
        assert!(!rocket.light.as_ref().unwrap().enabled);

        // A second kill must not panic or double-free the body.
        rocket.kill(&mut physics);
        assert_eq!(physics.rigid_body_set.len(), bodies_before - 1);
    }

    #[test]
    fn projectile_flies_straight() {
        let mut physics = PhysicsWorld::new();
        let mut factory = ProjectileFactory::new(1);
        let mut bullet = factory.fire_bullet(&mut physics, &flat_pose(), HALF);
        let start = bullet.position;
        for _ in 0..10 {
            bullet.update(&mut physics, 0.1);
        }
        let travelled = bullet.position - start;
        // Default pose faces -X.
        assert!(travelled.x < -60.0);
        assert!(travelled.y.abs() < 1e-3);
    }

    #[test]
    fn tri_rockets_come_in_threes() {
        let mut physics = PhysicsWorld::new();
        let mut factory = ProjectileFactory::new(0);
        let volley = factory.fire_tri_rockets(&mut physics, &flat_pose(), HALF);
        assert_eq!(volley.len(), 3);
        let ids: Vec<_> = volley.iter().map(|p| p.id).collect();
        assert!(ids[0] != ids[1] && ids[1] != ids[2]);
    }

    #[test]
    fn airstrike_spawns_high_and_descends() {
        let mut physics = PhysicsWorld::new();
        let mut factory = ProjectileFactory::new(0);
        let strike = factory.fire_airstrike(&mut physics, &flat_pose(), HALF);
        assert!(strike.position.y > 20.0);
        assert!(strike.velocity.y < 0.0);
    }
}
