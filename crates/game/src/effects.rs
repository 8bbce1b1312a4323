//! Particle effect emitters: fire, explosions, exhaust trails, tire smoke.
//!
//! Emitters are pure simulation state (positions, velocities, lifetimes) a
//! renderer could draw as billboards. Each one follows an anchor point set by
//! its owner every tick, so fire rides a burning wreck and exhaust rides a
//! rocket.

use glam::Vec3;
use rand::Rng;

/// A single particle.
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Current life remaining.
    pub life: f32,
    /// Maximum life.
    pub max_life: f32,
    /// Current size.
    pub size: f32,
}

/// Common surface of every particle emitter.
pub trait EffectEmitter {
    /// Move the emission anchor (called every tick by the owner).
    fn set_emit_position(&mut self, position: Vec3);
    fn update(&mut self, dt: f32);
    /// True once the emitter has stopped spawning and every particle expired.
    fn is_dead(&self) -> bool;
    /// Stop spawning immediately; live particles finish on their own.
    fn kill(&mut self);
    /// Suspend spawning without discarding the emitter.
    fn pause(&mut self);
    fn resume(&mut self);
    fn is_paused(&self) -> bool;
    fn particle_count(&self) -> usize;
}

/// Sustained flame. Burns for a fixed duration (or forever with `None`),
/// spawning short-lived particles that rise and shrink.
pub struct FireEmitter {
    position: Vec3,
    particles: Vec<Particle>,
    age: f32,
    /// Seconds of spawning; `None` burns until killed.
    duration: Option<f32>,
    spawn_per_tick: usize,
    killed: bool,
    paused: bool,
}

impl FireEmitter {
    pub fn new(position: Vec3, duration: Option<f32>) -> Self {
        Self {
            position,
            particles: Vec::with_capacity(64),
            age: 0.0,
            duration,
            spawn_per_tick: 4,
            killed: false,
            paused: false,
        }
    }

    fn spawning(&self) -> bool {
        if self.killed || self.paused {
            return false;
        }
        match self.duration {
            Some(d) => self.age < d,
            None => true,
        }
    }
}

impl EffectEmitter for FireEmitter {
    fn set_emit_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn update(&mut self, dt: f32) {
        self.age += dt;
        for p in &mut self.particles {
            p.life -= dt;
            // Hot gas rises and slows sideways
            p.velocity.y += 4.0 * dt;
            p.velocity.x *= 1.0 - 2.0 * dt;
            p.velocity.z *= 1.0 - 2.0 * dt;
            p.position += p.velocity * dt;
            p.size = (p.life / p.max_life).max(0.0) * 0.8;
        }
        self.particles.retain(|p| p.life > 0.0);

        if self.spawning() {
            let mut rng = rand::thread_rng();
            for _ in 0..self.spawn_per_tick {
                if self.particles.len() >= 96 {
                    break;
                }
                let angle = rng.gen::<f32>() * std::f32::consts::TAU;
                let spread = rng.gen::<f32>() * 0.6;
                self.particles.push(Particle {
                    position: self.position
                        + Vec3::new(angle.cos() * spread, 0.0, angle.sin() * spread),
                    velocity: Vec3::new(
                        (rng.gen::<f32>() - 0.5) * 1.2,
                        1.0 + rng.gen::<f32>() * 2.0,
                        (rng.gen::<f32>() - 0.5) * 1.2,
                    ),
                    life: 0.4 + rng.gen::<f32>() * 0.5,
                    max_life: 0.9,
                    size: 0.5 + rng.gen::<f32>() * 0.3,
                });
            }
        }
    }

    fn is_dead(&self) -> bool {
        !self.spawning() && self.particles.is_empty() && (self.killed || self.duration.is_some())
    }

    fn kill(&mut self) {
        self.killed = true;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn particle_count(&self) -> usize {
        self.particles.len()
    }
}

/// One-shot radial burst: spawns everything up front and just ages it out.
pub struct ExplosionEmitter {
    particles: Vec<Particle>,
    origin: Vec3,
    paused: bool,
}

impl ExplosionEmitter {
    pub fn new(origin: Vec3, count: usize, speed: f32) -> Self {
        let mut rng = rand::thread_rng();
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            let yaw = rng.gen::<f32>() * std::f32::consts::TAU;
            let pitch = (rng.gen::<f32>() - 0.2) * std::f32::consts::FRAC_PI_2;
            let s = speed * (0.5 + rng.gen::<f32>() * 0.5);
            particles.push(Particle {
                position: origin,
                velocity: Vec3::new(
                    yaw.cos() * pitch.cos() * s,
                    pitch.sin() * s + 2.0,
                    yaw.sin() * pitch.cos() * s,
                ),
                life: 0.5 + rng.gen::<f32>() * 0.8,
                max_life: 1.3,
                size: 0.6 + rng.gen::<f32>() * 0.6,
            });
        }
        Self {
            particles,
            origin,
            paused: false,
        }
    }
}

impl EffectEmitter for ExplosionEmitter {
    fn set_emit_position(&mut self, position: Vec3) {
        self.origin = position;
    }

    fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.life -= dt;
            p.velocity.y -= 9.81 * dt;
            p.velocity *= 1.0 - 1.5 * dt;
            p.position += p.velocity * dt;
            p.size = (p.life / p.max_life).max(0.0) * 1.2;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    fn is_dead(&self) -> bool {
        self.particles.is_empty()
    }

    fn kill(&mut self) {
        self.particles.clear();
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn particle_count(&self) -> usize {
        self.particles.len()
    }
}

/// Continuous trail that follows a moving anchor: rocket exhaust, turbo flame,
/// tire smoke under drift. Spawns while running, stops cleanly when paused.
pub struct ParticleTrail {
    position: Vec3,
    particles: Vec<Particle>,
    spawn_per_tick: usize,
    particle_life: f32,
    killed: bool,
    paused: bool,
}

impl ParticleTrail {
    pub fn new(position: Vec3, spawn_per_tick: usize, particle_life: f32) -> Self {
        Self {
            position,
            particles: Vec::with_capacity(64),
            spawn_per_tick,
            particle_life,
            killed: false,
            paused: false,
        }
    }
}

impl EffectEmitter for ParticleTrail {
    fn set_emit_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.life -= dt;
            p.velocity *= 1.0 - 2.5 * dt;
            p.velocity.y += 0.8 * dt;
            p.position += p.velocity * dt;
            p.size = (p.life / p.max_life).max(0.0) * 0.5;
        }
        self.particles.retain(|p| p.life > 0.0);

        if !self.killed && !self.paused {
            let mut rng = rand::thread_rng();
            for _ in 0..self.spawn_per_tick {
                if self.particles.len() >= 128 {
                    break;
                }
                self.particles.push(Particle {
                    position: self.position
                        + Vec3::new(
                            (rng.gen::<f32>() - 0.5) * 0.3,
                            (rng.gen::<f32>() - 0.5) * 0.3,
                            (rng.gen::<f32>() - 0.5) * 0.3,
                        ),
                    velocity: Vec3::new(
                        (rng.gen::<f32>() - 0.5) * 0.8,
                        0.2 + rng.gen::<f32>() * 0.5,
                        (rng.gen::<f32>() - 0.5) * 0.8,
                    ),
                    life: self.particle_life * (0.6 + rng.gen::<f32>() * 0.4),
                    max_life: self.particle_life,
                    size: 0.3 + rng.gen::<f32>() * 0.2,
                });
            }
        }
    }

    fn is_dead(&self) -> bool {
        self.killed && self.particles.is_empty()
    }

    fn kill(&mut self) {
        self.killed = true;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        if !self.killed {
            self.paused = false;
        }
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn particle_count(&self) -> usize {
        self.particles.len()
    }
}

/// Short gray puff where a wreck smolders.
pub struct SmokePuff {
    inner: FireEmitter,
}

impl SmokePuff {
    pub fn new(position: Vec3, duration: f32) -> Self {
        let mut inner = FireEmitter::new(position, Some(duration));
        inner.spawn_per_tick = 2;
        Self { inner }
    }
}

impl EffectEmitter for SmokePuff {
    fn set_emit_position(&mut self, position: Vec3) {
        self.inner.set_emit_position(position);
    }

    fn update(&mut self, dt: f32) {
        self.inner.update(dt);
    }

    fn is_dead(&self) -> bool {
        self.inner.is_dead()
    }

    fn kill(&mut self) {
        self.inner.kill();
    }

    fn pause(&mut self) {
        self.inner.pause();
    }

    fn resume(&mut self) {
        self.inner.resume();
    }

    fn is_paused(&self) -> bool {
        self.inner.is_paused()
    }

    fn particle_count(&self) -> usize {
        self.inner.particle_count()
    }
}

/// A dynamic light source a renderer would pick up: rocket glow, muzzle
/// flash, explosion flare. `decay_rate > 0` fades the light out over time.
#[derive(Debug, Clone)]
pub struct PointLight {
    pub position: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
    pub decay_rate: f32,
    pub enabled: bool,
}

impl PointLight {
    pub fn new(position: Vec3, color: [f32; 3], intensity: f32, decay_rate: f32) -> Self {
        Self {
            position,
            color,
            intensity,
            decay_rate,
            enabled: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.decay_rate > 0.0 {
            self.intensity = (self.intensity - self.decay_rate * dt).max(0.0);
            if self.intensity == 0.0 {
                self.enabled = false;
            }
        }
    }

    pub fn kill(&mut self) {
        self.intensity = 0.0;
        self.enabled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_spawns_then_burns_out() {
        let mut fire = FireEmitter::new(Vec3::ZERO, Some(0.5));
        fire.update(0.1);
        assert!(fire.particle_count() > 0);
        assert!(!fire.is_dead());
        // Run well past the duration plus max particle life.
        for _ in 0..120 {
            fire.update(0.05);
        }
        assert!(fire.is_dead());
    }

    #[test]
    fn paused_trail_stops_spawning() {
        let mut trail = ParticleTrail::new(Vec3::ZERO, 3, 0.5);
        trail.update(0.016);
        let before = trail.particle_count();
        assert!(before > 0);
        trail.pause();
        for _ in 0..60 {
            trail.update(0.05);
        }
        assert_eq!(trail.particle_count(), 0);
        trail.resume();
        trail.update(0.016);
        assert!(trail.particle_count() > 0);
    }

    #[test]
    fn killed_trail_never_resumes() {
        let mut trail = ParticleTrail::new(Vec3::ZERO, 3, 0.2);
        trail.kill();
        trail.resume();
        for _ in 0..30 {
            trail.update(0.05);
        }
        assert!(trail.is_dead());
    }

    #[test]
    fn explosion_is_one_shot() {
        let mut burst = ExplosionEmitter::new(Vec3::new(1.0, 2.0, 3.0), 40, 8.0);
        assert_eq!(burst.particle_count(), 40);
        for _ in 0..60 {
            burst.update(0.05);
        }
        assert!(burst.is_dead());
    }

    #[test]
    fn point_light_decays_to_disabled() {
        let mut light = PointLight::new(Vec3::ZERO, [1.0, 0.6, 0.2], 2.0, 4.0);
        light.update(0.25);
        assert!(light.enabled);
        light.update(0.3);
        assert!(!light.enabled);
        assert_eq!(light.intensity, 0.0);
    }

    #[test]
    fn trail_follows_its_anchor() {
        let mut trail = ParticleTrail::new(Vec3::ZERO, 2, 0.4);
        trail.set_emit_position(Vec3::new(10.0, 0.0, 0.0));
        trail.update(0.016);
        // Newly spawned particles cluster near the anchor.
        let far = trail
            .particles
            .iter()
            .any(|p| (p.position - Vec3::new(10.0, 0.0, 0.0)).length() > 2.0);
        assert!(!far);
    }
}
