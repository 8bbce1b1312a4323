//! Common components shared across the simulation.

use glam::Vec3;

/// Velocity component for moving entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

impl Velocity {
    pub fn new(linear: Vec3) -> Self {
        Self {
            linear,
            angular: Vec3::ZERO,
        }
    }

    pub fn with_angular(linear: Vec3, angular: Vec3) -> Self {
        Self { linear, angular }
    }
}

/// Health pool for damageable entities.
///
/// Damage is deliberately unclamped: continued hits while already dead push
/// `current` below zero, matching the combat model this simulates. Only
/// `refill` restores the pool.
#[derive(Debug, Clone, Copy)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current -= amount;
    }

    /// Restore to full, used on respawn.
    pub fn refill(&mut self) {
        self.current = self.max;
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        (self.current / self.max).max(0.0)
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Lifetime component for temporary entities (debris, props, effects).
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    pub remaining: f32,
}

impl Lifetime {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// Tick down; returns true once the entity should be removed.
    pub fn update(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_goes_negative_under_overkill() {
        let mut h = Health::new(10.0);
        h.take_damage(7.0);
        h.take_damage(7.0);
        assert!(h.is_depleted());
        assert!(h.current < 0.0);
        assert_eq!(h.percentage(), 0.0);
    }

    #[test]
    fn refill_restores_max() {
        let mut h = Health::new(100.0);
        h.take_damage(130.0);
        h.refill();
        assert_eq!(h.current, 100.0);
        assert!(!h.is_depleted());
    }

    #[test]
    fn lifetime_expires() {
        let mut l = Lifetime::new(0.1);
        assert!(!l.update(0.05));
        assert!(l.update(0.06));
    }
}
