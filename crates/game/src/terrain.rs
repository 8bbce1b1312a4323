//! Arena terrain: a gentle noise-rolled field vehicles can drive across.
//!
//! **Seed-based determinism:** all noise is derived from `config.seed` so the
//! same seed always produces the same height at every (world_x, world_z). The
//! analytic sampler here is also what feeds the physics heightfield, so the
//! surface the wheels ride on and the surface respawns are projected onto are
//! the same function.

use glam::{Vec2, Vec3};
use noise::{NoiseFn, Perlin};

/// Derive a deterministic u32 noise seed from a world seed and an offset.
/// Same (seed, offset) always gives the same result so terrain is reproducible.
#[inline]
fn deterministic_noise_seed(seed: u64, offset: u64) -> u32 {
    ((seed.wrapping_add(offset))
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(offset.wrapping_mul(0x6c078965_u64))
        >> 32) as u32
}

/// Height-sampling surface of the arena floor.
#[derive(Debug)]
pub struct Terrain {
    size: f32,
    height_scale: f32,
    frequency: f64,
    octaves: u32,
    perlin: Perlin,
}

impl Terrain {
    pub fn new(size: f32, height_scale: f32, seed: u64) -> Self {
        Self {
            size,
            height_scale,
            frequency: 0.02,
            octaves: 3,
            perlin: Perlin::new(deterministic_noise_seed(seed, 0)),
        }
    }

    /// Arena footprint as (x extent, z extent).
    pub fn map_dimensions(&self) -> Vec2 {
        Vec2::new(self.size, self.size)
    }

    /// Ground height at a world (x, z).
    pub fn get_height(&self, x: f32, z: f32) -> f32 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        let mut max_value = 0.0;

        for _ in 0..self.octaves {
            value += self.perlin.get([x as f64 * frequency, z as f64 * frequency]) * amplitude;
            max_value += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        // Normalize to 0..1 then scale
        ((value / max_value + 1.0) * 0.5) as f32 * self.height_scale
    }

    /// Project a horizontal position onto the terrain surface.
    pub fn world_position_on_terrain(&self, x: f32, z: f32) -> Vec3 {
        Vec3::new(x, self.get_height(x, z), z)
    }

    /// Sample a row-major `nrows x ncols` grid of heights covering the full
    /// arena, suitable for a physics heightfield collider. Row index walks z,
    /// column index walks x, both from the negative edge.
    pub fn heightfield_samples(&self, nrows: usize, ncols: usize) -> Vec<f32> {
        let mut heights = Vec::with_capacity(nrows * ncols);
        let half = self.size / 2.0;
        for i in 0..nrows {
            let z = i as f32 / (nrows - 1) as f32 * self.size - half;
            for j in 0..ncols {
                let x = j as f32 / (ncols - 1) as f32 * self.size - half;
                heights.push(self.get_height(x, z));
            }
        }
        heights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Same seed must produce identical heights at every position (replayability).
    #[test]
    fn terrain_deterministic_same_seed() {
        let a = Terrain::new(200.0, 4.0, 98765);
        let b = Terrain::new(200.0, 4.0, 98765);
        for i in -5..5 {
            let (x, z) = (i as f32 * 13.7, i as f32 * -7.3);
            assert_eq!(a.get_height(x, z), b.get_height(x, z));
        }
    }

    #[test]
    fn terrain_different_seed_different_heights() {
        let a = Terrain::new(200.0, 4.0, 11111);
        let b = Terrain::new(200.0, 4.0, 22222);
        let same = (-5..5).all(|i| {
            let (x, z) = (i as f32 * 13.7, i as f32 * -7.3);
            a.get_height(x, z) == b.get_height(x, z)
        });
        assert!(!same);
    }

    #[test]
    fn heights_stay_within_scale() {
        let t = Terrain::new(200.0, 4.0, 7);
        for i in 0..20 {
            let h = t.get_height(i as f32 * 9.1 - 90.0, i as f32 * -6.3 + 60.0);
            assert!((0.0..=4.0).contains(&h), "height {} out of range", h);
        }
    }

    #[test]
    fn projection_matches_sampler() {
        let t = Terrain::new(200.0, 4.0, 7);
        let p = t.world_position_on_terrain(12.0, -30.0);
        assert_eq!(p.y, t.get_height(12.0, -30.0));
        assert_eq!((p.x, p.z), (12.0, -30.0));
    }

    #[test]
    fn heightfield_grid_covers_arena() {
        let t = Terrain::new(100.0, 4.0, 7);
        let samples = t.heightfield_samples(16, 16);
        assert_eq!(samples.len(), 256);
        // corner sample equals the analytic height at the negative corner
        assert_eq!(samples[0], t.get_height(-50.0, -50.0));
    }
}
