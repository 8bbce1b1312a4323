//! CPU seat driving patterns.
//!
//! CPU players go through the exact same intent surface as a human seat, so
//! cooldown discipline and the input gate apply to them unchanged.

use glam::Vec3;

use crate::player::{Player, PlayerState};
use crate::world::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuPattern {
    /// Sit still. Target practice.
    Stop,
    /// Drive a lazy weaving loop without attacking.
    Patrol,
    /// Chase the local seat and shoot when in range.
    FollowAndAttack,
}

/// Pick this tick's intents for one CPU seat. `target` is the chase point
/// (the local player's position).
pub fn drive(player: &mut Player, scene: &mut Scene, target: Vec3) {
    if player.state() != PlayerState::Alive {
        return;
    }
    match player.cpu_pattern {
        CpuPattern::Stop => {
            player.try_stop_accelerate(scene);
            player.reset_turn(scene);
        }
        CpuPattern::Patrol => {
            player.try_accelerate(scene, 0.6);
            let wobble = (scene.now * 0.4 + player.index as f32 * 1.7).sin() * 0.5;
            player.try_turn(scene, wobble);
        }
        CpuPattern::FollowAndAttack => {
            let pose = player.chassis_pose(scene);
            let to_target = target - pose.position;
            let dist = to_target.length();
            player.try_turn(scene, steer_toward(pose.forward(), to_target));
            if dist > 8.0 {
                player.try_accelerate(scene, 0.9);
            } else {
                player.try_stop_accelerate(scene);
            }
            if dist < 40.0 {
                player.try_fire_bullets(scene);
            }
            if dist < 25.0 {
                player.try_fire_rockets(scene);
            }
        }
    }
}

/// Steering input that turns the nose toward the target, from the Y component
/// of the cross product of the flattened headings.
fn steer_toward(forward: Vec3, to_target: Vec3) -> f32 {
    let fwd = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
    let dir = Vec3::new(to_target.x, 0.0, to_target.z).normalize_or_zero();
    fwd.cross(dir).y.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_heading_needs_no_steering() {
        let steer = steer_toward(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(-10.0, 0.0, 0.0));
        assert!(steer.abs() < 1e-5);
    }

    #[test]
    fn perpendicular_target_steers_hard() {
        let left = steer_toward(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -10.0));
        let right = steer_toward(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 10.0));
        assert!(left.abs() > 0.9);
        assert!((left - -right).abs() < 1e-5, "opposite sides steer opposite ways");
    }
}
