//! Drivable vehicle capability.
//!
//! The player core depends only on [`PlayerVehicle`]; the two implementations
//! cover the raycast-suspension vehicle (Rapier's dynamic raycast vehicle
//! controller) and a simpler impulse-driven rigid body, so a vehicle preset
//! can pick either without the player noticing.

use engine_core::{Transform, Vec3};
use rapier3d::control::{DynamicRayCastVehicleController, WheelTuning};
use rapier3d::na::Point3;
use rapier3d::prelude::{QueryFilter, RigidBodyHandle, Vector};

use crate::physics_world::PhysicsWorld;

/// Which axle receives engine force.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveSystem {
    AllWheelDrive,
    FrontWheelDrive,
    RearWheelDrive,
}

/// Construction parameters shared by both vehicle implementations.
#[derive(Debug, Clone)]
pub struct VehicleParams {
    pub chassis_half_extents: Vec3,
    pub mass: f32,
    pub wheel_radius: f32,
    pub suspension_rest_length: f32,
    /// Engine force at standstill; scales down toward `min_engine_force` as
    /// the vehicle approaches `top_speed`.
    pub max_engine_force: f32,
    pub min_engine_force: f32,
    pub top_speed: f32,
    pub max_steer_angle: f32,
    pub drive: DriveSystem,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            chassis_half_extents: Vec3::new(1.2, 0.5, 0.8),
            mass: 300.0,
            wheel_radius: 0.35,
            suspension_rest_length: 0.25,
            max_engine_force: 5000.0,
            min_engine_force: 1500.0,
            top_speed: 10.0,
            max_steer_angle: std::f32::consts::FRAC_PI_4,
            drive: DriveSystem::RearWheelDrive,
        }
    }
}

/// Motion-intent surface the player core drives the vehicle through.
///
/// Every `try_*` intent is a silent no-op while input acceptance is off
/// (the player is dead). Teleports (`respawn_position`, `reset_position`)
/// zero linear and angular velocity; that is this trait's contract, callers
/// never touch the body directly.
pub trait PlayerVehicle {
    fn chassis_handle(&self) -> RigidBodyHandle;
    fn chassis_pose(&self, physics: &PhysicsWorld) -> Transform;
    /// World poses of the four wheels, front-right/front-left/rear-right/rear-left.
    fn wheel_poses(&self, physics: &PhysicsWorld) -> [Transform; 4];
    fn chassis_half_extents(&self) -> Vec3;

    fn current_speed(&self) -> f32;
    /// Lateral (sideways) speed of the chassis, used for tire dust and brake audio.
    fn current_slip(&self) -> f32;
    fn brake_forces(&self) -> &[f32];

    fn accepts_input(&self) -> bool;
    fn set_accept_input(&mut self, active: bool);

    fn try_accelerate(&mut self, physics: &mut PhysicsWorld, amount: f32);
    fn try_stop_accelerate(&mut self, physics: &mut PhysicsWorld);
    fn try_reverse(&mut self, physics: &mut PhysicsWorld, amount: f32);
    fn try_stop_reverse(&mut self, physics: &mut PhysicsWorld);
    fn try_turn(&mut self, physics: &mut PhysicsWorld, x: f32);
    fn try_tight_turn(&mut self, physics: &mut PhysicsWorld, x: f32);
    fn reset_turn(&mut self, physics: &mut PhysicsWorld);
    fn try_jump(&mut self, physics: &mut PhysicsWorld);
    fn try_turbo(&mut self, physics: &mut PhysicsWorld);
    fn set_drifting(&mut self);

    /// Rocket knockback: applied straight to the chassis, bypassing the
    /// input gate, so even a dead vehicle gets shoved around.
    fn apply_impulse_while_wheels_disabled(&mut self, physics: &mut PhysicsWorld, impulse: Vec3);

    fn respawn_position(&mut self, physics: &mut PhysicsWorld, position: Vec3);
    fn reset_position(&mut self, physics: &mut PhysicsWorld, position: Vec3);

    fn pre_update(&mut self, physics: &mut PhysicsWorld);
    fn update(&mut self, physics: &mut PhysicsWorld, dt: f32);
}

/// Chassis-local wheel connection points: front-right, front-left,
/// rear-right, rear-left. Forward is -X, right is -Z.
fn wheel_connection_points(half: Vec3) -> [Vec3; 4] {
    let track = half.z;
    [
        Vec3::new(-half.x, -half.y, -track),
        Vec3::new(-half.x, -half.y, track),
        Vec3::new(half.x, -half.y, -track),
        Vec3::new(half.x, -half.y, track),
    ]
}

/// Raycast-suspension vehicle backed by Rapier's dynamic raycast controller.
pub struct RaycastVehicle {
    chassis: RigidBodyHandle,
    controller: DynamicRayCastVehicleController,
    params: VehicleParams,
    wheel_points: [Vec3; 4],
    accept_input: bool,
    drifting: bool,
    current_speed: f32,
    current_slip: f32,
    brake_forces: Vec<f32>,
}

impl RaycastVehicle {
    pub fn spawn(physics: &mut PhysicsWorld, position: Vec3, params: VehicleParams) -> Self {
        let chassis = physics.add_dynamic_body(position, params.mass);
        physics.add_box_collider(chassis, params.chassis_half_extents);

        let mut controller = DynamicRayCastVehicleController::new(chassis);
        let wheel_points = wheel_connection_points(params.chassis_half_extents);
        for p in wheel_points {
            controller.add_wheel(
                Point3::new(p.x, p.y, p.z),
                -Vector::y(),
                Vector::z(),
                params.suspension_rest_length,
                params.wheel_radius,
                &WheelTuning::default(),
            );
        }

        Self {
            chassis,
            controller,
            params,
            wheel_points,
            accept_input: true,
            drifting: false,
            current_speed: 0.0,
            current_slip: 0.0,
            brake_forces: vec![0.0; 4],
        }
    }

    /// Torque drops off as speed approaches `top_speed`, clamped to the
    /// minimum so the vehicle never goes limp at full tilt.
    fn scaled_engine_force(&self) -> f32 {
        let falloff = 1.0 - (self.current_speed / self.params.top_speed).min(1.0);
        (self.params.max_engine_force * falloff).max(self.params.min_engine_force)
    }

    /// Wheel indices receiving engine force for the configured drive system.
    fn driven_wheels(&self) -> Vec<usize> {
        match self.params.drive {
            DriveSystem::AllWheelDrive => vec![0, 1, 2, 3],
            DriveSystem::FrontWheelDrive => vec![0, 1],
            DriveSystem::RearWheelDrive => vec![2, 3],
        }
    }

    fn set_engine_force(&mut self, force: f32) {
        let driven = self.driven_wheels();
        let wheels = self.controller.wheels_mut();
        for i in driven {
            wheels[i].engine_force = force;
        }
    }

    fn set_all_engine_force(&mut self, force: f32) {
        for wheel in self.controller.wheels_mut() {
            wheel.engine_force = force;
        }
    }

    fn set_steering(&mut self, angle: f32) {
        let wheels = self.controller.wheels_mut();
        // Front wheels only.
        wheels[0].steering = angle;
        wheels[1].steering = angle;
    }
}

impl PlayerVehicle for RaycastVehicle {
    fn chassis_handle(&self) -> RigidBodyHandle {
        self.chassis
    }

    fn chassis_pose(&self, physics: &PhysicsWorld) -> Transform {
        physics.get_body_transform(self.chassis).unwrap_or_default()
    }

    fn wheel_poses(&self, physics: &PhysicsWorld) -> [Transform; 4] {
        let pose = self.chassis_pose(physics);
        let drop = Vec3::new(0.0, -self.params.suspension_rest_length, 0.0);
        self.wheel_points
            .map(|p| Transform::from_position_rotation(pose.anchor(p + drop), pose.rotation))
    }

    fn chassis_half_extents(&self) -> Vec3 {
        self.params.chassis_half_extents
    }

    fn current_speed(&self) -> f32 {
        self.current_speed
    }

    fn current_slip(&self) -> f32 {
        self.current_slip
    }

    fn brake_forces(&self) -> &[f32] {
        &self.brake_forces
    }

    fn accepts_input(&self) -> bool {
        self.accept_input
    }

    fn set_accept_input(&mut self, active: bool) {
        self.accept_input = active;
    }

    fn try_accelerate(&mut self, _physics: &mut PhysicsWorld, amount: f32) {
        if !self.accept_input {
            return;
        }
        let force = self.scaled_engine_force() * amount.abs().min(1.0);
        self.set_engine_force(-force);
        self.brake_forces.fill(0.0);
    }

    fn try_stop_accelerate(&mut self, _physics: &mut PhysicsWorld) {
        if !self.accept_input {
            return;
        }
        self.set_all_engine_force(0.0);
    }

    fn try_reverse(&mut self, _physics: &mut PhysicsWorld, amount: f32) {
        if !self.accept_input {
            return;
        }
        let force = self.params.min_engine_force * amount.abs().min(1.0);
        self.set_engine_force(force);
        self.brake_forces.fill(force * 0.5);
    }

    fn try_stop_reverse(&mut self, _physics: &mut PhysicsWorld) {
        if !self.accept_input {
            return;
        }
        self.set_all_engine_force(0.0);
        self.brake_forces.fill(0.0);
    }

    fn try_turn(&mut self, _physics: &mut PhysicsWorld, x: f32) {
        if !self.accept_input {
            return;
        }
        let angle = self.params.max_steer_angle * x.clamp(-1.0, 1.0);
        self.set_steering(angle);
    }

    fn try_tight_turn(&mut self, _physics: &mut PhysicsWorld, x: f32) {
        if !self.accept_input {
            return;
        }
        self.set_steering(x.clamp(-1.0, 1.0));
    }

    fn reset_turn(&mut self, _physics: &mut PhysicsWorld) {
        if !self.accept_input {
            return;
        }
        self.set_steering(0.0);
    }

    fn try_jump(&mut self, physics: &mut PhysicsWorld) {
        if !self.accept_input {
            return;
        }
        let impulse = Vec3::new(0.0, physics.body_mass(self.chassis) * 7.5, 0.0);
        physics.apply_impulse(self.chassis, impulse);
    }

    fn try_turbo(&mut self, physics: &mut PhysicsWorld) {
        if !self.accept_input {
            return;
        }
        let forward = self.chassis_pose(physics).forward();
        let impulse = forward * physics.body_mass(self.chassis) * 6.0;
        physics.apply_impulse(self.chassis, impulse);
    }

    fn set_drifting(&mut self) {
        self.drifting = true;
    }

    fn apply_impulse_while_wheels_disabled(&mut self, physics: &mut PhysicsWorld, impulse: Vec3) {
        physics.apply_impulse(self.chassis, impulse);
    }

    fn respawn_position(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        if !self.accept_input {
            return;
        }
        physics.teleport_body(self.chassis, position);
    }

    fn reset_position(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        physics.teleport_body(self.chassis, position);
    }

    fn pre_update(&mut self, physics: &mut PhysicsWorld) {
        physics.update_query_pipeline();
    }

    fn update(&mut self, physics: &mut PhysicsWorld, dt: f32) {
        // Drifting loosens tire grip for the tick it was flagged.
        let friction = if self.drifting { 4.0 } else { 10.5 };
        for wheel in self.controller.wheels_mut() {
            wheel.friction_slip = friction;
        }

        let filter = QueryFilter::exclude_dynamic().exclude_rigid_body(self.chassis);
        self.controller.update_vehicle(
            dt,
            &mut physics.rigid_body_set,
            &physics.collider_set,
            &physics.query_pipeline,
            filter,
        );

        let pose = self.chassis_pose(physics);
        let velocity = physics.get_body_velocity(self.chassis).unwrap_or(Vec3::ZERO);
        self.current_speed = velocity.dot(pose.forward()).abs();
        self.current_slip = velocity.dot(pose.right()).abs();
        self.drifting = false;
    }
}

/// Simpler vehicle: one dynamic body driven directly by impulses. Used by
/// heavy presets (tank, harvester) that do not want suspension travel, and by
/// the headless test rig.
pub struct RigidVehicle {
    chassis: RigidBodyHandle,
    params: VehicleParams,
    wheel_points: [Vec3; 4],
    accept_input: bool,
    drifting: bool,
    throttle: f32,
    steer: f32,
    current_speed: f32,
    current_slip: f32,
    brake_forces: Vec<f32>,
}

impl RigidVehicle {
    pub fn spawn(physics: &mut PhysicsWorld, position: Vec3, params: VehicleParams) -> Self {
        let chassis = physics.add_dynamic_body(position, params.mass);
        physics.add_box_collider(chassis, params.chassis_half_extents);
        let wheel_points = wheel_connection_points(params.chassis_half_extents);

        Self {
            chassis,
            params,
            wheel_points,
            accept_input: true,
            drifting: false,
            throttle: 0.0,
            steer: 0.0,
            current_speed: 0.0,
            current_slip: 0.0,
            brake_forces: vec![0.0; 4],
        }
    }
}

impl PlayerVehicle for RigidVehicle {
    fn chassis_handle(&self) -> RigidBodyHandle {
        self.chassis
    }

    fn chassis_pose(&self, physics: &PhysicsWorld) -> Transform {
        physics.get_body_transform(self.chassis).unwrap_or_default()
    }

    fn wheel_poses(&self, physics: &PhysicsWorld) -> [Transform; 4] {
        let pose = self.chassis_pose(physics);
        self.wheel_points
            .map(|p| Transform::from_position_rotation(pose.anchor(p), pose.rotation))
    }

    fn chassis_half_extents(&self) -> Vec3 {
        self.params.chassis_half_extents
    }

    fn current_speed(&self) -> f32 {
        self.current_speed
    }

    fn current_slip(&self) -> f32 {
        self.current_slip
    }

    fn brake_forces(&self) -> &[f32] {
        &self.brake_forces
    }

    fn accepts_input(&self) -> bool {
        self.accept_input
    }

    fn set_accept_input(&mut self, active: bool) {
        self.accept_input = active;
    }

    fn try_accelerate(&mut self, _physics: &mut PhysicsWorld, amount: f32) {
        if !self.accept_input {
            return;
        }
        self.throttle = amount.abs().min(1.0);
        self.brake_forces.fill(0.0);
    }

    fn try_stop_accelerate(&mut self, _physics: &mut PhysicsWorld) {
        if !self.accept_input {
            return;
        }
        self.throttle = 0.0;
    }

    fn try_reverse(&mut self, _physics: &mut PhysicsWorld, amount: f32) {
        if !self.accept_input {
            return;
        }
        self.throttle = -amount.abs().min(1.0);
        self.brake_forces.fill(self.params.min_engine_force * 0.5);
    }

    fn try_stop_reverse(&mut self, _physics: &mut PhysicsWorld) {
        if !self.accept_input {
            return;
        }
        self.throttle = 0.0;
        self.brake_forces.fill(0.0);
    }

    fn try_turn(&mut self, _physics: &mut PhysicsWorld, x: f32) {
        if !self.accept_input {
            return;
        }
        self.steer = self.params.max_steer_angle * x.clamp(-1.0, 1.0);
    }

    fn try_tight_turn(&mut self, _physics: &mut PhysicsWorld, x: f32) {
        if !self.accept_input {
            return;
        }
        self.steer = x.clamp(-1.0, 1.0);
    }

    fn reset_turn(&mut self, _physics: &mut PhysicsWorld) {
        if !self.accept_input {
            return;
        }
        self.steer = 0.0;
    }

    fn try_jump(&mut self, physics: &mut PhysicsWorld) {
        if !self.accept_input {
            return;
        }
        let impulse = Vec3::new(0.0, physics.body_mass(self.chassis) * 7.5, 0.0);
        physics.apply_impulse(self.chassis, impulse);
    }

    fn try_turbo(&mut self, physics: &mut PhysicsWorld) {
        if !self.accept_input {
            return;
        }
        let forward = self.chassis_pose(physics).forward();
        let impulse = forward * physics.body_mass(self.chassis) * 6.0;
        physics.apply_impulse(self.chassis, impulse);
    }

    fn set_drifting(&mut self) {
        self.drifting = true;
    }

    fn apply_impulse_while_wheels_disabled(&mut self, physics: &mut PhysicsWorld, impulse: Vec3) {
        physics.apply_impulse(self.chassis, impulse);
    }

    fn respawn_position(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        if !self.accept_input {
            return;
        }
        physics.teleport_body(self.chassis, position);
    }

    fn reset_position(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        physics.teleport_body(self.chassis, position);
    }

    fn pre_update(&mut self, _physics: &mut PhysicsWorld) {}

    fn update(&mut self, physics: &mut PhysicsWorld, dt: f32) {
        if self.throttle.abs() > f32::EPSILON {
            let pose = self.chassis_pose(physics);
            let force = if self.throttle > 0.0 {
                self.params.max_engine_force
            } else {
                self.params.min_engine_force
            };
            let impulse = pose.forward() * force * self.throttle * dt;
            physics.apply_impulse(self.chassis, impulse);
        }
        if self.steer.abs() > f32::EPSILON {
            // Drifting lets the chassis yaw harder.
            let gain = if self.drifting { 3.0 } else { 2.0 };
            let torque = Vec3::new(0.0, self.steer * self.params.mass * gain * dt, 0.0);
            physics.apply_torque_impulse(self.chassis, torque);
        }

        let pose = self.chassis_pose(physics);
        let velocity = physics.get_body_velocity(self.chassis).unwrap_or(Vec3::ZERO);
        self.current_speed = velocity.dot(pose.forward()).abs();
        self.current_slip = velocity.dot(pose.right()).abs();
        self.drifting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_ground() -> PhysicsWorld {
        let mut physics = PhysicsWorld::new();
        physics.add_ground_plane();
        physics
    }

    fn settle(physics: &mut PhysicsWorld, vehicle: &mut dyn PlayerVehicle, ticks: usize) {
        for _ in 0..ticks {
            vehicle.pre_update(physics);
            vehicle.update(physics, 1.0 / 60.0);
            physics.step(1.0 / 60.0);
        }
    }

    #[test]
    fn rigid_vehicle_accelerates_forward() {
        let mut physics = world_with_ground();
        let mut vehicle =
            RigidVehicle::spawn(&mut physics, Vec3::new(0.0, 0.6, 0.0), VehicleParams::default());
        settle(&mut physics, &mut vehicle, 30);

        vehicle.try_accelerate(&mut physics, 1.0);
        settle(&mut physics, &mut vehicle, 60);
        assert!(vehicle.current_speed() > 0.5, "speed {}", vehicle.current_speed());
    }

    #[test]
    fn input_gate_blocks_intents() {
        let mut physics = world_with_ground();
        let mut vehicle =
            RigidVehicle::spawn(&mut physics, Vec3::new(0.0, 0.6, 0.0), VehicleParams::default());
        settle(&mut physics, &mut vehicle, 30);

        vehicle.set_accept_input(false);
        vehicle.try_accelerate(&mut physics, 1.0);
        settle(&mut physics, &mut vehicle, 60);
        assert!(vehicle.current_speed() < 0.2, "speed {}", vehicle.current_speed());
    }

    #[test]
    fn respawn_teleports_and_zeroes_motion() {
        let mut physics = world_with_ground();
        let mut vehicle =
            RigidVehicle::spawn(&mut physics, Vec3::new(0.0, 0.6, 0.0), VehicleParams::default());
        vehicle.try_turbo(&mut physics);
        settle(&mut physics, &mut vehicle, 5);

        vehicle.respawn_position(&mut physics, Vec3::new(20.0, 2.0, -20.0));
        let pose = vehicle.chassis_pose(&physics);
        assert!((pose.position - Vec3::new(20.0, 2.0, -20.0)).length() < 1e-3);
        assert!(physics.get_body_velocity(vehicle.chassis_handle()).unwrap().length() < 1e-5);
    }

    #[test]
    fn respawn_is_gated_but_reset_is_not() {
        let mut physics = world_with_ground();
        let mut vehicle =
            RigidVehicle::spawn(&mut physics, Vec3::new(0.0, 0.6, 0.0), VehicleParams::default());
        vehicle.set_accept_input(false);

        vehicle.respawn_position(&mut physics, Vec3::new(5.0, 2.0, 5.0));
        assert!(vehicle.chassis_pose(&physics).position.length() < 1.0);

        vehicle.reset_position(&mut physics, Vec3::new(5.0, 2.0, 5.0));
        assert!((vehicle.chassis_pose(&physics).position - Vec3::new(5.0, 2.0, 5.0)).length() < 1e-3);
    }

    #[test]
    fn raycast_vehicle_reports_four_wheels() {
        let mut physics = world_with_ground();
        let vehicle =
            RaycastVehicle::spawn(&mut physics, Vec3::new(0.0, 1.0, 0.0), VehicleParams::default());
        let poses = vehicle.wheel_poses(&physics);
        assert_eq!(poses.len(), 4);
        // Wheels sit below the chassis center.
        for pose in poses {
            assert!(pose.position.y < 1.0);
        }
    }
}
