//! The player entity: vehicle, weapons, health and the Alive/Dead/Respawning
//! state machine.
//!
//! Every weapon lives behind a cooldown clock and every movement intent goes
//! through the vehicle's input gate, so the `try_` prefix is literal: calls
//! made at the wrong time are silent no-ops. The tick order inside
//! [`Player::update`] is load-bearing: clocks advance, effects advance, the
//! respawn check runs, the vehicle integrates, derived anchors are recomputed
//! and only then are expired clocks swept, so an expired clock still blocks
//! fire for the tick it expires on.

use audio::SoundBus;
use engine_core::{CooldownClock, Health, Transform};
use glam::Vec3;
use physics::{PlayerVehicle, RaycastVehicle, RigidVehicle, VehicleParams};
use rand::Rng;

use crate::cpu::CpuPattern;
use crate::effects::{EffectEmitter, FireEmitter, ParticleTrail, SmokePuff};
use crate::hud::Hud;
use crate::lights::{LightRig, Shield};
use crate::weapons::{ProjectileFactory, ProjectileId, ProjectileKind};
use crate::world::Scene;

/// Weapon rows the HUD can cycle through: bullets, rockets, airstrike,
/// special. Selection is clamped to this range.
pub const WEAPON_ROWS: usize = 4;

/// Seconds the shield bubble stays up after a respawn.
const SHIELD_SECS: f32 = 2.0;

/// How far ahead of the chassis a flamethrower or lightning arc reaches.
const SPECIAL_VOLUME_REACH: f32 = 4.0;
const SPECIAL_VOLUME_RADIUS: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Alive,
    Dead,
    Respawning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerTeam {
    Red,
    Blue,
    Green,
    Yellow,
}

/// Per-vehicle special weapon slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialWeapon {
    TriRockets,
    Flamethrower,
    SonicPulse,
    MegaGun,
    Lightning,
    Dumpster,
    Shovel,
}

/// Vehicle roster. Each kind maps to chassis dimensions, a drive model and a
/// special weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleKind {
    Taxi,
    Ambulance,
    RaceCar,
    Police,
    TrashTruck,
    FireTruck,
    Harvester,
    Tank,
}

impl VehicleKind {
    pub fn special_weapon(self) -> SpecialWeapon {
        match self {
            VehicleKind::Taxi => SpecialWeapon::TriRockets,
            VehicleKind::Ambulance => SpecialWeapon::SonicPulse,
            VehicleKind::RaceCar => SpecialWeapon::MegaGun,
            VehicleKind::Police => SpecialWeapon::Lightning,
            VehicleKind::TrashTruck => SpecialWeapon::Dumpster,
            VehicleKind::FireTruck => SpecialWeapon::Flamethrower,
            VehicleKind::Harvester => SpecialWeapon::Shovel,
            VehicleKind::Tank => SpecialWeapon::TriRockets,
        }
    }

    pub fn has_emergency_lights(self) -> bool {
        matches!(
            self,
            VehicleKind::Ambulance | VehicleKind::Police | VehicleKind::FireTruck
        )
    }

    /// Heavy presets skip the raycast suspension and drive a plain rigid body.
    pub fn uses_rigid_body(self) -> bool {
        matches!(self, VehicleKind::Tank | VehicleKind::Harvester)
    }

    pub fn vehicle_params(self) -> VehicleParams {
        let base = VehicleParams::default();
        match self {
            VehicleKind::RaceCar => VehicleParams {
                chassis_half_extents: Vec3::new(1.4, 0.35, 0.75),
                mass: 250.0,
                top_speed: 14.0,
                ..base
            },
            VehicleKind::Tank => VehicleParams {
                chassis_half_extents: Vec3::new(1.8, 0.7, 1.2),
                mass: 900.0,
                max_engine_force: 9000.0,
                top_speed: 6.0,
                ..base
            },
            VehicleKind::TrashTruck | VehicleKind::FireTruck | VehicleKind::Harvester => {
                VehicleParams {
                    chassis_half_extents: Vec3::new(1.7, 0.7, 1.0),
                    mass: 600.0,
                    max_engine_force: 7000.0,
                    top_speed: 8.0,
                    ..base
                }
            }
            _ => base,
        }
    }
}

/// Everything needed to seat a player in the arena.
#[derive(Debug, Clone)]
pub struct PlayerSpec {
    pub name: String,
    pub team: PlayerTeam,
    pub vehicle: VehicleKind,
    pub is_cpu: bool,
    pub cpu_pattern: CpuPattern,
}

impl PlayerSpec {
    pub fn local(name: &str, vehicle: VehicleKind) -> Self {
        Self {
            name: name.to_string(),
            team: PlayerTeam::Red,
            vehicle,
            is_cpu: false,
            cpu_pattern: CpuPattern::Stop,
        }
    }

    pub fn cpu(name: &str, vehicle: VehicleKind, team: PlayerTeam, pattern: CpuPattern) -> Self {
        Self {
            name: name.to_string(),
            team,
            vehicle,
            is_cpu: true,
            cpu_pattern: pattern,
        }
    }
}

pub struct Player {
    pub index: usize,
    pub name: String,
    pub team: PlayerTeam,
    pub is_cpu: bool,
    pub cpu_pattern: CpuPattern,

    state: PlayerState,
    health: Health,
    death_count: u32,
    respawn_delay_secs: f32,

    vehicle: Box<dyn PlayerVehicle>,
    factory: ProjectileFactory,
    special: SpecialWeapon,
    selected_weapon_row: usize,

    // Weapon clocks. One per trigger; see the fire methods.
    bullet_clock: CooldownClock,
    mega_gun_clock: CooldownClock,
    rocket_clock: CooldownClock,
    tri_rocket_clock: CooldownClock,
    airstrike_clock: CooldownClock,
    sonic_pulse_clock: CooldownClock,
    dumpster_clock: CooldownClock,
    shovel_clock: CooldownClock,
    death_explosion_clock: CooldownClock,

    /// Undetonated bomber payload, if one is in the air.
    active_airstrike: Option<ProjectileId>,
    /// Held-trigger special (flamethrower, lightning).
    special_held: bool,

    turbo_active: bool,
    turbo_trail: ParticleTrail,
    tire_smoke: ParticleTrail,
    death_fire: Option<FireEmitter>,
    death_smoke: Option<SmokePuff>,

    lights: LightRig,
    shield: Shield,
    shield_timer: f32,
    /// Chassis tint a renderer would apply; black while wrecked.
    pub tint: [f32; 3],
    pub wheels_visible: bool,

    engine_pitch: f64,
}

impl Player {
    pub fn new(index: usize, spec: PlayerSpec, scene: &mut Scene, spawn: Vec3) -> Self {
        let kind = spec.vehicle;
        let params = kind.vehicle_params();
        let half = params.chassis_half_extents;
        let vehicle: Box<dyn PlayerVehicle> = if kind.uses_rigid_body() {
            Box::new(RigidVehicle::spawn(&mut scene.physics, spawn, params))
        } else {
            Box::new(RaycastVehicle::spawn(&mut scene.physics, spawn, params))
        };

        let mut turbo_trail = ParticleTrail::new(spawn, 5, 0.4);
        turbo_trail.pause();
        let mut tire_smoke = ParticleTrail::new(spawn, 3, 0.6);
        tire_smoke.pause();

        Self {
            index,
            name: spec.name,
            team: spec.team,
            is_cpu: spec.is_cpu,
            cpu_pattern: spec.cpu_pattern,
            state: PlayerState::Alive,
            health: Health::new(scene.config.max_health),
            death_count: 0,
            respawn_delay_secs: scene.config.respawn_delay_secs(),
            vehicle,
            factory: ProjectileFactory::new(index),
            special: kind.special_weapon(),
            selected_weapon_row: 0,
            bullet_clock: CooldownClock::new(0.15, 0.075),
            mega_gun_clock: CooldownClock::new(0.05, 0.025),
            rocket_clock: CooldownClock::new(0.5, 0.25),
            tri_rocket_clock: CooldownClock::new(1.0, 0.5),
            airstrike_clock: CooldownClock::new(0.25, 0.125),
            sonic_pulse_clock: CooldownClock::new(1.0, 0.5),
            dumpster_clock: CooldownClock::new(1.0, 0.5),
            shovel_clock: CooldownClock::new(8.0, 4.0),
            death_explosion_clock: CooldownClock::new(0.25, 0.125),
            active_airstrike: None,
            special_held: false,
            turbo_active: false,
            turbo_trail,
            tire_smoke,
            death_fire: None,
            death_smoke: None,
            lights: LightRig::for_chassis(half, kind.has_emergency_lights()),
            shield: Shield::new(half.length() + 0.8),
            shield_timer: 0.0,
            tint: [1.0, 1.0, 1.0],
            wheels_visible: true,
            engine_pitch: 0.8,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == PlayerState::Alive
    }

    pub fn death_count(&self) -> u32 {
        self.death_count
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn special_weapon(&self) -> SpecialWeapon {
        self.special
    }

    pub fn selected_weapon_row(&self) -> usize {
        self.selected_weapon_row
    }

    /// The local seat drives the HUD and the engine/tire sound channels.
    fn is_local(&self) -> bool {
        self.index == 0
    }

    pub fn position(&self, scene: &Scene) -> Vec3 {
        self.vehicle.chassis_pose(&scene.physics).position
    }

    pub fn chassis_pose(&self, scene: &Scene) -> Transform {
        self.vehicle.chassis_pose(&scene.physics)
    }

    pub fn current_speed(&self) -> f32 {
        self.vehicle.current_speed()
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn shield(&self) -> &Shield {
        &self.shield
    }

    // --- Movement intents -------------------------------------------------

    pub fn try_accelerate(&mut self, scene: &mut Scene, amount: f32) {
        self.vehicle.try_accelerate(&mut scene.physics, amount);
        self.lights.braking = false;
    }

    pub fn try_stop_accelerate(&mut self, scene: &mut Scene) {
        self.vehicle.try_stop_accelerate(&mut scene.physics);
    }

    pub fn try_reverse(&mut self, scene: &mut Scene, amount: f32) {
        self.vehicle.try_reverse(&mut scene.physics, amount);
        self.lights.braking = true;
    }

    pub fn try_stop_reverse(&mut self, scene: &mut Scene) {
        self.vehicle.try_stop_reverse(&mut scene.physics);
        self.lights.braking = false;
    }

    pub fn try_turn(&mut self, scene: &mut Scene, x: f32) {
        self.vehicle.try_turn(&mut scene.physics, x);
    }

    pub fn try_tight_turn(&mut self, scene: &mut Scene, x: f32) {
        self.vehicle.try_tight_turn(&mut scene.physics, x);
    }

    pub fn reset_turn(&mut self, scene: &mut Scene) {
        self.vehicle.reset_turn(&mut scene.physics);
    }

    pub fn try_jump(&mut self, scene: &mut Scene) {
        self.vehicle.try_jump(&mut scene.physics);
    }

    pub fn try_start_turbo(&mut self, scene: &mut Scene) {
        if self.state != PlayerState::Alive || self.turbo_active {
            return;
        }
        self.turbo_active = true;
        self.vehicle.try_turbo(&mut scene.physics);
        self.turbo_trail.resume();
        scene.audio.play_looped("turbo", self.index);
    }

    /// Ends a turbo burst: throttle drops to zero and the flame trail pauses.
    pub fn try_stop_turbo(&mut self, scene: &mut Scene) {
        if !self.turbo_active {
            return;
        }
        self.turbo_active = false;
        self.vehicle.try_stop_accelerate(&mut scene.physics);
        self.turbo_trail.pause();
        scene.audio.stop("turbo", self.index);
    }

    /// Out-of-bounds recovery: teleport back above the terrain regardless of
    /// input gating.
    pub fn try_reset_position(&mut self, scene: &mut Scene) {
        let pos = self.position(scene);
        let target = scene.terrain.world_position_on_terrain(pos.x, pos.z) + Vec3::Y * 2.0;
        self.vehicle.reset_position(&mut scene.physics, target);
    }

    // --- Weapons ----------------------------------------------------------

    pub fn try_fire_bullets(&mut self, scene: &mut Scene) {
        if self.state != PlayerState::Alive || self.bullet_clock.is_running() {
            return;
        }
        let pose = self.vehicle.chassis_pose(&scene.physics);
        let half = self.vehicle.chassis_half_extents();
        let bullet = self.factory.fire_bullet(&mut scene.physics, &pose, half);
        scene.add_projectile(bullet);
        scene.audio.play("bullet", true, self.index);
        self.bullet_clock.start();
    }

    pub fn try_fire_rockets(&mut self, scene: &mut Scene) {
        if self.state != PlayerState::Alive || self.rocket_clock.is_running() {
            return;
        }
        let pose = self.vehicle.chassis_pose(&scene.physics);
        let half = self.vehicle.chassis_half_extents();
        let rocket = self.factory.fire_rocket(&mut scene.physics, &pose, half);
        scene.add_projectile(rocket);
        scene.audio.play("rocket", true, self.index);
        self.rocket_clock.start();
    }

    /// First press drops a payload; a second press while it is still in the
    /// air detonates it on command and rearms the trigger.
    pub fn try_fire_airstrike(&mut self, scene: &mut Scene) {
        if self.state != PlayerState::Alive {
            return;
        }

        if let Some(id) = self.active_airstrike.take() {
            let live = scene
                .projectiles
                .iter_mut()
                .find(|p| p.id == id && !p.is_dead() && !p.detonated);
            if let Some(existing) = live {
                let at = existing.position;
                existing.detonate(&mut scene.physics);
                scene.spawn_blast(at);
                scene.audio.play("explosion", true, self.index);
                self.airstrike_clock.start();
                return;
            }
        }

        if self.airstrike_clock.is_running() {
            return;
        }
        let pose = self.vehicle.chassis_pose(&scene.physics);
        let half = self.vehicle.chassis_half_extents();
        let strike = self.factory.fire_airstrike(&mut scene.physics, &pose, half);
        self.active_airstrike = Some(scene.add_projectile(strike));
        scene.audio.play("bomber", false, self.index);
        self.airstrike_clock.start();
    }

    pub fn try_fire_special_weapon(&mut self, scene: &mut Scene) {
        if self.state != PlayerState::Alive {
            return;
        }
        let pose = self.vehicle.chassis_pose(&scene.physics);
        let half = self.vehicle.chassis_half_extents();
        match self.special {
            SpecialWeapon::TriRockets => {
                if self.tri_rocket_clock.is_running() {
                    return;
                }
                let volley = self.factory.fire_tri_rockets(&mut scene.physics, &pose, half);
                for rocket in volley {
                    scene.add_projectile(rocket);
                }
                scene.audio.play("rocket", true, self.index);
                self.tri_rocket_clock.start();
            }
            SpecialWeapon::MegaGun => {
                if self.mega_gun_clock.is_running() {
                    return;
                }
                let bullet = self.factory.fire_bullet(&mut scene.physics, &pose, half);
                scene.add_projectile(bullet);
                scene.audio.play("bullet", true, self.index);
                self.mega_gun_clock.start();
            }
            SpecialWeapon::SonicPulse => {
                if self.sonic_pulse_clock.is_running() {
                    return;
                }
                scene.spawn_sonic_pulse(pose.position, self.index);
                scene.audio.play("sonicpulse", false, self.index);
                self.sonic_pulse_clock.start();
            }
            SpecialWeapon::Dumpster => {
                if self.dumpster_clock.is_running() {
                    return;
                }
                let behind = pose.anchor(Vec3::new(half.x + 1.5, 1.0, 0.0));
                scene.spawn_dumpster(behind, -pose.forward());
                scene.audio.play("dumpster", true, self.index);
                self.dumpster_clock.start();
            }
            SpecialWeapon::Shovel => {
                if self.shovel_clock.is_running() {
                    return;
                }
                scene.audio.play("shovel", false, self.index);
                self.shovel_clock.start();
            }
            SpecialWeapon::Flamethrower => {
                self.special_held = true;
                scene.audio.play_looped("flamethrower", self.index);
            }
            SpecialWeapon::Lightning => {
                self.special_held = true;
                scene.audio.play_looped("lightning", self.index);
            }
        }
    }

    pub fn try_stop_fire_special_weapon(&mut self, scene: &mut Scene) {
        if !self.special_held {
            return;
        }
        self.special_held = false;
        match self.special {
            SpecialWeapon::Flamethrower => scene.audio.stop("flamethrower", self.index),
            SpecialWeapon::Lightning => scene.audio.stop("lightning", self.index),
            _ => {}
        }
    }

    /// Active continuous-damage region in front of the chassis, if any:
    /// `(center, radius, damage per tick, push impulse)`.
    pub fn special_volume(&self, scene: &Scene) -> Option<(Vec3, f32, f32, f32)> {
        if self.state != PlayerState::Alive {
            return None;
        }
        let pose = self.vehicle.chassis_pose(&scene.physics);
        match self.special {
            SpecialWeapon::Flamethrower | SpecialWeapon::Lightning if self.special_held => {
                let center = pose.anchor(Vec3::new(-SPECIAL_VOLUME_REACH, 0.3, 0.0));
                Some((center, SPECIAL_VOLUME_RADIUS, 0.5, 0.0))
            }
            // The shovel shoves instead of burning, for as long as its clock runs.
            SpecialWeapon::Shovel if self.shovel_clock.is_running_and_not_expired() => {
                let center = pose.anchor(Vec3::new(-2.5, 0.0, 0.0));
                Some((center, 2.5, 0.0, 500.0))
            }
            _ => None,
        }
    }

    // --- Damage and the state machine -------------------------------------

    /// Apply a direct projectile hit.
    pub fn try_damage(&mut self, scene: &mut Scene, kind: ProjectileKind, direction: Vec3) {
        if self.state == PlayerState::Respawning {
            return;
        }
        let impulse = kind.impact_impulse();
        if impulse > 0.0 {
            self.vehicle
                .apply_impulse_while_wheels_disabled(&mut scene.physics, direction * impulse);
        }
        self.apply_damage(scene, kind.impact_damage());
    }

    /// Knockback with no damage attached (sonic pulse rings, shovel blades).
    /// Bypasses the input gate like any other external impulse.
    pub fn try_shove(&mut self, scene: &mut Scene, impulse: Vec3) {
        self.vehicle
            .apply_impulse_while_wheels_disabled(&mut scene.physics, impulse);
    }

    /// Per-tick burn from a flamethrower or lightning arc.
    pub fn try_damage_continuous(&mut self, scene: &mut Scene, amount: f32) {
        self.apply_damage(scene, amount);
    }

    /// Per-tick damage from standing in an airstrike blast.
    pub fn try_damage_from_blast(&mut self, scene: &mut Scene) {
        self.apply_damage(scene, 2.0);
    }

    fn apply_damage(&mut self, scene: &mut Scene, amount: f32) {
        // The respawn shield is visual only. Wrecks keep taking hits, so
        // overkill pushes health below zero.
        if self.state == PlayerState::Respawning {
            return;
        }
        self.health.take_damage(amount);
        if self.is_local() {
            scene.hud.update_health(self.health.percentage());
        }
        if self.health.is_depleted() && self.state == PlayerState::Alive {
            self.try_kill(scene);
        }
    }

    /// The single Alive -> Dead transition. Side effect order matters: input
    /// is cut after the throttle is released, and the respawn countdown is
    /// the last thing scheduled.
    pub fn try_kill(&mut self, scene: &mut Scene) {
        if self.state != PlayerState::Alive {
            return;
        }
        let pose = self.vehicle.chassis_pose(&scene.physics);

        // Half the time a wreck pops into the air before burning.
        if rand::thread_rng().gen_bool(0.5) {
            let up = Vec3::Y * scene.physics.body_mass(self.vehicle.chassis_handle()) * 7.5;
            self.vehicle
                .apply_impulse_while_wheels_disabled(&mut scene.physics, up);
        }

        self.state = PlayerState::Dead;
        self.death_count += 1;

        self.lights.set_visible(false);
        self.shield.visible = false;
        self.vehicle.try_stop_accelerate(&mut scene.physics);
        self.vehicle.try_stop_reverse(&mut scene.physics);
        self.tint = [0.0, 0.0, 0.0];
        self.wheels_visible = false;
        self.vehicle.set_accept_input(false);
        self.turbo_active = false;
        self.turbo_trail.pause();

        self.death_fire = Some(FireEmitter::new(
            pose.position,
            Some(self.respawn_delay_secs),
        ));
        scene.audio.play_looped("deathfire", self.index);
        self.death_smoke = Some(SmokePuff::new(pose.position, self.respawn_delay_secs));

        scene.hud.notify(&format!("{} was destroyed", self.name));
        scene.spawn_explosion(pose.position);
        scene.audio.play("explosion", true, self.index);

        for wheel in self.vehicle.wheel_poses(&scene.physics) {
            scene.spawn_debris_wheel(wheel.position);
        }

        self.death_explosion_clock.start();
        scene.schedule_respawn(self.index, self.respawn_delay_secs);
        log::info!("{} destroyed (death #{})", self.name, self.death_count);
    }

    /// Respawn countdown elapsed; the next update will re-seat the vehicle.
    pub fn on_respawn_due(&mut self) {
        if self.state == PlayerState::Dead {
            self.state = PlayerState::Respawning;
        }
    }

    /// Respawning -> Alive: refill, clean up the wreck, teleport to a fresh
    /// spot on the terrain and hand input back.
    fn try_respawn(&mut self, scene: &mut Scene) {
        if self.state != PlayerState::Respawning {
            return;
        }

        self.health.refill();
        if self.is_local() {
            scene.hud.update_health(self.health.percentage());
        }

        if let Some(fire) = &mut self.death_fire {
            fire.kill();
        }
        if let Some(smoke) = &mut self.death_smoke {
            smoke.kill();
        }
        scene.audio.stop_all_for_player(self.index);
        self.turbo_active = false;
        self.turbo_trail.pause();
        self.special_held = false;

        let dims = scene.terrain.map_dimensions();
        let mut rng = rand::thread_rng();
        let x = rng.gen_range(-dims.x / 2.0..dims.x / 2.0);
        let z = rng.gen_range(-dims.y / 2.0..dims.y / 2.0);
        let target = scene.terrain.world_position_on_terrain(x, z) + Vec3::Y * 2.0;

        // Input back on first: the teleport itself is input-gated.
        self.vehicle.set_accept_input(true);
        self.vehicle.respawn_position(&mut scene.physics, target);

        self.tint = [1.0, 1.0, 1.0];
        self.wheels_visible = true;
        self.lights.set_visible(true);
        self.shield.visible = true;
        self.shield_timer = SHIELD_SECS;
        self.state = PlayerState::Alive;
        log::info!("{} respawned at ({:.1}, {:.1})", self.name, x, z);
    }

    // --- Weapon selection -------------------------------------------------

    pub fn try_select_next_weapon(&mut self, scene: &mut Scene) {
        if self.selected_weapon_row + 1 < WEAPON_ROWS {
            self.selected_weapon_row += 1;
            if self.is_local() {
                scene.hud.select_next_weapon();
            }
        }
    }

    pub fn try_select_previous_weapon(&mut self, scene: &mut Scene) {
        if self.selected_weapon_row > 0 {
            self.selected_weapon_row -= 1;
            if self.is_local() {
                scene.hud.select_previous_weapon();
            }
        }
    }

    // --- Tick -------------------------------------------------------------

    pub fn pre_update(&mut self, scene: &mut Scene) {
        self.vehicle.pre_update(&mut scene.physics);
    }

    pub fn update(&mut self, scene: &mut Scene, dt: f32) {
        self.advance_clocks(dt);

        let pose = self.vehicle.chassis_pose(&scene.physics);
        if let Some(fire) = &mut self.death_fire {
            fire.set_emit_position(pose.position);
            fire.update(dt);
        }
        if self.death_fire.as_ref().is_some_and(|f| f.is_dead()) {
            self.death_fire = None;
        }
        if let Some(smoke) = &mut self.death_smoke {
            smoke.set_emit_position(pose.position + Vec3::Y * 0.8);
            smoke.update(dt);
        }
        if self.death_smoke.as_ref().is_some_and(|s| s.is_dead()) {
            self.death_smoke = None;
        }
        let rear = pose.anchor(Vec3::new(self.vehicle.chassis_half_extents().x + 0.4, 0.0, 0.0));
        self.turbo_trail.set_emit_position(rear);
        self.turbo_trail.update(dt);
        self.tire_smoke.set_emit_position(rear);
        self.tire_smoke.update(dt);

        // A wreck keeps popping explosion bursts until the respawn countdown
        // ends, paced by the death-explosion clock.
        if self.state == PlayerState::Dead && !self.death_explosion_clock.is_running() {
            scene.spawn_explosion(pose.position);
            scene.audio.play("explosion", true, self.index);
            self.death_explosion_clock.start();
        }

        self.try_respawn(scene);

        self.vehicle.update(&mut scene.physics, dt);

        let pose = self.vehicle.chassis_pose(&scene.physics);
        self.lights.update(&pose, dt);
        self.shield.follow(&pose);
        if self.shield.visible {
            self.shield_timer -= dt;
            if self.shield_timer <= 0.0 {
                self.shield.visible = false;
            }
        }

        if self.is_local() {
            self.update_engine(scene);
            self.update_tire_effects(scene);
        }

        self.sweep_clocks();
    }

    fn advance_clocks(&mut self, dt: f32) {
        for clock in self.clocks_mut() {
            clock.advance(dt);
        }
    }

    fn sweep_clocks(&mut self) {
        for clock in self.clocks_mut() {
            clock.stop_if_expired();
        }
    }

    fn clocks_mut(&mut self) -> [&mut CooldownClock; 9] {
        [
            &mut self.bullet_clock,
            &mut self.mega_gun_clock,
            &mut self.rocket_clock,
            &mut self.tri_rocket_clock,
            &mut self.airstrike_clock,
            &mut self.sonic_pulse_clock,
            &mut self.dumpster_clock,
            &mut self.shovel_clock,
            &mut self.death_explosion_clock,
        ]
    }

    /// Engine loop pitch follows speed with a slow lerp so it winds up and
    /// down instead of snapping.
    fn update_engine(&mut self, scene: &mut Scene) {
        scene.audio.play_looped("engine", self.index);
        let speed_frac = (self.vehicle.current_speed() / 10.0).min(1.0) as f64;
        let target = 0.8 + speed_frac * 1.2;
        self.engine_pitch += (target - self.engine_pitch) * 0.0125;
        scene
            .audio
            .set_playback_rate("engine", self.engine_pitch, self.index);
    }

    /// Tire smoke and brake screech while sliding sideways at speed.
    fn update_tire_effects(&mut self, scene: &mut Scene) {
        let sliding = self.vehicle.current_slip() > 3.0 && self.vehicle.current_speed() > 1.0;
        if sliding && self.state == PlayerState::Alive {
            self.vehicle.set_drifting();
            self.tire_smoke.resume();
            scene.audio.play_if_not_playing("brake", true, self.index);
        } else {
            self.tire_smoke.pause();
            scene.audio.stop("brake", self.index);
        }
    }

    // Test hooks: cooldown observability without poking at fields elsewhere.
    #[cfg(test)]
    pub(crate) fn bullet_clock(&self) -> &CooldownClock {
        &self.bullet_clock
    }

    #[cfg(test)]
    pub(crate) fn turbo_trail_paused(&self) -> bool {
        self.turbo_trail.is_paused()
    }

    #[cfg(test)]
    pub(crate) fn active_airstrike(&self) -> Option<ProjectileId> {
        self.active_airstrike
    }

    #[cfg(test)]
    pub(crate) fn force_state(&mut self, state: PlayerState) {
        self.state = state;
    }

    #[cfg(test)]
    pub(crate) fn force_position_for_test(&mut self, scene: &mut Scene, position: Vec3) {
        self.vehicle.reset_position(&mut scene.physics, position);
    }

    #[cfg(test)]
    pub(crate) fn accepts_input(&self) -> bool {
        self.vehicle.accepts_input()
    }
}
