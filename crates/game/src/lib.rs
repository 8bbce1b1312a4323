//! Derby: the vehicular combat arena simulation core.
//!
//! Everything here is headless and deterministic under a fixed timestep: the
//! player state machine, weapon cooldown discipline, projectiles, effect
//! emitters and the arena world that orchestrates them. Rendering and input
//! devices are deliberately absent; the [`world::Arena`] tick is the whole
//! game loop.

pub mod config;
pub mod cpu;
pub mod effects;
pub mod hud;
pub mod lights;
pub mod player;
pub mod schedule;
pub mod terrain;
pub mod weapons;
pub mod world;

pub use config::GameConfig;
pub use player::{Player, PlayerState};
pub use world::{Arena, Scene};
