//! Core types and utilities shared across the derby simulation crates.
//!
//! This crate provides the foundational types used by every other system:
//! - Transform and spatial components
//! - Time management and cooldown clocks
//! - Common component types for transient ECS entities

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
