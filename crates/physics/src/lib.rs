//! Physics simulation for the derby arena, built on Rapier3D.
//!
//! [`PhysicsWorld`] owns all rigid bodies and colliders; [`vehicle`] provides
//! the drivable-vehicle capability the player core consumes.

pub mod physics_world;
pub mod vehicle;

pub use physics_world::PhysicsWorld;
pub use vehicle::{DriveSystem, PlayerVehicle, RaycastVehicle, RigidVehicle, VehicleParams};

// Re-export the handle types collaborators hold.
pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
