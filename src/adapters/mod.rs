//! Adapters implementing domain ports.
//!
//! This module contains infrastructure implementations of the traits defined
//! in the ports module. Following hexagonal architecture, adapters depend on
//! domain ports, not the other way around.

pub mod grid_world;
pub mod snapshot_repository;
pub mod world_map;

pub use grid_world::GridWorld;
pub use snapshot_repository::SnapshotFileRepository;
pub use world_map::WorldMap;
