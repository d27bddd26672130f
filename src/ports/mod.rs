//! Ports (trait boundaries) for external collaborators.
//!
//! The learning core only talks to the world, the map source, training
//! observers and table storage through these traits. Concrete
//! implementations live in [`crate::adapters`].

pub mod map;
pub mod observer;
pub mod repository;
pub mod world;

pub use map::MapDescriptor;
pub use observer::Observer;
pub use repository::TableRepository;
pub use world::{Primitive, World};
