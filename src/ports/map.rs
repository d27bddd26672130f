//! Map port - a source of fresh worlds for training episodes

use std::fmt;

use super::World;

/// Describes a world layout and can produce a fresh world from it.
///
/// Every call to [`MapDescriptor::generate_world`] must return a world in its
/// initial state so episodes are independent.
pub trait MapDescriptor: fmt::Debug {
    type World: World;

    /// Build a new world at its starting state.
    fn generate_world(&self) -> Self::World;
}
