//! Tabular Q-learning for the Wumpus World
//!
//! This crate provides:
//! - A compact, position-relative state encoding built from the player's
//!   knowledge of the world
//! - An arena-backed value table with a versioned binary snapshot format
//! - Action legality, shaped rewards and ε-greedy episode training
//! - A grid-world engine and map sources as adapters behind small ports
//! - A multi-map training pipeline with observers and a CLI

pub mod adapters;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use error::{Error, Result};
