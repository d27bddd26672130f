//! CLI infrastructure for the wumpus toolkit
//!
//! This module provides the command-line interface for training agents,
//! playing greedy games with them and inspecting learned values.

pub mod commands;
pub mod config;
pub mod output;
