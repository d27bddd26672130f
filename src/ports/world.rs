//! World port - the read/query and action surface of the game engine
//!
//! The learning core never inspects hidden ground truth directly. Everything
//! it knows about a world comes through this trait: the player's own status,
//! per-tile percepts, and the knowledge predicates the engine derives from
//! the percepts collected so far.

use serde::{Deserialize, Serialize};

use crate::types::{Direction, GridSize, Position};

/// Native actions understood by the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    TurnLeft,
    TurnRight,
    MoveForward,
    Grab,
    Climb,
    Shoot,
}

/// A partially observable grid world.
///
/// `Clone` is the deep-copy operation: a clone must not share mutable state
/// with its source, so it can be kept as a "before" picture while the
/// source is mutated.
///
/// Percept predicates (`has_breeze`, `has_stench`, `has_glitter`, `has_pit`,
/// `has_wumpus`) are only meaningful for explored tiles; implementations
/// report `false` for tiles the player has not visited.
pub trait World: Clone {
    /// Dimensions of the grid.
    fn grid_size(&self) -> GridSize;

    fn player_position(&self) -> Position;

    fn player_direction(&self) -> Direction;

    fn has_arrow(&self) -> bool;

    /// Whether the player is carrying the gold.
    fn has_gold(&self) -> bool;

    fn is_in_pit(&self) -> bool;

    fn is_game_over(&self) -> bool;

    fn score(&self) -> i32;

    fn has_breeze(&self, position: Position) -> bool;

    fn has_stench(&self, position: Position) -> bool;

    fn has_pit(&self, position: Position) -> bool;

    fn has_glitter(&self, position: Position) -> bool;

    fn has_wumpus(&self, position: Position) -> bool;

    fn is_unexplored(&self, position: Position) -> bool;

    fn is_visited(&self, position: Position) -> bool {
        self.is_valid_position(position) && !self.is_unexplored(position)
    }

    fn is_valid_position(&self, position: Position) -> bool {
        self.grid_size().contains(position)
    }

    /// Known to hold neither a pit nor a living wumpus.
    fn is_confirmed_safe(&self, position: Position) -> bool;

    fn is_suspected_pit(&self, position: Position) -> bool;

    fn is_suspected_wumpus(&self, position: Position) -> bool;

    fn is_confirmed_wumpus(&self, position: Position) -> bool;

    fn is_wumpus_confirmed_anywhere(&self) -> bool;

    /// No safe unexplored tile is left, so stepping onto an uncertain tile is
    /// the only way to make progress.
    fn is_safe_to_take_risks(&self) -> bool;

    /// Execute one native action.
    fn perform(&mut self, action: Primitive);
}
