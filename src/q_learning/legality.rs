//! Action legality filter
//!
//! Decides which abstract actions may be attempted from the current world
//! observation. Each rule is an independent veto: any failing condition makes
//! the action illegal.

use super::action::Action;
use crate::{
    ports::World,
    types::{Direction, Position},
};

/// Whether `action` may be attempted in `world`'s current state.
///
/// - In a pit only `Climb` is legal; outside a pit `Climb` never is.
/// - A move must stay on the grid, avoid a confirmed wumpus, avoid suspected
///   pits unless the world allows risks, and must not enter an unexplored
///   tile while standing in an unexplained stench.
/// - `Shoot` needs the arrow and a suspected or confirmed wumpus next door,
///   or the ambiguous stench on the start tile.
/// - `Grab` needs glitter underfoot.
pub fn is_legal<W: World>(world: &W, action: Action) -> bool {
    let in_pit = world.is_in_pit();
    match action {
        Action::Climb => in_pit,
        _ if in_pit => false,
        Action::Grab => world.has_glitter(world.player_position()),
        Action::Shoot => can_shoot(world),
        Action::MoveUp | Action::MoveRight | Action::MoveDown | Action::MoveLeft => action
            .direction()
            .is_some_and(|direction| can_move(world, direction)),
    }
}

fn can_move<W: World>(world: &W, direction: Direction) -> bool {
    let here = world.player_position();
    let target = here.step(direction);

    if !world.is_valid_position(target) {
        return false;
    }
    if world.is_confirmed_wumpus(target) {
        return false;
    }
    if world.is_suspected_pit(target) && !world.is_safe_to_take_risks() {
        return false;
    }
    if world.has_stench(here) && !world.is_wumpus_confirmed_anywhere() && world.is_unexplored(target)
    {
        return false;
    }
    true
}

fn can_shoot<W: World>(world: &W) -> bool {
    if !world.has_arrow() {
        return false;
    }
    let here = world.player_position();
    let wumpus_adjacent = here.neighbors().into_iter().any(|neighbor| {
        world.is_valid_position(neighbor)
            && (world.is_confirmed_wumpus(neighbor) || world.is_suspected_wumpus(neighbor))
    });
    wumpus_adjacent || is_first_stench(world, here)
}

/// Stench on the start tile with both forward neighbours still unexplored:
/// shooting blind is the only way to learn which side the wumpus is on.
fn is_first_stench<W: World>(world: &W, here: Position) -> bool {
    here == Position::START
        && world.has_stench(here)
        && world.is_unexplored(here.step(Direction::Up))
        && world.is_unexplored(here.step(Direction::Right))
}
