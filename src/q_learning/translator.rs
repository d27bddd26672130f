//! Action translator: grid-relative actions to native world primitives

use tracing::warn;

use super::action::Action;
use crate::{
    ports::{Primitive, World},
    types::Direction,
};

/// Execute `action` against `world` and return the primitives performed.
///
/// Moves turn the shortest way (at most two quarter turns) and step forward.
/// `Shoot` turns clockwise up to three times, stopping as soon as a confirmed
/// wumpus is faced, then fires whether or not one is.
pub fn apply<W: World>(world: &mut W, action: Action) -> Vec<Primitive> {
    let mut performed = Vec::with_capacity(4);
    let mut perform = |world: &mut W, primitive: Primitive| {
        world.perform(primitive);
        performed.push(primitive);
    };

    match action {
        Action::Grab => perform(world, Primitive::Grab),
        Action::Climb => perform(world, Primitive::Climb),
        Action::Shoot => {
            for _ in 0..3 {
                let faced = world.player_position().step(world.player_direction());
                if world.is_confirmed_wumpus(faced) {
                    break;
                }
                perform(world, Primitive::TurnRight);
            }
            perform(world, Primitive::Shoot);
        }
        Action::MoveUp | Action::MoveRight | Action::MoveDown | Action::MoveLeft => {
            let target = action.direction().unwrap_or(world.player_direction());
            for turn in turns_towards(world.player_direction(), target) {
                perform(world, turn);
            }
            perform(world, Primitive::MoveForward);
        }
    }
    performed
}

/// Execute an action given by its raw slot index.
///
/// An index outside the action set falls back to stepping forward in the
/// current facing, which needs no turn.
pub fn apply_index<W: World>(world: &mut W, index: usize) -> Vec<Primitive> {
    match Action::from_index(index) {
        Some(action) => apply(world, action),
        None => {
            warn!(index, "action index out of range, stepping forward instead");
            world.perform(Primitive::MoveForward);
            vec![Primitive::MoveForward]
        }
    }
}

fn turns_towards(current: Direction, target: Direction) -> Vec<Primitive> {
    match current.clockwise_turns_to(target) {
        0 => Vec::new(),
        1 => vec![Primitive::TurnRight],
        2 => vec![Primitive::TurnRight, Primitive::TurnRight],
        _ => vec![Primitive::TurnLeft],
    }
}
