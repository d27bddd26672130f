//! State encoder: world observation to state key and fresh record
//!
//! The encoding only reads what the player can observe. Terminal tiles
//! (gold or wumpus underfoot) drop the position and tile data so every
//! terminal outcome with the same flags shares one key.

use super::{
    action::ActionValues,
    legality::is_legal,
    state::{SpecialFlags, StateKey, StateRecord, TileFlags},
};
use crate::{ports::World, types::Position};

/// Build a fresh record for the world's current observation.
///
/// Every slot starts at the default value, or the illegal sentinel where the
/// legality filter rejects the action.
pub fn encode<W: World>(world: &W) -> StateRecord {
    let (flags, position, tiles) = observe(world);
    let values = ActionValues::from_legality(|action| is_legal(world, action));
    StateRecord::from_parts(flags, position, tiles, values)
}

/// Key of the world's current observation, without evaluating legality.
pub fn state_key<W: World>(world: &W) -> StateKey {
    let (flags, position, tiles) = observe(world);
    StateRecord::from_parts(flags, position, tiles, ActionValues::from_legality(|_| true)).key()
}

fn observe<W: World>(world: &W) -> (SpecialFlags, Position, Vec<TileFlags>) {
    let here = world.player_position();
    let holding_gold = world.has_gold();
    let on_gold = holding_gold || world.has_glitter(here);
    let on_wumpus = world.has_wumpus(here);

    let mut flags = SpecialFlags::empty();
    flags.set(SpecialFlags::RISK_MODE, world.is_safe_to_take_risks());
    flags.set(SpecialFlags::ON_GOLD, on_gold);
    flags.set(SpecialFlags::ON_WUMPUS, on_wumpus);
    flags.set(SpecialFlags::IN_PIT, world.is_in_pit());
    flags.set(SpecialFlags::HAS_ARROW, world.has_arrow());
    flags.set(SpecialFlags::HOLDING_GOLD, holding_gold);

    let grid = world.grid_size();
    if on_gold || on_wumpus {
        return (flags, Position::MASKED, vec![TileFlags::empty(); grid.cell_count()]);
    }

    let tiles = grid
        .positions()
        .map(|position| tile_flags(world, position))
        .collect();
    (flags, here, tiles)
}

fn tile_flags<W: World>(world: &W, position: Position) -> TileFlags {
    let mut tile = TileFlags::empty();
    if world.is_unexplored(position) {
        return tile;
    }
    tile.set(TileFlags::EXPLORED, true);
    tile.set(TileFlags::BREEZE, world.has_breeze(position));
    tile.set(TileFlags::STENCH, world.has_stench(position));
    tile.set(TileFlags::GLITTER, world.has_glitter(position));
    tile
}
