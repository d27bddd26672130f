//! Learned state records and their lookup keys

use std::fmt;

use super::action::{ACTION_COUNT, Action, ActionValues, DEFAULT_VALUE};
use crate::types::Position;

/// Player status bits stored in the first key byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpecialFlags(u8);

impl SpecialFlags {
    pub const RISK_MODE: SpecialFlags = SpecialFlags(0b0000_0001);
    pub const ON_GOLD: SpecialFlags = SpecialFlags(0b0000_0010);
    pub const ON_WUMPUS: SpecialFlags = SpecialFlags(0b0000_0100);
    pub const IN_PIT: SpecialFlags = SpecialFlags(0b0000_1000);
    pub const HAS_ARROW: SpecialFlags = SpecialFlags(0b0001_0000);
    pub const HOLDING_GOLD: SpecialFlags = SpecialFlags(0b0010_0000);

    const KNOWN_BITS: u8 = 0b0011_1111;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Rebuild flags from a stored byte, rejecting unknown bits.
    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits & !Self::KNOWN_BITS == 0).then_some(Self(bits))
    }

    pub fn contains(self, other: SpecialFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn set(&mut self, other: SpecialFlags, enabled: bool) {
        if enabled {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }
}

/// Per-tile percept bits. Unexplored tiles are all zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileFlags(u8);

impl TileFlags {
    pub const EXPLORED: TileFlags = TileFlags(0b0000_0001);
    pub const BREEZE: TileFlags = TileFlags(0b0000_0010);
    pub const STENCH: TileFlags = TileFlags(0b0000_0100);
    pub const GLITTER: TileFlags = TileFlags(0b0000_1000);

    const KNOWN_BITS: u8 = 0b0000_1111;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits & !Self::KNOWN_BITS == 0).then_some(Self(bits))
    }

    pub fn contains(self, other: TileFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn set(&mut self, other: TileFlags, enabled: bool) {
        if enabled {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }
}

/// Byte-exact lookup key: flags, x, y, then one byte per tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(Vec<u8>);

impl StateKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Set of actions whose slot has received at least one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ActionMask(u8);

impl ActionMask {
    fn contains(self, action: Action) -> bool {
        self.0 & (1 << action.index()) != 0
    }

    fn insert(&mut self, action: Action) {
        self.0 |= 1 << action.index();
    }
}

/// The learned unit: an equivalence class of observations plus its values.
///
/// Records are created by the state encoder and live in a
/// [`super::ValueStore`]; only the store hands out mutable access.
#[derive(Debug, Clone, PartialEq)]
pub struct StateRecord {
    flags: SpecialFlags,
    position: Position,
    tiles: Vec<TileFlags>,
    values: ActionValues,
    updated: ActionMask,
}

impl StateRecord {
    /// Assemble a record from its stored parts.
    ///
    /// Slots holding a value other than the two sentinels count as already
    /// updated, so a learned value of exactly `0.0` is indistinguishable
    /// from an untried slot.
    pub fn from_parts(
        flags: SpecialFlags,
        position: Position,
        tiles: Vec<TileFlags>,
        values: ActionValues,
    ) -> Self {
        let mut updated = ActionMask::default();
        for action in values.legal_actions() {
            if values.get(action).to_bits() != DEFAULT_VALUE.to_bits() {
                updated.insert(action);
            }
        }
        Self {
            flags,
            position,
            tiles,
            values,
            updated,
        }
    }

    pub fn flags(&self) -> SpecialFlags {
        self.flags
    }

    /// Player position, `(0, 0)` for terminal states.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Tile flags in raster order.
    pub fn tiles(&self) -> &[TileFlags] {
        &self.tiles
    }

    pub fn values(&self) -> &ActionValues {
        &self.values
    }

    /// Lookup key built from every field except the values.
    pub fn key(&self) -> StateKey {
        let mut bytes = Vec::with_capacity(3 + self.tiles.len());
        bytes.push(self.flags.bits());
        bytes.push(position_byte(self.position.x));
        bytes.push(position_byte(self.position.y));
        bytes.extend(self.tiles.iter().map(|tile| tile.bits()));
        StateKey(bytes)
    }

    /// Whether `action` has been updated since the record was created.
    pub fn is_updated(&self, action: Action) -> bool {
        self.updated.contains(action)
    }

    /// Legal actions that were never updated, in slot order.
    pub fn untried_actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.values
            .legal_actions()
            .filter(move |&action| !self.is_updated(action))
    }

    /// Store a learned value for a legal action.
    ///
    /// Illegal slots keep their sentinel for the life of the record.
    pub fn set_value(&mut self, action: Action, value: f64) {
        if !self.values.is_legal(action) {
            return;
        }
        self.values.set(action, value);
        self.updated.insert(action);
    }

    /// Displayable values, one per action.
    pub fn display_values(&self) -> [f64; ACTION_COUNT] {
        self.values.display_values()
    }
}

/// Positions are bounded by the grid size, which fits in a byte.
fn position_byte(component: i32) -> u8 {
    u8::try_from(component).unwrap_or(0)
}
