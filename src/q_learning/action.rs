//! The abstract action set and per-state action values

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// Number of abstract actions.
pub const ACTION_COUNT: usize = 7;

/// Value held by a legal slot that was never updated.
pub const DEFAULT_VALUE: f64 = 0.0;

/// Value held by a slot whose action is forbidden in that state.
///
/// Far below anything the reward scale can produce, so it never competes
/// with a learned value.
pub const ILLEGAL_VALUE: f64 = -1.0e9;

/// Grid-relative action chosen by the agent.
///
/// Directional moves are absolute (`MoveUp` always heads towards larger `y`),
/// independent of the way the player currently faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    MoveUp,
    MoveRight,
    MoveDown,
    MoveLeft,
    Shoot,
    Grab,
    Climb,
}

impl Action {
    /// All actions in slot order.
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::MoveUp,
        Action::MoveRight,
        Action::MoveDown,
        Action::MoveLeft,
        Action::Shoot,
        Action::Grab,
        Action::Climb,
    ];

    /// Slot of this action in an [`ActionValues`] vector.
    pub fn index(self) -> usize {
        match self {
            Action::MoveUp => 0,
            Action::MoveRight => 1,
            Action::MoveDown => 2,
            Action::MoveLeft => 3,
            Action::Shoot => 4,
            Action::Grab => 5,
            Action::Climb => 6,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Target direction of a move, `None` for the other actions.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::MoveUp => Some(Direction::Up),
            Action::MoveRight => Some(Direction::Right),
            Action::MoveDown => Some(Direction::Down),
            Action::MoveLeft => Some(Direction::Left),
            Action::Shoot | Action::Grab | Action::Climb => None,
        }
    }

    pub fn is_move(self) -> bool {
        self.direction().is_some()
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::MoveUp => "move-up",
            Action::MoveRight => "move-right",
            Action::MoveDown => "move-down",
            Action::MoveLeft => "move-left",
            Action::Shoot => "shoot",
            Action::Grab => "grab",
            Action::Climb => "climb",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_illegal_value(value: f64) -> bool {
    value.to_bits() == ILLEGAL_VALUE.to_bits()
}

/// Learned values of one state, one slot per [`Action`].
///
/// A slot is either a learned value, [`DEFAULT_VALUE`] or [`ILLEGAL_VALUE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionValues([f64; ACTION_COUNT]);

impl ActionValues {
    /// Fresh values: `ILLEGAL_VALUE` where `is_legal` rejects the action,
    /// `DEFAULT_VALUE` everywhere else.
    pub fn from_legality(mut is_legal: impl FnMut(Action) -> bool) -> Self {
        Self(Action::ALL.map(|action| {
            if is_legal(action) {
                DEFAULT_VALUE
            } else {
                ILLEGAL_VALUE
            }
        }))
    }

    pub fn from_raw(values: [f64; ACTION_COUNT]) -> Self {
        Self(values)
    }

    /// Raw slots, sentinels included.
    pub fn raw(&self) -> &[f64; ACTION_COUNT] {
        &self.0
    }

    pub fn get(&self, action: Action) -> f64 {
        self.0[action.index()]
    }

    pub(crate) fn set(&mut self, action: Action, value: f64) {
        self.0[action.index()] = value;
    }

    pub fn is_legal(&self, action: Action) -> bool {
        !is_illegal_value(self.get(action))
    }

    /// Legal actions in slot order.
    pub fn legal_actions(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL
            .into_iter()
            .filter(move |&action| self.is_legal(action))
    }

    /// Legal action with the strictly greatest value.
    ///
    /// Untouched slots compete as `0.0`. Ties go to the lowest slot. Returns
    /// `None` when every slot is illegal.
    pub fn best(&self) -> Option<(Action, f64)> {
        let mut best: Option<(Action, f64)> = None;
        for action in self.legal_actions() {
            let value = self.get(action);
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((action, value)),
            }
        }
        best
    }

    /// Greatest legal value, `0.0` if nothing is legal.
    pub fn max_value(&self) -> f64 {
        self.best().map_or(DEFAULT_VALUE, |(_, value)| value)
    }

    /// Values for display: illegal slots shown as `0.0`.
    pub fn display_values(&self) -> [f64; ACTION_COUNT] {
        self.0
            .map(|value| if is_illegal_value(value) { 0.0 } else { value })
    }
}
