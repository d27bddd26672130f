//! Scripted world for unit tests: every predicate is set directly.

use std::collections::HashSet;

use crate::{
    ports::{Primitive, World},
    types::{Direction, GridSize, Position},
};

#[derive(Debug, Clone)]
pub(crate) struct ScriptedWorld {
    pub grid: GridSize,
    pub position: Position,
    pub direction: Direction,
    pub arrow: bool,
    pub gold: bool,
    pub in_pit: bool,
    pub game_over: bool,
    pub risk_mode: bool,
    pub explored: HashSet<Position>,
    pub breeze: HashSet<Position>,
    pub stench: HashSet<Position>,
    pub glitter: HashSet<Position>,
    pub pits: HashSet<Position>,
    pub wumpus: HashSet<Position>,
    pub safe: HashSet<Position>,
    pub suspected_pits: HashSet<Position>,
    pub suspected_wumpus: HashSet<Position>,
    pub confirmed_wumpus: Option<Position>,
    pub performed: Vec<Primitive>,
}

impl ScriptedWorld {
    /// 4x4 world at the start tile facing right, arrow in hand, start explored.
    pub fn new() -> Self {
        Self {
            grid: GridSize::STANDARD,
            position: Position::START,
            direction: Direction::Right,
            arrow: true,
            gold: false,
            in_pit: false,
            game_over: false,
            risk_mode: false,
            explored: HashSet::from([Position::START]),
            breeze: HashSet::new(),
            stench: HashSet::new(),
            glitter: HashSet::new(),
            pits: HashSet::new(),
            wumpus: HashSet::new(),
            safe: HashSet::from([Position::START]),
            suspected_pits: HashSet::new(),
            suspected_wumpus: HashSet::new(),
            confirmed_wumpus: None,
            performed: Vec::new(),
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Position::new(x, y);
        self.explored.insert(self.position);
        self.safe.insert(self.position);
        self
    }

    pub fn facing(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

impl World for ScriptedWorld {
    fn grid_size(&self) -> GridSize {
        self.grid
    }

    fn player_position(&self) -> Position {
        self.position
    }

    fn player_direction(&self) -> Direction {
        self.direction
    }

    fn has_arrow(&self) -> bool {
        self.arrow
    }

    fn has_gold(&self) -> bool {
        self.gold
    }

    fn is_in_pit(&self) -> bool {
        self.in_pit
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn score(&self) -> i32 {
        -(self.performed.len() as i32)
    }

    fn has_breeze(&self, position: Position) -> bool {
        self.breeze.contains(&position)
    }

    fn has_stench(&self, position: Position) -> bool {
        self.stench.contains(&position)
    }

    fn has_pit(&self, position: Position) -> bool {
        self.pits.contains(&position)
    }

    fn has_glitter(&self, position: Position) -> bool {
        self.glitter.contains(&position)
    }

    fn has_wumpus(&self, position: Position) -> bool {
        self.wumpus.contains(&position)
    }

    fn is_unexplored(&self, position: Position) -> bool {
        !self.explored.contains(&position)
    }

    fn is_confirmed_safe(&self, position: Position) -> bool {
        self.safe.contains(&position)
    }

    fn is_suspected_pit(&self, position: Position) -> bool {
        self.suspected_pits.contains(&position)
    }

    fn is_suspected_wumpus(&self, position: Position) -> bool {
        self.suspected_wumpus.contains(&position)
    }

    fn is_confirmed_wumpus(&self, position: Position) -> bool {
        self.confirmed_wumpus == Some(position)
    }

    fn is_wumpus_confirmed_anywhere(&self) -> bool {
        self.confirmed_wumpus.is_some()
    }

    fn is_safe_to_take_risks(&self) -> bool {
        self.risk_mode
    }

    fn perform(&mut self, action: Primitive) {
        self.performed.push(action);
        match action {
            Primitive::TurnLeft => self.direction = self.direction.turn_left(),
            Primitive::TurnRight => self.direction = self.direction.turn_right(),
            Primitive::MoveForward => {
                let target = self.position.step(self.direction);
                if self.grid.contains(target) {
                    self.position = target;
                    self.explored.insert(target);
                    self.in_pit = self.pits.contains(&target);
                }
            }
            Primitive::Grab => {
                if self.glitter.remove(&self.position) {
                    self.gold = true;
                    self.game_over = true;
                }
            }
            Primitive::Climb => self.in_pit = false,
            Primitive::Shoot => self.arrow = false,
        }
    }
}
