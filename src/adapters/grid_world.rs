//! Reference wumpus world: physics, percepts and percept-based knowledge.
//!
//! The player only learns about a tile by standing on it. Knowledge
//! predicates are derived from explored tiles alone, never from the hidden
//! layout:
//!
//! - a tile is pit-free if it is explored or next to an explored tile
//!   without breeze;
//! - a tile is wumpus-free if the wumpus is dead, the tile is explored, or it
//!   is next to an explored tile without stench; a missed arrow teaches
//!   nothing;
//! - a wumpus candidate is an unexplored tile that is not wumpus-free and
//!   borders an explored stench; with a single candidate left, the wumpus is
//!   confirmed there.

use std::collections::HashSet;

use super::world_map::WorldMap;
use crate::{
    ports::{Primitive, World},
    types::{Direction, GridSize, Position},
};

/// Score change per primitive action.
pub const ACTION_COST: i32 = -1;
/// Extra score change for firing the arrow.
pub const ARROW_COST: i32 = -10;
pub const GOLD_SCORE: i32 = 1000;
pub const DEATH_SCORE: i32 = -1000;

/// A live game on one [`WorldMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridWorld {
    grid: GridSize,
    wumpus: Position,
    pits: HashSet<Position>,
    /// Gold still lying on the floor.
    gold_at: Option<Position>,

    position: Position,
    direction: Direction,
    has_arrow: bool,
    has_gold: bool,
    in_pit: bool,
    wumpus_alive: bool,
    game_over: bool,
    score: i32,
    explored: HashSet<Position>,
}

impl GridWorld {
    /// Fresh game: start tile, facing right, arrow in hand.
    pub fn new(map: &WorldMap) -> Self {
        Self {
            grid: map.size,
            wumpus: map.wumpus,
            pits: map.pits.iter().copied().collect(),
            gold_at: Some(map.gold),
            position: Position::START,
            direction: Direction::Right,
            has_arrow: true,
            has_gold: false,
            in_pit: false,
            wumpus_alive: true,
            game_over: false,
            score: 0,
            explored: HashSet::from([Position::START]),
        }
    }

    pub fn is_wumpus_alive(&self) -> bool {
        self.wumpus_alive
    }

    fn is_explored(&self, position: Position) -> bool {
        self.explored.contains(&position)
    }

    fn explored_neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        position
            .neighbors()
            .into_iter()
            .filter(move |&neighbor| self.is_explored(neighbor))
    }

    fn is_pit_free(&self, position: Position) -> bool {
        self.is_explored(position)
            || self
                .explored_neighbors(position)
                .any(|neighbor| !self.has_breeze(neighbor))
    }

    fn is_wumpus_free(&self, position: Position) -> bool {
        !self.wumpus_alive
            || self.is_explored(position)
            || self
                .explored_neighbors(position)
                .any(|neighbor| !self.has_stench(neighbor))
    }

    fn is_wumpus_candidate(&self, position: Position) -> bool {
        self.wumpus_alive
            && self.grid.contains(position)
            && !self.is_explored(position)
            && !self.is_wumpus_free(position)
            && self
                .explored_neighbors(position)
                .any(|neighbor| self.has_stench(neighbor))
    }

    fn wumpus_candidates(&self) -> usize {
        self.grid
            .positions()
            .filter(|&position| self.is_wumpus_candidate(position))
            .count()
    }

    fn move_forward(&mut self) {
        if self.in_pit {
            return;
        }
        let target = self.position.step(self.direction);
        if !self.grid.contains(target) {
            return;
        }
        self.position = target;
        self.explored.insert(target);
        if self.wumpus_alive && target == self.wumpus {
            self.score += DEATH_SCORE;
            self.game_over = true;
        } else if self.pits.contains(&target) {
            self.in_pit = true;
        }
    }

    fn grab(&mut self) {
        if self.gold_at == Some(self.position) {
            self.gold_at = None;
            self.has_gold = true;
            self.score += GOLD_SCORE;
            self.game_over = true;
        }
    }

    fn shoot(&mut self) {
        if !self.has_arrow {
            return;
        }
        self.has_arrow = false;
        self.score += ARROW_COST;

        let mut tile = self.position.step(self.direction);
        while self.grid.contains(tile) {
            if tile == self.wumpus {
                self.wumpus_alive = false;
                return;
            }
            tile = tile.step(self.direction);
        }
    }
}

impl World for GridWorld {
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
        self.has_arrow
    }

    fn has_gold(&self) -> bool {
        self.has_gold
    }

    fn is_in_pit(&self) -> bool {
        self.in_pit
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn score(&self) -> i32 {
        self.score
    }

    fn has_breeze(&self, position: Position) -> bool {
        self.is_explored(position)
            && position
                .neighbors()
                .iter()
                .any(|neighbor| self.pits.contains(neighbor))
    }

    fn has_stench(&self, position: Position) -> bool {
        self.is_explored(position)
            && self.wumpus_alive
            && (position == self.wumpus || position.is_adjacent(self.wumpus))
    }

    fn has_pit(&self, position: Position) -> bool {
        self.is_explored(position) && self.pits.contains(&position)
    }

    fn has_glitter(&self, position: Position) -> bool {
        self.is_explored(position) && self.gold_at == Some(position)
    }

    fn has_wumpus(&self, position: Position) -> bool {
        self.is_explored(position) && self.wumpus_alive && position == self.wumpus
    }

    fn is_unexplored(&self, position: Position) -> bool {
        !self.is_explored(position)
    }

    fn is_confirmed_safe(&self, position: Position) -> bool {
        self.grid.contains(position) && self.is_pit_free(position) && self.is_wumpus_free(position)
    }

    fn is_suspected_pit(&self, position: Position) -> bool {
        self.grid.contains(position)
            && !self.is_explored(position)
            && !self.is_pit_free(position)
            && self
                .explored_neighbors(position)
                .any(|neighbor| self.has_breeze(neighbor))
    }

    fn is_suspected_wumpus(&self, position: Position) -> bool {
        self.is_wumpus_candidate(position)
    }

    fn is_confirmed_wumpus(&self, position: Position) -> bool {
        self.is_wumpus_candidate(position) && self.wumpus_candidates() == 1
    }

    fn is_wumpus_confirmed_anywhere(&self) -> bool {
        self.wumpus_candidates() == 1
    }

    fn is_safe_to_take_risks(&self) -> bool {
        !self
            .grid
            .positions()
            .any(|position| !self.is_explored(position) && self.is_confirmed_safe(position))
    }

    fn perform(&mut self, action: Primitive) {
        if self.game_over {
            return;
        }
        self.score += ACTION_COST;
        match action {
            Primitive::TurnLeft => self.direction = self.direction.turn_left(),
            Primitive::TurnRight => self.direction = self.direction.turn_right(),
            Primitive::MoveForward => self.move_forward(),
            Primitive::Grab => self.grab(),
            Primitive::Climb => self.in_pit = false,
            Primitive::Shoot => self.shoot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// W(1,3) G(2,3) P(3,1) P(3,3) P(4,4)
    fn classic() -> GridWorld {
        GridWorld::new(&WorldMap::premade().remove(0))
    }

    fn walk(world: &mut GridWorld, primitives: &[Primitive]) {
        for &primitive in primitives {
            world.perform(primitive);
        }
    }

    #[test]
    fn test_start_state() {
        let world = classic();
        assert_eq!(world.player_position(), Position::START);
        assert_eq!(world.player_direction(), Direction::Right);
        assert!(world.has_arrow());
        assert!(!world.is_game_over());
        assert!(world.is_visited(Position::START));
        assert!(world.is_unexplored(Position::new(2, 1)));
    }

    #[test]
    fn test_percepts_hidden_until_explored() {
        let mut world = classic();
        // (2,1) borders the pit at (3,1); (1,2) borders the wumpus at (1,3)
        assert!(!world.has_breeze(Position::new(2, 1)));
        walk(&mut world, &[Primitive::MoveForward]);
        assert!(world.has_breeze(Position::new(2, 1)));
        assert!(!world.has_stench(Position::new(2, 1)));
        assert!(!world.has_stench(Position::new(1, 2)));
    }

    #[test]
    fn test_bump_keeps_position() {
        let mut world = classic();
        walk(&mut world, &[Primitive::TurnLeft, Primitive::TurnLeft, Primitive::MoveForward]);
        assert_eq!(world.player_position(), Position::START);
        assert_eq!(world.score(), 3 * ACTION_COST);
    }

    #[test]
    fn test_safety_from_clean_start() {
        let world = classic();
        assert!(world.is_confirmed_safe(Position::new(1, 2)));
        assert!(world.is_confirmed_safe(Position::new(2, 1)));
        assert!(!world.is_confirmed_safe(Position::new(2, 2)));
        assert!(!world.is_safe_to_take_risks());
    }

    #[test]
    fn test_breeze_makes_suspected_pits() {
        let mut world = classic();
        walk(&mut world, &[Primitive::MoveForward]);
        // breeze at (2,1): (3,1) and (2,2) are suspects, (1,1) is explored
        assert!(world.is_suspected_pit(Position::new(3, 1)));
        assert!(world.is_suspected_pit(Position::new(2, 2)));
        assert!(!world.is_suspected_pit(Position::new(1, 1)));
    }

    #[test]
    fn test_stench_narrows_to_confirmed_wumpus() {
        let mut world = classic();
        walk(&mut world, &[Primitive::TurnLeft, Primitive::MoveForward]);
        // at (1,2): stench, candidates (1,3) and (2,2)
        assert!(world.has_stench(Position::new(1, 2)));
        assert!(world.is_suspected_wumpus(Position::new(1, 3)));
        assert!(world.is_suspected_wumpus(Position::new(2, 2)));
        assert!(!world.is_wumpus_confirmed_anywhere());

        // visiting (2,1) shows no stench there, which clears (2,2)
        walk(
            &mut world,
            &[
                Primitive::TurnRight,
                Primitive::TurnRight,
                Primitive::MoveForward,
                Primitive::TurnLeft,
                Primitive::MoveForward,
            ],
        );
        assert_eq!(world.player_position(), Position::new(2, 1));
        assert!(world.is_wumpus_confirmed_anywhere());
        assert!(world.is_confirmed_wumpus(Position::new(1, 3)));
        assert!(!world.is_suspected_wumpus(Position::new(2, 2)));
    }

    #[test]
    fn test_shooting_kills_and_removes_stench() {
        let mut world = classic();
        walk(&mut world, &[Primitive::TurnLeft, Primitive::MoveForward, Primitive::Shoot]);
        assert!(!world.is_wumpus_alive());
        assert!(!world.has_arrow());
        assert!(!world.has_stench(Position::new(1, 2)));
        assert!(world.is_confirmed_safe(Position::new(1, 3)));
        assert_eq!(world.score(), 3 * ACTION_COST + ARROW_COST);
    }

    #[test]
    fn test_missed_arrow_teaches_nothing() {
        let mut world = classic();
        walk(
            &mut world,
            &[
                Primitive::TurnLeft,
                Primitive::MoveForward,
                Primitive::TurnRight,
                Primitive::Shoot,
            ],
        );
        assert!(world.is_wumpus_alive());
        assert!(!world.has_arrow());
        // the arrow crossed (2,2) but knowledge only comes from percepts
        assert!(world.is_suspected_wumpus(Position::new(2, 2)));
        assert!(world.is_suspected_wumpus(Position::new(1, 3)));
        assert!(!world.is_wumpus_confirmed_anywhere());
    }

    #[test]
    fn test_walking_into_wumpus_ends_game() {
        let mut world = classic();
        walk(&mut world, &[Primitive::TurnLeft, Primitive::MoveForward, Primitive::MoveForward]);
        assert!(world.is_game_over());
        assert!(world.has_wumpus(Position::new(1, 3)));
        assert_eq!(world.score(), 3 * ACTION_COST + DEATH_SCORE);

        let score = world.score();
        world.perform(Primitive::TurnLeft);
        assert_eq!(world.score(), score);
    }

    #[test]
    fn test_pit_traps_until_climb() {
        let mut world = classic();
        walk(&mut world, &[Primitive::MoveForward, Primitive::MoveForward]);
        assert!(world.is_in_pit());
        assert!(world.has_pit(Position::new(3, 1)));
        walk(&mut world, &[Primitive::MoveForward]);
        assert_eq!(world.player_position(), Position::new(3, 1));
        walk(&mut world, &[Primitive::Climb]);
        assert!(!world.is_in_pit());
        assert_eq!(world.player_position(), Position::new(3, 1));
    }

    #[test]
    fn test_grab_gold_wins() {
        let map = WorldMap {
            name: None,
            size: GridSize::STANDARD,
            wumpus: Position::new(4, 4),
            gold: Position::new(2, 1),
            pits: Vec::new(),
        };
        let mut world = GridWorld::new(&map);
        walk(&mut world, &[Primitive::Grab]);
        assert!(!world.has_gold());
        walk(&mut world, &[Primitive::MoveForward]);
        assert!(world.has_glitter(Position::new(2, 1)));
        walk(&mut world, &[Primitive::Grab]);
        assert!(world.has_gold());
        assert!(world.is_game_over());
        assert!(!world.has_glitter(Position::new(2, 1)));
        assert_eq!(world.score(), 3 * ACTION_COST + GOLD_SCORE);
    }

    #[test]
    fn test_clone_is_independent() {
        let world = classic();
        let mut moved = world.clone();
        moved.perform(Primitive::MoveForward);
        assert_eq!(world.player_position(), Position::START);
        assert_eq!(moved.player_position(), Position::new(2, 1));
    }

    #[test]
    fn test_risk_mode_when_no_safe_frontier() {
        let map = WorldMap {
            name: None,
            size: GridSize::new(3, 1).unwrap(),
            wumpus: Position::new(2, 1),
            gold: Position::new(3, 1),
            pits: Vec::new(),
        };
        let world = GridWorld::new(&map);
        // every unexplored tile is either behind or next to the stench
        assert!(world.is_safe_to_take_risks());
    }
}
