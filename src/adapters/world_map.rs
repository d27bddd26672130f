//! Map descriptors: fixed layouts that produce fresh worlds.

use std::{collections::HashSet, fmt, fs::File, io::BufReader, path::Path};

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use super::grid_world::GridWorld;
use crate::{
    Error, Result,
    ports::MapDescriptor,
    types::{GridSize, Position},
};

/// Layout of one world: wumpus, gold and pits on a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub size: GridSize,
    pub wumpus: Position,
    pub gold: Position,
    #[serde(default)]
    pub pits: Vec<Position>,
}

impl WorldMap {
    /// Check that the layout is playable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMap`] for anything off the grid, anything on
    /// the start tile, gold on a pit or the wumpus, or a pit listed twice.
    pub fn validate(&self) -> Result<()> {
        let off_grid = |what: &str, position: Position| Error::InvalidMap {
            message: format!("{what} at {position} is outside the {} grid", self.size),
        };
        let on_start = |what: &str| Error::InvalidMap {
            message: format!("{what} must not be on the start tile {}", Position::START),
        };

        if !self.size.contains(self.wumpus) {
            return Err(off_grid("wumpus", self.wumpus));
        }
        if !self.size.contains(self.gold) {
            return Err(off_grid("gold", self.gold));
        }
        if self.wumpus == Position::START {
            return Err(on_start("wumpus"));
        }
        if self.gold == Position::START {
            return Err(on_start("gold"));
        }
        if self.gold == self.wumpus {
            return Err(Error::InvalidMap {
                message: format!("gold and wumpus share {}", self.gold),
            });
        }

        let mut seen = HashSet::with_capacity(self.pits.len());
        for &pit in &self.pits {
            if !self.size.contains(pit) {
                return Err(off_grid("pit", pit));
            }
            if pit == Position::START {
                return Err(on_start("pit"));
            }
            if pit == self.gold {
                return Err(Error::InvalidMap {
                    message: format!("gold lies in the pit at {pit}"),
                });
            }
            if !seen.insert(pit) {
                return Err(Error::InvalidMap {
                    message: format!("pit at {pit} listed twice"),
                });
            }
        }
        Ok(())
    }

    /// Random playable layout with `pits` pits.
    ///
    /// Wumpus, gold and pits all land on distinct tiles other than the start.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMap`] if the grid is too small for the request.
    pub fn random<R: Rng>(size: GridSize, pits: usize, rng: &mut R) -> Result<Self> {
        let mut cells: Vec<Position> = size
            .positions()
            .filter(|&position| position != Position::START)
            .collect();
        if cells.len() < pits + 2 {
            return Err(Error::InvalidMap {
                message: format!(
                    "a {size} grid has no room for a wumpus, gold and {pits} pits"
                ),
            });
        }
        cells.shuffle(rng);

        Ok(Self {
            name: None,
            size,
            wumpus: cells[0],
            gold: cells[1],
            pits: cells[2..2 + pits].to_vec(),
        })
    }

    /// The fixed 4x4 training maps.
    pub fn premade() -> Vec<WorldMap> {
        const LAYOUTS: [((i32, i32), (i32, i32), &[(i32, i32)]); 7] = [
            ((1, 3), (2, 3), &[(3, 1), (3, 3), (4, 4)]),
            ((3, 2), (4, 4), &[(1, 3), (3, 4)]),
            ((2, 4), (3, 3), &[(3, 1), (4, 2)]),
            ((4, 3), (1, 4), &[(2, 2), (4, 1)]),
            ((1, 4), (4, 2), &[(2, 3), (3, 1), (4, 4)]),
            ((3, 1), (2, 4), &[(1, 3), (4, 3)]),
            ((4, 4), (3, 2), &[(2, 1), (4, 2)]),
        ];

        LAYOUTS
            .iter()
            .enumerate()
            .map(|(index, &(wumpus, gold, pits))| WorldMap {
                name: Some(format!("premade-{}", index + 1)),
                size: GridSize::STANDARD,
                wumpus: Position::new(wumpus.0, wumpus.1),
                gold: Position::new(gold.0, gold.1),
                pits: pits.iter().map(|&(x, y)| Position::new(x, y)).collect(),
            })
            .collect()
    }

    /// Load and validate a JSON array of maps.
    pub fn load_all<P: AsRef<Path>>(path: P) -> Result<Vec<WorldMap>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open map file {path:?}"),
            source,
        })?;
        let maps: Vec<WorldMap> = serde_json::from_reader(BufReader::new(file))?;
        for map in &maps {
            map.validate()?;
        }
        Ok(maps)
    }

    /// Write maps as a JSON array.
    pub fn save_all<P: AsRef<Path>>(maps: &[WorldMap], path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create map file {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(file, maps)?;
        Ok(())
    }
}

impl fmt::Display for WorldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => f.write_str(name),
            None => write!(f, "{} map, wumpus {}, gold {}", self.size, self.wumpus, self.gold),
        }
    }
}

impl MapDescriptor for WorldMap {
    type World = GridWorld;

    fn generate_world(&self) -> GridWorld {
        GridWorld::new(self)
    }
}
