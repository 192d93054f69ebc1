#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized maze generation system that procedurally builds treasure hunt boards.
//!
//! Generation grows a spanning tree of open cells from a random interior
//! start, in the spirit of randomized Prim. A frontier cell is only carved
//! when exactly one of its neighbours is already carved, which keeps the
//! carved set loop free, and it must additionally pass the branch-factor
//! gate unless the frontier has shrunk to [`FORCED_ACCEPTANCE_FRONTIER`]
//! cells or fewer. Treasures are placed on the most recently carved cells and
//! the remaining interior is opened at random according to the open factor.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use treasure_hunt_core::{BoardError, Location, Terrain, Tile};
use treasure_hunt_world::{Board, BoardLayout};

/// Frontier size at or below which candidates skip the branch-factor gate.
pub const FORCED_ACCEPTANCE_FRONTIER: usize = 4;

/// Upper bound of the branch and open factors.
pub const MAX_FACTOR: u32 = 100;

/// Smallest width or height that leaves room for an interior inside the border.
pub const MIN_DIMENSION: u32 = 3;

/// Tuning knobs controlling the shape of a generated board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeParameters {
    /// Name the generated board carries.
    pub name: String,
    /// Number of columns, border included.
    pub width: u32,
    /// Number of rows, border included.
    pub height: u32,
    /// Number of treasures to place; fewer are placed when the maze is too small.
    pub treasure_count: u32,
    /// Percentage in `0..=100`; higher values accept branching candidates more often.
    pub branch_factor: u32,
    /// Percentage in `0..=100` of uncarved interior cells opened anyway.
    pub open_factor: u32,
    /// Step budget of the generated board.
    pub max_steps: u32,
}

impl Default for MazeParameters {
    fn default() -> Self {
        Self {
            name: String::from("maze"),
            width: 20,
            height: 15,
            treasure_count: 3,
            branch_factor: 50,
            open_factor: 10,
            max_steps: 500,
        }
    }
}

impl MazeParameters {
    /// Checks that the parameters describe a board the generator can build.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let fits = |value: u32| value >= MIN_DIMENSION && i32::try_from(value).is_ok();
        if !fits(self.width) || !fits(self.height) {
            return Err(GenerationError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.branch_factor > MAX_FACTOR {
            return Err(GenerationError::FactorOutOfRange {
                factor: "branch",
                value: self.branch_factor,
            });
        }
        if self.open_factor > MAX_FACTOR {
            return Err(GenerationError::FactorOutOfRange {
                factor: "open",
                value: self.open_factor,
            });
        }
        if self.treasure_count == 0 {
            return Err(GenerationError::NoTreasure);
        }
        Ok(())
    }
}

/// Reasons maze generation may fail.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Width or height leaves no interior or exceeds the coordinate range.
    #[error("board dimensions {width}x{height} are invalid; both must be at least {}", MIN_DIMENSION)]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A percentage knob exceeds 100.
    #[error("{factor} factor {value} is out of range 0..={}", MAX_FACTOR)]
    FactorOutOfRange {
        /// Knob that was out of range.
        factor: &'static str,
        /// Offending value.
        value: u32,
    },
    /// Zero treasures were requested.
    #[error("at least one treasure must be requested")]
    NoTreasure,
    /// The generated layout does not form a valid board.
    #[error("generated layout is not a valid board: {0}")]
    Board(#[from] BoardError),
}

/// Procedural board builder driven by a pseudo-random source.
#[derive(Debug)]
pub struct MazeGenerator<R = ChaCha8Rng> {
    rng: R,
}

impl MazeGenerator<ChaCha8Rng> {
    /// Creates a generator that produces the same boards for the same seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a generator seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> MazeGenerator<R> {
    /// Creates a generator drawing from the provided random source.
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generates a playable board.
    pub fn generate(&mut self, parameters: &MazeParameters) -> Result<Board, GenerationError> {
        let layout = self.generate_layout(parameters)?;
        Ok(Board::from_layout(&layout)?)
    }

    /// Generates the terrain layout of a board without constructing it.
    pub fn generate_layout(
        &mut self,
        parameters: &MazeParameters,
    ) -> Result<BoardLayout, GenerationError> {
        parameters.validate()?;
        let bounds = Bounds::new(parameters.width, parameters.height)?;

        let carved = self.carve(bounds, parameters.branch_factor);
        let treasures = select_treasures(&carved, parameters.treasure_count);
        let rows = self.materialize(bounds, &carved, &treasures, parameters.open_factor);

        debug!(
            name = %parameters.name,
            width = parameters.width,
            height = parameters.height,
            carved = carved.cells.len(),
            treasures = treasures.len(),
            start = %carved.start,
            "maze generated"
        );

        Ok(BoardLayout::new(
            parameters.name.clone(),
            rows,
            parameters.max_steps,
        ))
    }

    fn carve(&mut self, bounds: Bounds, branch_factor: u32) -> CarvedMaze {
        let candidates = bounds.interior();
        let start = candidates[self.rng.gen_range(0..candidates.len())];

        let mut carved = CarvedMaze::new(start);
        let mut frontier = bounds.interior_neighbors(start);
        let mut in_frontier: HashSet<Location> = frontier.iter().copied().collect();

        while !frontier.is_empty() {
            let pick = self.rng.gen_range(0..frontier.len());
            let cell = frontier[pick];
            let neighbors = bounds.interior_neighbors(cell);
            let carved_neighbors = neighbors
                .iter()
                .filter(|neighbor| carved.contains(**neighbor))
                .count();

            if carved_neighbors == 1
                && (frontier.len() <= FORCED_ACCEPTANCE_FRONTIER
                    || self.rng.gen_range(0..MAX_FACTOR) > MAX_FACTOR - branch_factor)
            {
                carved.insert(cell);
                for neighbor in neighbors {
                    if !carved.contains(neighbor) && in_frontier.insert(neighbor) {
                        frontier.push(neighbor);
                    }
                }
            }

            let _ = frontier.remove(pick);
            let _ = in_frontier.remove(&cell);
        }

        carved
    }

    fn materialize(
        &mut self,
        bounds: Bounds,
        carved: &CarvedMaze,
        treasures: &HashSet<Location>,
        open_factor: u32,
    ) -> Vec<Vec<Tile>> {
        (0..bounds.height)
            .map(|row| {
                (0..bounds.width)
                    .map(|col| {
                        let location = Location::new(row, col);
                        if bounds.on_border(location) {
                            Tile::Terrain(Terrain::Wall)
                        } else if location == carved.start {
                            Tile::PlayerStart
                        } else if treasures.contains(&location) {
                            Tile::Terrain(Terrain::Treasure)
                        } else if carved.contains(location)
                            || self.rng.gen_range(0..MAX_FACTOR) < open_factor
                        {
                            Tile::Terrain(Terrain::Space)
                        } else {
                            Tile::Terrain(Terrain::Wall)
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Chooses up to `count` treasure cells among the most recently carved, never the start.
fn select_treasures(carved: &CarvedMaze, count: u32) -> HashSet<Location> {
    let count = usize::try_from(count).unwrap_or(usize::MAX);
    carved
        .cells
        .iter()
        .rev()
        .filter(|cell| **cell != carved.start)
        .take(count)
        .copied()
        .collect()
}

/// Carved cells in insertion order.
#[derive(Debug)]
struct CarvedMaze {
    start: Location,
    cells: Vec<Location>,
    members: HashSet<Location>,
}

impl CarvedMaze {
    fn new(start: Location) -> Self {
        let mut maze = Self {
            start,
            cells: Vec::new(),
            members: HashSet::new(),
        };
        maze.insert(start);
        maze
    }

    fn insert(&mut self, cell: Location) {
        if self.members.insert(cell) {
            self.cells.push(cell);
        }
    }

    fn contains(&self, cell: Location) -> bool {
        self.members.contains(&cell)
    }
}

#[derive(Clone, Copy, Debug)]
struct Bounds {
    width: i32,
    height: i32,
}

impl Bounds {
    fn new(width: u32, height: u32) -> Result<Self, GenerationError> {
        match (i32::try_from(width), i32::try_from(height)) {
            (Ok(w), Ok(h)) => Ok(Self {
                width: w,
                height: h,
            }),
            _ => Err(GenerationError::InvalidDimensions { width, height }),
        }
    }

    fn interior(self) -> Vec<Location> {
        (1..self.height - 1)
            .flat_map(|row| (1..self.width - 1).map(move |col| Location::new(row, col)))
            .collect()
    }

    fn on_border(self, location: Location) -> bool {
        location.row() == 0
            || location.col() == 0
            || location.row() == self.height - 1
            || location.col() == self.width - 1
    }

    /// West, east, north and south neighbours that stay inside the border.
    fn interior_neighbors(self, location: Location) -> Vec<Location> {
        let mut neighbors = Vec::with_capacity(4);
        if location.col() > 1 {
            neighbors.push(location.translate(0, -1));
        }
        if location.col() < self.width - 2 {
            neighbors.push(location.translate(0, 1));
        }
        if location.row() > 1 {
            neighbors.push(location.translate(-1, 0));
        }
        if location.row() < self.height - 2 {
            neighbors.push(location.translate(1, 0));
        }
        neighbors
    }
}
