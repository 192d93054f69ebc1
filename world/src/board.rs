use std::fmt;

use tracing::{debug, trace};
use treasure_hunt_core::{BoardError, Location, Move, MoveError, Terrain, Tile};

use crate::{Arrival, BoardLayout, BoardView, Square};

/// Points awarded for every treasure collected.
pub const TREASURE_POINTS: u32 = 100;
/// Bonus awarded once every treasure has been collected.
pub const COMPLETION_BONUS: u32 = 500;

/// Read surface shared by the authoritative board and its read-only views.
pub trait BoardQuery {
    /// Name of the board.
    fn name(&self) -> &str;

    /// Current player location.
    fn player_location(&self) -> Location;

    /// Location the player started from.
    fn starting_location(&self) -> Location;

    /// Squares still holding a treasure, in collection-list order.
    fn treasures(&self) -> Vec<&Square>;

    /// Number of treasures the board started with.
    fn initial_treasure_count(&self) -> usize;

    /// Number of treasures still waiting to be collected.
    fn remaining_treasure_count(&self) -> usize;

    /// Step budget the board started with.
    fn max_steps(&self) -> u32;

    /// Steps left in the budget.
    fn remaining_steps(&self) -> u32;

    /// Square at the provided location, `None` outside the grid.
    fn square_at(&self, location: Location) -> Option<&Square>;

    /// Number of columns, border included.
    fn width(&self) -> u32;

    /// Number of rows, border included.
    fn height(&self) -> u32;

    /// Number of treasures collected so far.
    fn obtained_treasure_count(&self) -> usize {
        self.initial_treasure_count()
            .saturating_sub(self.remaining_treasure_count())
    }

    /// Cardinal moves leading to adjacent squares the player has never entered.
    ///
    /// Terrain is irrelevant: a never-visited wall is reported like any other
    /// square.
    fn unexplored_moves(&self) -> Vec<Move> {
        let player = self.player_location();
        Move::CARDINAL
            .into_iter()
            .filter(|mv| {
                mv.apply(player)
                    .ok()
                    .and_then(|target| self.square_at(target))
                    .is_some_and(|square| square.is_valid_move(self) && square.step_count() == 0)
            })
            .collect()
    }

    /// Reports whether the board reached a terminal state.
    fn is_complete(&self) -> bool {
        self.remaining_treasure_count() == 0 || self.remaining_steps() == 0
    }

    /// Current score.
    ///
    /// Collecting every treasure earns the remaining steps plus a completion
    /// bonus on top of the per-treasure points.
    fn score(&self) -> u32 {
        let obtained = u32::try_from(self.obtained_treasure_count()).unwrap_or(u32::MAX);
        let treasure_points = obtained.saturating_mul(TREASURE_POINTS);
        if self.remaining_treasure_count() == 0 {
            self.remaining_steps()
                .saturating_add(treasure_points)
                .saturating_add(COMPLETION_BONUS)
        } else {
            treasure_points
        }
    }
}

/// Board surface that additionally accepts moves.
pub trait GameBoard: BoardQuery {
    /// Applies the provided move, reporting what happened.
    fn apply_move(&mut self, mv: Move) -> Result<MoveOutcome, MoveError>;
}

/// Description of a successfully applied move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MoveOutcome {
    /// Move requested by the caller.
    pub requested: Move,
    /// Cardinal move that was actually performed.
    pub effective: Move,
    /// Player location before the move.
    pub from: Location,
    /// Player location after the move.
    pub to: Location,
    /// Declared step cost of the entered square.
    pub step_cost: u32,
    /// Steps left after the move.
    pub remaining_steps: u32,
    /// Indicates whether a treasure was picked up.
    pub treasure_collected: bool,
}

#[derive(Clone, Copy, Debug)]
enum HistoryChange {
    Pushed,
    Popped(Move),
}

/// Authoritative treasure hunt board.
///
/// Cloning a board yields a fully independent copy of the grid, treasure
/// list and move history, which is how private snapshots are handed to
/// players.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    name: String,
    width: u32,
    height: u32,
    grid: Vec<Square>,
    player_location: Location,
    starting_location: Location,
    remaining_steps: u32,
    max_steps: u32,
    treasures: Vec<Location>,
    initial_treasure_count: usize,
    move_history: Vec<Move>,
}

impl Board {
    /// Constructs a board from already-parsed terrain data.
    ///
    /// The outer ring is always wall. Exactly one player start and at least
    /// one treasure must lie inside it.
    pub fn from_layout(layout: &BoardLayout) -> Result<Self, BoardError> {
        let width = layout.width();
        let height = layout.height();
        if width == 0 || height == 0 {
            return Err(BoardError::EmptyGrid);
        }
        let (Ok(width_i32), Ok(height_i32)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(BoardError::GridTooLarge);
        };
        let (Ok(width_u32), Ok(height_u32)) = (u32::try_from(width), u32::try_from(height)) else {
            return Err(BoardError::GridTooLarge);
        };

        let mut grid = Vec::with_capacity(width * height);
        let mut player: Option<Location> = None;
        let mut treasures = Vec::new();

        for row in 0..height_i32 {
            for col in 0..width_i32 {
                let location = Location::new(row, col);
                let on_border =
                    row == 0 || col == 0 || row == height_i32 - 1 || col == width_i32 - 1;
                let tile = if on_border {
                    Tile::Terrain(Terrain::Wall)
                } else {
                    layout
                        .tile_at(location)
                        .unwrap_or(Tile::Terrain(Terrain::Space))
                };

                let square = match tile {
                    Tile::PlayerStart => {
                        if let Some(first) = player {
                            return Err(BoardError::DuplicatePlayerStart {
                                first,
                                second: location,
                            });
                        }
                        player = Some(location);
                        Square::player_start(location)
                    }
                    Tile::Terrain(terrain) => {
                        if terrain == Terrain::Treasure {
                            treasures.push(location);
                        }
                        Square::new(terrain, location)
                    }
                };
                grid.push(square);
            }
        }

        let player = player.ok_or(BoardError::MissingPlayerStart)?;
        if treasures.is_empty() {
            return Err(BoardError::MissingTreasure);
        }

        debug!(
            name = layout.name(),
            width,
            height,
            treasures = treasures.len(),
            max_steps = layout.max_steps(),
            "board constructed"
        );

        Ok(Self {
            name: layout.name().to_owned(),
            width: width_u32,
            height: height_u32,
            grid,
            player_location: player,
            starting_location: player,
            remaining_steps: layout.max_steps(),
            max_steps: layout.max_steps(),
            initial_treasure_count: treasures.len(),
            treasures,
            move_history: Vec::new(),
        })
    }

    /// Cardinal moves taken and not yet undone, oldest first.
    #[must_use]
    pub fn move_history(&self) -> &[Move] {
        &self.move_history
    }

    /// Read-only perspective on the board.
    #[must_use]
    pub fn view(&self) -> BoardView<'_> {
        BoardView::new(self)
    }

    /// Iterates over the grid one row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[Square]> {
        let width = usize::try_from(self.width).unwrap_or(usize::MAX);
        self.grid.chunks(width)
    }

    /// Applies a move, see [`GameBoard::apply_move`].
    pub fn move_player(&mut self, mv: Move) -> Result<MoveOutcome, MoveError> {
        if self.is_complete() {
            return Err(MoveError::BoardComplete {
                remaining_treasures: self.treasures.len(),
                remaining_steps: self.remaining_steps,
            });
        }

        let (effective, change) = match mv {
            Move::Backtrack => {
                let Some(last) = self.move_history.pop() else {
                    return Err(MoveError::IllegalBacktrack);
                };
                let Some(inverse) = last.inverse() else {
                    self.move_history.push(last);
                    return Err(MoveError::IllegalBacktrack);
                };
                (inverse, HistoryChange::Popped(last))
            }
            cardinal => {
                self.move_history.push(cardinal);
                (cardinal, HistoryChange::Pushed)
            }
        };

        let from = self.player_location;
        let target = match effective.apply(from) {
            Ok(target) => target,
            Err(error) => {
                self.revert_history(change);
                return Err(error);
            }
        };

        let arrival = match self.index(target) {
            Some(index) => {
                let square = &mut self.grid[index];
                square
                    .move_to(from)
                    .map(|arrival| (arrival, square.step_cost()))
            }
            None => None,
        };
        let Some((arrival, step_cost)) = arrival else {
            self.revert_history(change);
            return Err(MoveError::IllegalMove {
                attempted: effective,
                from,
                to: target,
            });
        };

        self.remaining_steps = self.remaining_steps.saturating_sub(step_cost);
        self.player_location = target;
        let treasure_collected = arrival == Arrival::TreasureCollected;
        if treasure_collected {
            self.treasures.retain(|location| *location != target);
        }

        trace!(
            requested = ?mv,
            effective = ?effective,
            %from,
            to = %target,
            step_cost,
            remaining_steps = self.remaining_steps,
            treasure_collected,
            "player moved"
        );

        Ok(MoveOutcome {
            requested: mv,
            effective,
            from,
            to: target,
            step_cost,
            remaining_steps: self.remaining_steps,
            treasure_collected,
        })
    }

    fn revert_history(&mut self, change: HistoryChange) {
        match change {
            HistoryChange::Pushed => {
                let _ = self.move_history.pop();
            }
            HistoryChange::Popped(previous) => self.move_history.push(previous),
        }
    }

    fn index(&self, location: Location) -> Option<usize> {
        let row = u32::try_from(location.row()).ok()?;
        let col = u32::try_from(location.col()).ok()?;
        if row < self.height && col < self.width {
            let row = usize::try_from(row).ok()?;
            let col = usize::try_from(col).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + col)
        } else {
            None
        }
    }
}

impl BoardQuery for Board {
    fn name(&self) -> &str {
        &self.name
    }

    fn player_location(&self) -> Location {
        self.player_location
    }

    fn starting_location(&self) -> Location {
        self.starting_location
    }

    fn treasures(&self) -> Vec<&Square> {
        self.treasures
            .iter()
            .filter_map(|location| self.square_at(*location))
            .collect()
    }

    fn initial_treasure_count(&self) -> usize {
        self.initial_treasure_count
    }

    fn remaining_treasure_count(&self) -> usize {
        self.treasures.len()
    }

    fn max_steps(&self) -> u32 {
        self.max_steps
    }

    fn remaining_steps(&self) -> u32 {
        self.remaining_steps
    }

    fn square_at(&self, location: Location) -> Option<&Square> {
        self.index(location).and_then(|index| self.grid.get(index))
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

impl GameBoard for Board {
    fn apply_move(&mut self, mv: Move) -> Result<MoveOutcome, MoveError> {
        self.move_player(mv)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for square in row {
                let tag = if square.location() == self.player_location {
                    Tile::PLAYER_START_TAG
                } else if square.terrain() == Terrain::Treasure && !square.has_treasure() {
                    Terrain::Space.tag()
                } else {
                    square.terrain().tag()
                };
                write!(f, "{tag}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
