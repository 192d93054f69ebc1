#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the treasure hunt engine.
//!
//! This crate defines the value types that connect the authoritative board,
//! the maze generation system, and adapters. Adapters and players express
//! intent through [`Move`] values, the board resolves them against the
//! [`Terrain`] at the target [`Location`], and every failure surfaces as one
//! of the typed errors declared here.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Immutable row and column coordinate of a single board square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    row: i32,
    col: i32,
}

impl Location {
    /// Creates a new board coordinate.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index of the square.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index of the square.
    #[must_use]
    pub const fn col(&self) -> i32 {
        self.col
    }

    /// Computes the Manhattan distance between two locations.
    #[must_use]
    pub fn distance(self, other: Location) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Returns the location offset by the provided row and column deltas.
    #[must_use]
    pub const fn translate(self, row_delta: i32, col_delta: i32) -> Self {
        Self {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// Four cardinal neighbours in [`Move::CARDINAL`] order.
    #[must_use]
    pub fn neighbors(self) -> [Location; 4] {
        Move::CARDINAL.map(|mv| match mv.delta() {
            Some((row_delta, col_delta)) => self.translate(row_delta, col_delta),
            None => self,
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row={}, col={})", self.row, self.col)
    }
}

/// Moves a player may request from the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward decreasing column indices.
    West,
    /// Undoes the most recent cardinal move using the board's move history.
    Backtrack,
}

impl Move {
    /// Cardinal moves in the order boards report them.
    pub const CARDINAL: [Move; 4] = [Move::North, Move::South, Move::East, Move::West];

    /// Row and column delta of the move, absent for [`Move::Backtrack`].
    #[must_use]
    pub const fn delta(self) -> Option<(i32, i32)> {
        match self {
            Self::North => Some((-1, 0)),
            Self::South => Some((1, 0)),
            Self::East => Some((0, 1)),
            Self::West => Some((0, -1)),
            Self::Backtrack => None,
        }
    }

    /// Reports whether the move carries a direction.
    #[must_use]
    pub const fn is_cardinal(self) -> bool {
        !matches!(self, Self::Backtrack)
    }

    /// Translates the provided location by the move's delta.
    ///
    /// [`Move::Backtrack`] has no delta of its own; it can only be resolved
    /// against a move history, so applying it directly is rejected.
    pub fn apply(self, location: Location) -> Result<Location, MoveError> {
        self.delta()
            .map(|(row_delta, col_delta)| location.translate(row_delta, col_delta))
            .ok_or(MoveError::UnsupportedOperation(
                UnsupportedOperation::ApplyBacktrack,
            ))
    }

    /// Opposite cardinal direction, absent for [`Move::Backtrack`].
    #[must_use]
    pub const fn inverse(self) -> Option<Move> {
        match self {
            Self::North => Some(Self::South),
            Self::South => Some(Self::North),
            Self::East => Some(Self::West),
            Self::West => Some(Self::East),
            Self::Backtrack => None,
        }
    }
}

/// Closed set of terrain kinds a board square may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Open ground.
    Space,
    /// Impassable in practice: entering it drains every remaining step.
    Wall,
    /// Slow ground.
    Mud,
    /// Shallow water.
    Water,
    /// Undergrowth.
    Bushes,
    /// Forest.
    Trees,
    /// Mountain pass.
    Mountain,
    /// Molten rock.
    Lava,
    /// Open ground holding a treasure.
    Treasure,
}

impl Terrain {
    /// Every terrain kind in declaration order.
    pub const ALL: [Terrain; 9] = [
        Terrain::Space,
        Terrain::Wall,
        Terrain::Mud,
        Terrain::Water,
        Terrain::Bushes,
        Terrain::Trees,
        Terrain::Mountain,
        Terrain::Lava,
        Terrain::Treasure,
    ];

    /// Steps deducted from the budget when a player enters the terrain.
    #[must_use]
    pub const fn step_cost(self) -> u32 {
        match self {
            Self::Space | Self::Treasure => 1,
            Self::Mud => 5,
            Self::Water => 13,
            Self::Bushes => 23,
            Self::Trees => 37,
            Self::Mountain => 47,
            Self::Lava => 61,
            Self::Wall => u32::MAX,
        }
    }

    /// Human readable terrain name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Space => "Space",
            Self::Wall => "Wall",
            Self::Mud => "Mud",
            Self::Water => "Water",
            Self::Bushes => "Bushes",
            Self::Trees => "Trees",
            Self::Mountain => "Mountain",
            Self::Lava => "Lava",
            Self::Treasure => "Treasure",
        }
    }

    /// Canonical board-file tag for the terrain.
    #[must_use]
    pub const fn tag(self) -> char {
        match self {
            Self::Space => ' ',
            Self::Wall => '#',
            Self::Mud => 'm',
            Self::Water => 'w',
            Self::Bushes => 'B',
            Self::Trees => 't',
            Self::Mountain => 'M',
            Self::Lava => 'L',
            Self::Treasure => 'T',
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic content of one cell of already-parsed board data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Cell holding the provided terrain.
    Terrain(Terrain),
    /// Open cell where the player begins.
    PlayerStart,
}

impl Tile {
    /// Tag marking the player's starting square.
    pub const PLAYER_START_TAG: char = 'P';

    /// Resolves a board-file tag, treating unknown tags as open ground.
    #[must_use]
    pub const fn from_tag(tag: char) -> Self {
        match tag {
            '#' | 'W' => Self::Terrain(Terrain::Wall),
            'T' => Self::Terrain(Terrain::Treasure),
            'w' => Self::Terrain(Terrain::Water),
            'B' => Self::Terrain(Terrain::Bushes),
            't' => Self::Terrain(Terrain::Trees),
            'M' => Self::Terrain(Terrain::Mountain),
            'L' => Self::Terrain(Terrain::Lava),
            'm' => Self::Terrain(Terrain::Mud),
            Self::PLAYER_START_TAG => Self::PlayerStart,
            _ => Self::Terrain(Terrain::Space),
        }
    }

    /// Canonical board-file tag for the tile.
    #[must_use]
    pub const fn tag(self) -> char {
        match self {
            Self::Terrain(terrain) => terrain.tag(),
            Self::PlayerStart => Self::PLAYER_START_TAG,
        }
    }
}

impl From<Terrain> for Tile {
    fn from(terrain: Terrain) -> Self {
        Self::Terrain(terrain)
    }
}

/// Operations that exist on a surface but are never permitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UnsupportedOperation {
    /// [`Move::Backtrack`] was applied to a location directly.
    #[error("a backtrack cannot be applied without a move history")]
    ApplyBacktrack,
    /// A mutation was requested through a read-only board view.
    #[error("the board view is read-only")]
    ReadOnlyBoard,
}

/// Reasons a move request may be rejected by a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum MoveError {
    /// A backtrack was requested while the player is back at the beginning.
    #[error("a backtrack was attempted, but the player is already back at the beginning")]
    IllegalBacktrack,
    /// The computed target square rejected the player.
    #[error("illegal {attempted:?} to {to} from {from}")]
    IllegalMove {
        /// Effective move that was attempted.
        attempted: Move,
        /// Player location before the attempt.
        from: Location,
        /// Square the move targeted.
        to: Location,
    },
    /// The board already reached a terminal state.
    #[error(
        "cannot move, the board is complete (remaining treasures = {remaining_treasures}, \
         remaining steps = {remaining_steps})"
    )]
    BoardComplete {
        /// Treasures still on the board.
        remaining_treasures: usize,
        /// Steps left in the budget.
        remaining_steps: u32,
    },
    /// The operation is not available on this surface.
    #[error(transparent)]
    UnsupportedOperation(#[from] UnsupportedOperation),
}

/// Structural problems detected while constructing a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum BoardError {
    /// The terrain grid has no rows or no columns.
    #[error("invalid board: the terrain grid is empty")]
    EmptyGrid,
    /// The terrain grid does not fit the coordinate range.
    #[error("invalid board: the terrain grid is too large")]
    GridTooLarge,
    /// No player start marker was found inside the border.
    #[error("invalid board: missing [P]layer space")]
    MissingPlayerStart,
    /// More than one player start marker was found.
    #[error("invalid board: second [P]layer space at {second}, first at {first}")]
    DuplicatePlayerStart {
        /// Marker encountered first in scan order.
        first: Location,
        /// Marker encountered afterwards.
        second: Location,
    },
    /// No treasure cell was found inside the border.
    #[error("invalid board: at least one [T]reasure space is required")]
    MissingTreasure,
}

#[cfg(test)]
mod tests {
    use super::{Location, Move, MoveError, Terrain, Tile, UnsupportedOperation};

    #[test]
    fn distance_is_symmetric_manhattan() {
        let origin = Location::new(1, 1);
        let destination = Location::new(4, 3);
        assert_eq!(origin.distance(destination), 5);
        assert_eq!(destination.distance(origin), 5);
        assert_eq!(origin.distance(origin), 0);
    }

    #[test]
    fn distance_handles_negative_coordinates() {
        let a = Location::new(-2, 3);
        let b = Location::new(1, -1);
        assert_eq!(a.distance(b), 7);
    }

    #[test]
    fn cardinal_moves_translate_by_one() {
        let origin = Location::new(5, 5);
        assert_eq!(Move::North.apply(origin), Ok(Location::new(4, 5)));
        assert_eq!(Move::South.apply(origin), Ok(Location::new(6, 5)));
        assert_eq!(Move::East.apply(origin), Ok(Location::new(5, 6)));
        assert_eq!(Move::West.apply(origin), Ok(Location::new(5, 4)));
    }

    #[test]
    fn applying_backtrack_is_unsupported() {
        assert_eq!(
            Move::Backtrack.apply(Location::new(1, 1)),
            Err(MoveError::UnsupportedOperation(
                UnsupportedOperation::ApplyBacktrack
            ))
        );
    }

    #[test]
    fn inverse_returns_to_origin() {
        let origin = Location::new(3, 7);
        for mv in Move::CARDINAL {
            let inverse = mv.inverse().expect("cardinal moves have an inverse");
            let there = mv.apply(origin).expect("cardinal");
            assert_eq!(inverse.apply(there), Ok(origin));
        }
        assert_eq!(Move::Backtrack.inverse(), None);
    }

    #[test]
    fn neighbors_follow_cardinal_order() {
        let origin = Location::new(2, 2);
        assert_eq!(
            origin.neighbors(),
            [
                Location::new(1, 2),
                Location::new(3, 2),
                Location::new(2, 3),
                Location::new(2, 1),
            ]
        );
    }

    #[test]
    fn step_costs_match_terrain_table() {
        let costs: Vec<u32> = Terrain::ALL.iter().map(|t| t.step_cost()).collect();
        assert_eq!(costs, vec![1, u32::MAX, 5, 13, 23, 37, 47, 61, 1]);
    }

    #[test]
    fn tags_resolve_to_terrain() {
        for terrain in Terrain::ALL {
            assert_eq!(Tile::from_tag(terrain.tag()), Tile::Terrain(terrain));
        }
        assert_eq!(Tile::from_tag('W'), Tile::Terrain(Terrain::Wall));
        assert_eq!(Tile::from_tag('P'), Tile::PlayerStart);
        assert_eq!(Tile::from_tag('?'), Tile::Terrain(Terrain::Space));
    }

    #[test]
    fn location_display_names_both_axes() {
        assert_eq!(Location::new(3, 9).to_string(), "(row=3, col=9)");
    }

    #[test]
    fn move_error_survives_bincode() {
        let error = MoveError::IllegalMove {
            attempted: Move::East,
            from: Location::new(1, 1),
            to: Location::new(1, 2),
        };
        let bytes = bincode::serialize(&error).expect("serialize");
        let restored: MoveError = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, error);
    }
}
