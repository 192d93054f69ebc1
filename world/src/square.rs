use std::fmt;

use treasure_hunt_core::{Location, Terrain};

use crate::BoardQuery;

/// Terrain carried by a square together with any terrain-specific state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SquareKind {
    /// Open ground.
    Space,
    /// Border or maze wall.
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
    /// Open ground that may still hold a treasure.
    Treasure {
        /// Whether the treasure is still waiting to be collected.
        has_treasure: bool,
    },
}

impl SquareKind {
    /// Terrain without the per-square state.
    #[must_use]
    pub const fn terrain(self) -> Terrain {
        match self {
            Self::Space => Terrain::Space,
            Self::Wall => Terrain::Wall,
            Self::Mud => Terrain::Mud,
            Self::Water => Terrain::Water,
            Self::Bushes => Terrain::Bushes,
            Self::Trees => Terrain::Trees,
            Self::Mountain => Terrain::Mountain,
            Self::Lava => Terrain::Lava,
            Self::Treasure { .. } => Terrain::Treasure,
        }
    }
}

impl From<Terrain> for SquareKind {
    fn from(terrain: Terrain) -> Self {
        match terrain {
            Terrain::Space => Self::Space,
            Terrain::Wall => Self::Wall,
            Terrain::Mud => Self::Mud,
            Terrain::Water => Self::Water,
            Terrain::Bushes => Self::Bushes,
            Terrain::Trees => Self::Trees,
            Terrain::Mountain => Self::Mountain,
            Terrain::Lava => Self::Lava,
            Terrain::Treasure => Self::Treasure { has_treasure: true },
        }
    }
}

/// Result of a player successfully entering a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arrival {
    /// The player entered the square.
    Entered,
    /// The player entered the square and picked up its treasure.
    TreasureCollected,
}

/// One terrain cell of the board grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    location: Location,
    step_count: u32,
    kind: SquareKind,
}

impl Square {
    /// Creates an unvisited square of the provided terrain.
    #[must_use]
    pub fn new(terrain: Terrain, location: Location) -> Self {
        Self {
            location,
            step_count: 0,
            kind: SquareKind::from(terrain),
        }
    }

    /// Creates the open square the player starts on, already counted as visited.
    #[must_use]
    pub fn player_start(location: Location) -> Self {
        Self {
            location,
            step_count: 1,
            kind: SquareKind::Space,
        }
    }

    /// Location of the square on its board.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// Terrain kind and per-square state.
    #[must_use]
    pub const fn kind(&self) -> SquareKind {
        self.kind
    }

    /// Terrain of the square.
    #[must_use]
    pub const fn terrain(&self) -> Terrain {
        self.kind.terrain()
    }

    /// Steps deducted from the budget when the player enters the square.
    #[must_use]
    pub const fn step_cost(&self) -> u32 {
        self.kind.terrain().step_cost()
    }

    /// Number of times the player has entered the square.
    #[must_use]
    pub const fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Reports whether the square still holds an uncollected treasure.
    #[must_use]
    pub const fn has_treasure(&self) -> bool {
        matches!(self.kind, SquareKind::Treasure { has_treasure: true })
    }

    /// Reports whether the player could step onto the square from its current location.
    ///
    /// Legality is adjacency only. Terrain never blocks a move; expensive
    /// terrain such as [`Terrain::Wall`] deters the player purely through its
    /// step cost.
    #[must_use]
    pub fn is_valid_move<B>(&self, board: &B) -> bool
    where
        B: BoardQuery + ?Sized,
    {
        self.is_adjacent_to(board.player_location())
    }

    /// Records the player entering the square from `player_location`.
    ///
    /// Returns `None` without touching the square when the player is not
    /// adjacent. A treasure is handed over at most once; re-entering an
    /// emptied treasure square reports a plain [`Arrival::Entered`].
    pub fn move_to(&mut self, player_location: Location) -> Option<Arrival> {
        if !self.is_adjacent_to(player_location) {
            return None;
        }

        self.step_count = self.step_count.saturating_add(1);
        match &mut self.kind {
            SquareKind::Treasure { has_treasure } if *has_treasure => {
                *has_treasure = false;
                Some(Arrival::TreasureCollected)
            }
            _ => Some(Arrival::Entered),
        }
    }

    /// Produces an independent copy carrying the visit count and treasure state.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    fn is_adjacent_to(&self, location: Location) -> bool {
        self.location.distance(location) == 1
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{};step_count={}",
            self.terrain().name(),
            self.location,
            self.step_count
        )?;
        if let SquareKind::Treasure { has_treasure } = self.kind {
            write!(f, ";has_treasure={has_treasure}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entering_from_adjacent_square_counts_a_visit() {
        let mut square = Square::new(Terrain::Mud, Location::new(2, 2));
        assert_eq!(square.move_to(Location::new(2, 1)), Some(Arrival::Entered));
        assert_eq!(square.move_to(Location::new(1, 2)), Some(Arrival::Entered));
        assert_eq!(square.step_count(), 2);
    }

    #[test]
    fn entering_from_afar_is_rejected_without_mutation() {
        let mut square = Square::new(Terrain::Space, Location::new(2, 2));
        assert_eq!(square.move_to(Location::new(4, 2)), None);
        assert_eq!(square.move_to(Location::new(1, 1)), None);
        assert_eq!(square.move_to(Location::new(2, 2)), None);
        assert_eq!(square.step_count(), 0);
    }

    #[test]
    fn walls_accept_adjacent_players() {
        let mut wall = Square::new(Terrain::Wall, Location::new(0, 3));
        assert_eq!(wall.move_to(Location::new(1, 3)), Some(Arrival::Entered));
        assert_eq!(wall.step_cost(), u32::MAX);
    }

    #[test]
    fn treasure_is_collected_exactly_once() {
        let mut treasure = Square::new(Terrain::Treasure, Location::new(3, 3));
        assert!(treasure.has_treasure());
        assert_eq!(
            treasure.move_to(Location::new(3, 4)),
            Some(Arrival::TreasureCollected)
        );
        assert!(!treasure.has_treasure());
        assert_eq!(treasure.move_to(Location::new(3, 2)), Some(Arrival::Entered));
        assert_eq!(treasure.step_count(), 2);
        assert_eq!(treasure.terrain(), Terrain::Treasure);
    }

    #[test]
    fn duplicate_is_independent_of_original() {
        let mut original = Square::new(Terrain::Treasure, Location::new(1, 1));
        let mut copy = original.duplicate();
        assert_eq!(copy.move_to(Location::new(1, 2)), Some(Arrival::TreasureCollected));
        assert!(original.has_treasure());
        assert_eq!(original.step_count(), 0);

        assert_eq!(original.move_to(Location::new(2, 1)), Some(Arrival::TreasureCollected));
        let later = original.duplicate();
        assert!(!later.has_treasure());
        assert_eq!(later.step_count(), 1);
    }

    #[test]
    fn duplicates_of_every_terrain_are_independent() {
        for terrain in Terrain::ALL {
            let original = Square::new(terrain, Location::new(2, 2));
            let mut copy = original.duplicate();
            assert!(copy.move_to(Location::new(2, 3)).is_some());
            assert_eq!(copy.step_count(), 1, "{terrain}");
            assert_eq!(original.step_count(), 0, "{terrain}");
            assert_eq!(original.has_treasure(), terrain == Terrain::Treasure);
        }
    }

    #[test]
    fn player_start_counts_as_visited() {
        let start = Square::player_start(Location::new(4, 4));
        assert_eq!(start.step_count(), 1);
        assert_eq!(start.terrain(), Terrain::Space);
    }

    #[test]
    fn display_includes_treasure_state() {
        let treasure = Square::new(Terrain::Treasure, Location::new(1, 2));
        assert_eq!(
            treasure.to_string(),
            "Treasure[(row=1, col=2);step_count=0;has_treasure=true]"
        );
        let lava = Square::new(Terrain::Lava, Location::new(5, 6));
        assert_eq!(lava.to_string(), "Lava[(row=5, col=6);step_count=0]");
    }
}
