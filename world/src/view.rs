use treasure_hunt_core::{Location, Move, MoveError, UnsupportedOperation};

use crate::{Board, BoardQuery, GameBoard, MoveOutcome, Square};

/// Read-only perspective on a [`Board`].
///
/// Answers every query exactly like the board it borrows and rejects moves
/// with [`UnsupportedOperation::ReadOnlyBoard`].
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    board: &'a Board,
}

impl<'a> BoardView<'a> {
    pub(crate) fn new(board: &'a Board) -> Self {
        Self { board }
    }

    /// Cardinal moves taken on the underlying board and not yet undone.
    #[must_use]
    pub fn move_history(&self) -> &'a [Move] {
        self.board.move_history()
    }
}

impl BoardQuery for BoardView<'_> {
    fn name(&self) -> &str {
        self.board.name()
    }

    fn player_location(&self) -> Location {
        self.board.player_location()
    }

    fn starting_location(&self) -> Location {
        self.board.starting_location()
    }

    fn treasures(&self) -> Vec<&Square> {
        self.board.treasures()
    }

    fn initial_treasure_count(&self) -> usize {
        self.board.initial_treasure_count()
    }

    fn remaining_treasure_count(&self) -> usize {
        self.board.remaining_treasure_count()
    }

    fn max_steps(&self) -> u32 {
        self.board.max_steps()
    }

    fn remaining_steps(&self) -> u32 {
        self.board.remaining_steps()
    }

    fn square_at(&self, location: Location) -> Option<&Square> {
        self.board.square_at(location)
    }

    fn width(&self) -> u32 {
        self.board.width()
    }

    fn height(&self) -> u32 {
        self.board.height()
    }
}

impl GameBoard for BoardView<'_> {
    fn apply_move(&mut self, _mv: Move) -> Result<MoveOutcome, MoveError> {
        Err(UnsupportedOperation::ReadOnlyBoard.into())
    }
}
