#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state for the treasure hunt.
//!
//! A [`Board`] is built once from a [`BoardLayout`], either produced by the
//! maze generation system or decoded by an adapter, and then mutated only
//! through [`GameBoard::apply_move`]. Players that must not mutate the board
//! receive a [`BoardView`] or a private clone.

mod board;
mod layout;
mod square;
mod view;

pub use board::{Board, BoardQuery, GameBoard, MoveOutcome, COMPLETION_BONUS, TREASURE_POINTS};
pub use layout::BoardLayout;
pub use square::{Arrival, Square, SquareKind};
pub use view::BoardView;
