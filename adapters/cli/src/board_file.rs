//! Comma-separated board files.
//!
//! Every grid row is one line of single-character tags separated by commas.
//! The final line carries the step budget in its first field and is padded
//! with empty fields. Border cells are written as they are but always load
//! as walls.

use thiserror::Error;
use treasure_hunt_core::Tile;
use treasure_hunt_world::BoardLayout;

/// Separator between the fields of a row.
const FIELD_DELIMITER: char = ',';

/// Step budget assumed when the metadata row leaves it blank.
pub(crate) const DEFAULT_MAX_STEPS: u32 = 100;

/// File extension the generator writes.
pub(crate) const EXTENSION: &str = "csv";

/// Errors that can occur while decoding a board file.
#[derive(Debug, PartialEq, Eq, Error)]
pub(crate) enum BoardFileError {
    /// The file contained no rows at all.
    #[error("board file is empty")]
    Empty,
    /// The file held only the metadata row.
    #[error("board file has no grid rows before the step budget")]
    MissingGrid,
    /// The step budget in the metadata row is not a non-negative integer.
    #[error("step budget '{0}' is not a valid number")]
    InvalidMaxSteps(String),
}

/// Renders a layout in board-file form.
#[must_use]
pub(crate) fn encode(layout: &BoardLayout) -> String {
    let mut contents = String::new();
    for row in layout.rows() {
        let fields: Vec<String> = row.iter().map(|tile| tile.tag().to_string()).collect();
        contents.push_str(&fields.join(","));
        contents.push('\n');
    }
    contents.push_str(&layout.max_steps().to_string());
    for _ in 0..layout.width().saturating_sub(2) {
        contents.push(FIELD_DELIMITER);
    }
    contents.push('\n');
    contents
}

/// Parses board-file contents into a layout carrying the provided name.
pub(crate) fn decode(name: &str, contents: &str) -> Result<BoardLayout, BoardFileError> {
    let mut lines: Vec<&str> = contents
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect();

    let metadata = lines.pop().ok_or(BoardFileError::Empty)?;
    if lines.is_empty() {
        return Err(BoardFileError::MissingGrid);
    }
    let max_steps = parse_max_steps(metadata)?;

    let rows = lines
        .iter()
        .map(|line| line.split(FIELD_DELIMITER).map(parse_tile).collect())
        .collect();

    Ok(BoardLayout::new(name, rows, max_steps))
}

fn parse_tile(field: &str) -> Tile {
    field.chars().next().map_or(Tile::from_tag(' '), Tile::from_tag)
}

fn parse_max_steps(metadata: &str) -> Result<u32, BoardFileError> {
    let first = metadata
        .split(FIELD_DELIMITER)
        .next()
        .unwrap_or_default()
        .trim();
    if first.is_empty() {
        return Ok(DEFAULT_MAX_STEPS);
    }
    first
        .parse()
        .map_err(|_| BoardFileError::InvalidMaxSteps(first.to_owned()))
}
