use treasure_hunt_core::{Location, Terrain, Tile};

/// Already-parsed terrain data a [`crate::Board`] is constructed from.
///
/// Rows may be ragged; missing cells are read as open ground. The outer ring
/// of the widest rectangle is always treated as wall by the board regardless
/// of the tiles stored here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardLayout {
    name: String,
    rows: Vec<Vec<Tile>>,
    width: usize,
    max_steps: u32,
}

impl BoardLayout {
    /// Creates a layout from row-major tiles and a step budget.
    #[must_use]
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Tile>>, max_steps: u32) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            name: name.into(),
            rows,
            width,
            max_steps,
        }
    }

    /// Builds a layout from one string of board-file tags per row.
    #[must_use]
    pub fn from_tag_rows<S>(name: impl Into<String>, rows: &[S], max_steps: u32) -> Self
    where
        S: AsRef<str>,
    {
        let rows = rows
            .iter()
            .map(|row| row.as_ref().chars().map(Tile::from_tag).collect())
            .collect();
        Self::new(name, rows, max_steps)
    }

    /// Name the board will carry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Row-major tiles.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }

    /// Step budget the board starts with.
    #[must_use]
    pub const fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Width of the widest row.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Tile at the provided location, reading missing cells of ragged rows as open ground.
    #[must_use]
    pub fn tile_at(&self, location: Location) -> Option<Tile> {
        let row = usize::try_from(location.row()).ok()?;
        let col = usize::try_from(location.col()).ok()?;
        if col >= self.width {
            return None;
        }
        self.rows
            .get(row)
            .map(|tiles| tiles.get(col).copied().unwrap_or(Tile::Terrain(Terrain::Space)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_pad_with_space() {
        let layout = BoardLayout::from_tag_rows("ragged", &["#####", "#P", "#####"], 10);
        assert_eq!(layout.width(), 5);
        assert_eq!(layout.height(), 3);
        assert_eq!(
            layout.tile_at(Location::new(1, 3)),
            Some(Tile::Terrain(Terrain::Space))
        );
        assert_eq!(layout.tile_at(Location::new(1, 1)), Some(Tile::PlayerStart));
        assert_eq!(layout.tile_at(Location::new(3, 0)), None);
        assert_eq!(layout.tile_at(Location::new(-1, 0)), None);
        assert_eq!(layout.tile_at(Location::new(0, 5)), None);
    }
}
