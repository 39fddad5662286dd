//! The n×n sliding tile puzzle. A state lists the tile at every cell in
//! row-major order; tiles are numbered `1..=n²` and tile `n²` is the blank.

use crate::group::{InvalidStateError, validate_permutation};

/// An n×n board. Boards up to 15×15 fit in a `u8` tile numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlidingTile {
    size: u8,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TileState(Box<[u8]>);

/// A direction the blank moves in. Neighbors are generated in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slide {
    Up,
    Down,
    Left,
    Right,
}

impl Slide {
    pub const ALL: [Slide; 4] = [Slide::Up, Slide::Down, Slide::Left, Slide::Right];
}

impl TileState {
    /// Wrap a permutation of `1..=len`. Use [`SlidingTile::state_from_tiles`]
    /// to also check the board size.
    ///
    /// # Errors
    ///
    /// If `tiles` is not a permutation.
    pub fn new(tiles: &[u8]) -> Result<Self, InvalidStateError> {
        validate_permutation(tiles)?;
        Ok(TileState(tiles.into()))
    }

    #[must_use]
    pub fn tiles(&self) -> &[u8] {
        &self.0
    }
}

impl SlidingTile {
    /// Returns `None` if `size` is zero or the board has more than 255 cells.
    #[must_use]
    pub const fn new(size: u8) -> Option<Self> {
        if size == 0 || size > 15 {
            None
        } else {
            Some(SlidingTile { size })
        }
    }

    #[must_use]
    pub fn size(self) -> usize {
        usize::from(self.size)
    }

    #[must_use]
    pub fn cell_count(self) -> usize {
        self.size() * self.size()
    }

    fn blank(self) -> u8 {
        // A board has at most 225 cells.
        #[allow(clippy::cast_possible_truncation)]
        let blank = self.cell_count() as u8;
        blank
    }

    /// Validate a row-major tile listing.
    ///
    /// # Errors
    ///
    /// If `tiles` is not a permutation of `1..=n²`.
    pub fn state_from_tiles(self, tiles: &[u8]) -> Result<TileState, InvalidStateError> {
        if tiles.len() != self.cell_count() {
            return Err(InvalidStateError::PieceCountMismatch {
                expected: self.cell_count(),
                actual: tiles.len(),
            });
        }
        TileState::new(tiles)
    }

    /// Tiles in ascending order with the blank in the last cell.
    #[must_use]
    pub fn solved_state(self) -> TileState {
        TileState((1..=self.blank()).collect())
    }

    #[must_use]
    pub fn is_done(self, tile_state: &TileState) -> bool {
        tile_state
            .0
            .iter()
            .enumerate()
            .all(|(i, &tile)| usize::from(tile) == i + 1)
    }

    fn blank_position(self, tile_state: &TileState) -> usize {
        let blank = self.blank();
        // Every validated state contains the blank exactly once.
        tile_state
            .0
            .iter()
            .position(|&tile| tile == blank)
            .unwrap_or_default()
    }

    /// Slide the blank one cell, or `None` if it would leave the board.
    #[must_use]
    pub fn slide(self, tile_state: &TileState, slide: Slide) -> Option<TileState> {
        let size = self.size();
        let blank = self.blank_position(tile_state);
        let (row, col) = (blank / size, blank % size);
        let target = match slide {
            Slide::Up if row > 0 => blank - size,
            Slide::Down if row + 1 < size => blank + size,
            Slide::Left if col > 0 => blank - 1,
            Slide::Right if col + 1 < size => blank + 1,
            _ => return None,
        };
        let mut tiles = tile_state.0.clone();
        tiles.swap(blank, target);
        Some(TileState(tiles))
    }

    /// Every legal slide of the blank, in `Slide::ALL` order. Corners have
    /// two neighbors, edges three and interior cells four.
    #[must_use]
    pub fn neighbors(self, tile_state: &TileState) -> Vec<TileState> {
        Slide::ALL
            .into_iter()
            .filter_map(|slide| self.slide(tile_state, slide))
            .collect()
    }

    /// `length` uniformly random legal slides from the solved state. A 1×1
    /// board has no legal slides and stays solved.
    pub fn scramble(self, length: usize, rng: &mut fastrand::Rng) -> TileState {
        let mut tile_state = self.solved_state();
        for _ in 0..length {
            let mut neighbors = self.neighbors(&tile_state);
            if neighbors.is_empty() {
                break;
            }
            let choice = rng.usize(..neighbors.len());
            tile_state = neighbors.swap_remove(choice);
        }
        tile_state
    }

    /// Sum over non-blank tiles of the grid distance to their home cell.
    #[must_use]
    pub fn manhattan(self, tile_state: &TileState) -> u32 {
        let size = self.size();
        let blank = self.blank();
        tile_state
            .0
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != blank)
            .map(|(i, &tile)| {
                let home = usize::from(tile) - 1;
                let distance = (i / size).abs_diff(home / size) + (i % size).abs_diff(home % size);
                // At most 28 on a 15x15 board.
                #[allow(clippy::cast_possible_truncation)]
                let distance = distance as u32;
                distance
            })
            .sum()
    }

    /// The number of non-blank tiles away from their home cell.
    #[must_use]
    pub fn hamming(self, tile_state: &TileState) -> u32 {
        let blank = self.blank();
        let misplaced = tile_state
            .0
            .iter()
            .enumerate()
            .filter(|&(i, &tile)| tile != blank && usize::from(tile) != i + 1)
            .count();
        // At most 224.
        #[allow(clippy::cast_possible_truncation)]
        let misplaced = misplaced as u32;
        misplaced
    }
}
