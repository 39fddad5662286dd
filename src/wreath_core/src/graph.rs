//! The seam between state spaces and the searches that walk them.

use crate::{
    puzzle::{PuzzleDef, PuzzleState},
    tile::{SlidingTile, TileState},
    traversal::Traversal,
};

/// A lazily expanded graph where every edge costs one move.
pub trait StateGraph {
    type State: Clone;

    /// Successors of `state`, in a fixed order.
    fn neighbors(&self, state: &Self::State) -> Vec<Self::State>;

    fn is_done(&self, state: &Self::State) -> bool;
}

impl StateGraph for PuzzleDef {
    type State = PuzzleState;

    fn neighbors(&self, state: &PuzzleState) -> Vec<PuzzleState> {
        PuzzleDef::neighbors(self, state)
    }

    fn is_done(&self, state: &PuzzleState) -> bool {
        PuzzleDef::is_done(self, state)
    }
}

impl StateGraph for Traversal<'_> {
    type State = PuzzleState;

    fn neighbors(&self, state: &PuzzleState) -> Vec<PuzzleState> {
        self.puzzle_def().neighbors(state)
    }

    fn is_done(&self, state: &PuzzleState) -> bool {
        self.puzzle_def().is_done(state)
    }
}

impl StateGraph for SlidingTile {
    type State = TileState;

    fn neighbors(&self, state: &TileState) -> Vec<TileState> {
        SlidingTile::neighbors(*self, state)
    }

    fn is_done(&self, state: &TileState) -> bool {
        SlidingTile::is_done(*self, state)
    }
}
