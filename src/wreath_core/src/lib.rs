//! Wreath product models of twisting and sliding puzzles, and the lazy state
//! graph they induce.
//!
//! A puzzle is a list of piece orbits. Each orbit is a permutation of its
//! pieces paired with a vector of per-piece orientations in `Z_n`, and moves
//! act on states by the semidirect product law in [`group`].

#![warn(clippy::pedantic)]

pub mod graph;
pub mod group;
pub mod indexing;
pub mod puzzle;
pub mod tile;
pub mod traversal;

pub use graph::StateGraph;
pub use group::{GroupError, InvalidStateError, ModulusError, OrbitDef, WreathElement};
pub use indexing::{IndexingError, PermutationIndex};
pub use puzzle::{Move, MoveTable, PuzzleDef, PuzzleDefError, PuzzleState};
pub use tile::{Slide, SlidingTile, TileState};
pub use traversal::{Traversal, TraversalError};

#[macro_export]
macro_rules! start {
    ($msg:expr) => {
        concat!("⏳ ", $msg)
    };
}

#[macro_export]
macro_rules! working {
    ($msg:expr) => {
        concat!("🛠  ", $msg)
    };
}

#[macro_export]
macro_rules! success {
    ($msg:expr) => {
        concat!("✅ ", $msg)
    };
}

/// A precomputed factorial table where index[i] is i!. 20! is the last value
/// that fits in a u64.
pub(crate) const FACT_UNTIL_20: [u64; 21] = {
    let mut arr = [0; 21];
    arr[0] = 1;
    let mut i = 1;
    while i <= 20 {
        arr[i] = arr[i - 1] * i as u64;
        i += 1;
    }
    arr
};
