//! The Pyraminx edge orbit: 6 edges with orientations in `Z_2`. The tips
//! and axial centers are ignored. Each generator turns one of the four
//! corners, cycling three edges; generator `i + 4` undoes generator `i`.

use super::{MoveTable, PuzzleDef, PuzzleDefError, PuzzleState};
use crate::group::OrbitDef;

pub const PYRAMINX_EDGES: OrbitDef = OrbitDef::new(6, 2).unwrap();

pub const PYRAMINX_MOVES: [MoveTable<'static>; 8] = [
    MoveTable {
        name: "U",
        orbits: &[(&[0, 0, 1, 1, 0, 0], &[1, 3, 4, 2, 5, 6])],
    },
    MoveTable {
        name: "L",
        orbits: &[(&[1, 1, 0, 0, 0, 0], &[2, 6, 3, 4, 5, 1])],
    },
    MoveTable {
        name: "R",
        orbits: &[(&[1, 0, 1, 0, 0, 0], &[5, 2, 1, 4, 3, 6])],
    },
    MoveTable {
        name: "B",
        orbits: &[(&[0, 0, 0, 1, 1, 0], &[1, 2, 3, 5, 6, 4])],
    },
    MoveTable {
        name: "U'",
        orbits: &[(&[0, 1, 1, 0, 0, 0], &[1, 4, 2, 3, 5, 6])],
    },
    MoveTable {
        name: "L'",
        orbits: &[(&[1, 0, 0, 0, 0, 1], &[6, 1, 3, 4, 5, 2])],
    },
    MoveTable {
        name: "R'",
        orbits: &[(&[0, 0, 1, 0, 1, 0], &[3, 2, 5, 4, 1, 6])],
    },
    MoveTable {
        name: "B'",
        orbits: &[(&[0, 0, 0, 1, 0, 1], &[1, 2, 3, 6, 4, 5])],
    },
];

/// The Pyraminx with the identity as its only solved state.
///
/// # Errors
///
/// Never in practice; the literal tables are validated like any other.
pub fn pyraminx() -> Result<PuzzleDef, PuzzleDefError> {
    PuzzleDef::new("pyraminx", &[PYRAMINX_EDGES], &PYRAMINX_MOVES)
}

/// The Pyraminx, additionally accepting `solved_states` as solved.
///
/// # Errors
///
/// If a solved state is not a Pyraminx state.
pub fn pyraminx_with_solved_states(
    solved_states: impl IntoIterator<Item = PuzzleState>,
) -> Result<PuzzleDef, PuzzleDefError> {
    pyraminx()?.with_solved_states(solved_states)
}
