//! The 3x3x3 cube as the product of a corner orbit (8 pieces, orientations
//! in `Z_3`) and an edge orbit (12 pieces, orientations in `Z_2`).
//!
//! Corners 1 to 4 and edges 1 to 4 sit on the U face; corners 5 to 8 and
//! edges 9 to 12 sit on the D face. The table holds the six quarter turns
//! followed by their inverses, so generator `i + 6` undoes generator `i`.

use super::{MoveTable, PuzzleDef, PuzzleDefError};
use crate::group::OrbitDef;

pub const CORNERS: OrbitDef = OrbitDef::new(8, 3).unwrap();
pub const EDGES: OrbitDef = OrbitDef::new(12, 2).unwrap();

/// Corner orbit first, then edge orbit.
pub const CUBE3_ORBIT_DEFS: [OrbitDef; 2] = [CORNERS, EDGES];

pub const CUBE3_MOVES: [MoveTable<'static>; 12] = [
    MoveTable {
        name: "U",
        orbits: &[
            (&[0, 0, 0, 0, 0, 0, 0, 0], &[2, 3, 4, 1, 5, 6, 7, 8]),
            (
                &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                &[2, 3, 4, 1, 5, 6, 7, 8, 9, 10, 11, 12],
            ),
        ],
    },
    MoveTable {
        name: "R",
        orbits: &[
            (&[0, 0, 1, 2, 0, 0, 2, 1], &[1, 2, 7, 3, 5, 6, 8, 4]),
            (
                &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                &[1, 2, 7, 4, 5, 6, 11, 3, 9, 10, 8, 12],
            ),
        ],
    },
    MoveTable {
        name: "F",
        orbits: &[
            (&[2, 0, 0, 1, 1, 0, 0, 2], &[4, 2, 3, 8, 1, 6, 7, 5]),
            (
                &[0, 0, 0, 1, 1, 0, 0, 1, 0, 0, 0, 1],
                &[1, 2, 3, 8, 4, 6, 7, 12, 9, 10, 11, 5],
            ),
        ],
    },
    MoveTable {
        name: "B",
        orbits: &[
            (&[0, 1, 2, 0, 0, 2, 1, 0], &[1, 6, 2, 4, 5, 7, 3, 8]),
            (
                &[0, 1, 0, 0, 0, 1, 1, 0, 0, 1, 0, 0],
                &[1, 6, 3, 4, 5, 10, 2, 8, 9, 7, 11, 12],
            ),
        ],
    },
    MoveTable {
        name: "D",
        orbits: &[
            (&[0, 0, 0, 0, 0, 0, 0, 0], &[1, 2, 3, 4, 8, 5, 6, 7]),
            (
                &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                &[1, 2, 3, 4, 5, 6, 7, 8, 12, 9, 10, 11],
            ),
        ],
    },
    MoveTable {
        name: "L",
        orbits: &[
            (&[1, 2, 0, 0, 2, 1, 0, 0], &[5, 1, 3, 4, 6, 2, 7, 8]),
            (
                &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                &[5, 2, 3, 4, 9, 1, 7, 8, 6, 10, 11, 12],
            ),
        ],
    },
    MoveTable {
        name: "U'",
        orbits: &[
            (&[0, 0, 0, 0, 0, 0, 0, 0], &[4, 1, 2, 3, 5, 6, 7, 8]),
            (
                &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                &[4, 1, 2, 3, 5, 6, 7, 8, 9, 10, 11, 12],
            ),
        ],
    },
    MoveTable {
        name: "R'",
        orbits: &[
            (&[0, 0, 1, 2, 0, 0, 2, 1], &[1, 2, 4, 8, 5, 6, 3, 7]),
            (
                &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                &[1, 2, 8, 4, 5, 6, 3, 11, 9, 10, 7, 12],
            ),
        ],
    },
    MoveTable {
        name: "F'",
        orbits: &[
            (&[2, 0, 0, 1, 1, 0, 0, 2], &[5, 2, 3, 1, 8, 6, 7, 4]),
            (
                &[0, 0, 0, 1, 1, 0, 0, 1, 0, 0, 0, 1],
                &[1, 2, 3, 5, 12, 6, 7, 4, 9, 10, 11, 8],
            ),
        ],
    },
    MoveTable {
        name: "B'",
        orbits: &[
            (&[0, 1, 2, 0, 0, 2, 1, 0], &[1, 3, 7, 4, 5, 2, 6, 8]),
            (
                &[0, 1, 0, 0, 0, 1, 1, 0, 0, 1, 0, 0],
                &[1, 7, 3, 4, 5, 2, 10, 8, 9, 6, 11, 12],
            ),
        ],
    },
    MoveTable {
        name: "D'",
        orbits: &[
            (&[0, 0, 0, 0, 0, 0, 0, 0], &[1, 2, 3, 4, 6, 7, 8, 5]),
            (
                &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                &[1, 2, 3, 4, 5, 6, 7, 8, 10, 11, 12, 9],
            ),
        ],
    },
    MoveTable {
        name: "L'",
        orbits: &[
            (&[1, 2, 0, 0, 2, 1, 0, 0], &[2, 6, 3, 4, 1, 5, 7, 8]),
            (
                &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                &[6, 2, 3, 4, 1, 9, 7, 8, 5, 10, 11, 12],
            ),
        ],
    },
];

/// The full cube.
///
/// # Errors
///
/// Never in practice; the literal tables are validated like any other.
pub fn cube3() -> Result<PuzzleDef, PuzzleDefError> {
    PuzzleDef::new("3x3x3", &CUBE3_ORBIT_DEFS, &CUBE3_MOVES)
}

/// The cube with only the six clockwise quarter turns. Undoing a turn takes
/// three more of the same.
///
/// # Errors
///
/// See [`cube3`].
pub fn cube3_face_turns() -> Result<PuzzleDef, PuzzleDefError> {
    PuzzleDef::new("3x3x3 face turns", &CUBE3_ORBIT_DEFS, &CUBE3_MOVES[..6])
}

/// The cube with only its corners tracked.
///
/// # Errors
///
/// See [`cube3`].
pub fn cube3_corners() -> Result<PuzzleDef, PuzzleDefError> {
    Ok(cube3()?.restrict("3x3x3 corners", 0))
}

/// The cube with only its edges tracked.
///
/// # Errors
///
/// See [`cube3`].
pub fn cube3_edges() -> Result<PuzzleDef, PuzzleDefError> {
    Ok(cube3()?.restrict("3x3x3 edges", 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turns_have_order_four() {
        let cube3 = cube3().unwrap();
        for move_ in cube3.generators() {
            for orbit in move_.puzzle_state().orbits() {
                assert_eq!(orbit.order(), 4, "{}", move_.name());
            }
        }
    }

    #[test]
    fn twists_and_flips_sum_to_zero() {
        let cube3 = cube3().unwrap();
        for move_ in cube3.generators() {
            let [corners, edges] = move_.puzzle_state().orbits() else {
                panic!("expected two orbits");
            };
            let twist: u32 = corners.orientation().iter().copied().map(u32::from).sum();
            let flip: u32 = edges.orientation().iter().copied().map(u32::from).sum();
            assert_eq!(twist % 3, 0);
            assert_eq!(flip % 2, 0);
        }
    }

    #[test]
    fn restrictions_keep_the_move_table() {
        let corners = cube3_corners().unwrap();
        let edges = cube3_edges().unwrap();
        assert_eq!(corners.orbit_defs(), &[CORNERS]);
        assert_eq!(edges.orbit_defs(), &[EDGES]);
        assert_eq!(corners.generators().len(), 12);
        assert_eq!(edges.generators()[3].name(), "B");
        assert!(edges.is_done(&edges.start_state()));
    }
}
