use crate::group::{GroupError, InvalidStateError, OrbitDef, WreathElement};
use fxhash::FxHashSet;
use itertools::Itertools;
use thiserror::Error;

pub mod cube3;
pub mod pyraminx;

/// A state of a puzzle: one wreath product element per orbit. States are
/// values; moves never mutate them in place.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct PuzzleState(Box<[WreathElement]>);

/// A named generator of the puzzle group.
#[derive(Debug, Clone)]
pub struct Move {
    name: String,
    puzzle_state: PuzzleState,
}

/// A literal generator table entry. `orbits` holds one
/// `(orientation, 1-indexed permutation)` pair per orbit of the puzzle.
#[derive(Debug, Clone, Copy)]
pub struct MoveTable<'a> {
    pub name: &'a str,
    pub orbits: &'a [(&'a [u8], &'a [u8])],
}

/// A puzzle variant: its orbits, its fixed, ordered generator table, and the
/// set of states considered solved.
#[derive(Debug, Clone)]
pub struct PuzzleDef {
    pub name: String,
    orbit_defs: Box<[OrbitDef]>,
    moves: Box<[Move]>,
    start_state: PuzzleState,
    solved_states: FxHashSet<PuzzleState>,
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum PuzzleDefError {
    #[error("A puzzle must define at least one orbit")]
    NoOrbits,
    #[error("A puzzle must define at least one move")]
    NoMoves,
    #[error("Duplicate move name: {0}")]
    DuplicateMove(String),
    #[error("Invalid transformation for move {name}: {source}")]
    InvalidMove {
        name: String,
        source: InvalidStateError,
    },
    #[error("Invalid state: {0}")]
    InvalidState(#[from] InvalidStateError),
    #[error("State does not belong to this puzzle: {0}")]
    IncompatibleState(#[from] GroupError),
}

impl PuzzleState {
    /// Assemble a state from already validated orbit elements.
    #[must_use]
    pub fn new(orbits: Vec<WreathElement>) -> Self {
        PuzzleState(orbits.into_boxed_slice())
    }

    #[must_use]
    pub fn identity(orbit_defs: &[OrbitDef]) -> Self {
        PuzzleState(
            orbit_defs
                .iter()
                .copied()
                .map(WreathElement::identity)
                .collect(),
        )
    }

    /// Build a state from untrusted tables, one
    /// `(orientation, 1-indexed permutation)` pair per orbit.
    ///
    /// # Errors
    ///
    /// If the tables do not describe a state of `orbit_defs`.
    pub fn from_tables(
        orbit_defs: &[OrbitDef],
        tables: &[(&[u8], &[u8])],
    ) -> Result<Self, InvalidStateError> {
        if orbit_defs.len() != tables.len() {
            return Err(InvalidStateError::OrbitCountMismatch {
                expected: orbit_defs.len(),
                actual: tables.len(),
            });
        }
        orbit_defs
            .iter()
            .zip(tables)
            .map(|(&orbit_def, &(orientation, permutation))| {
                WreathElement::new(orbit_def, orientation, permutation)
            })
            .collect::<Result<_, _>>()
            .map(PuzzleState)
    }

    #[must_use]
    pub fn orbits(&self) -> &[WreathElement] {
        &self.0
    }

    pub fn orbit_defs(&self) -> impl Iterator<Item = OrbitDef> + '_ {
        self.0.iter().map(WreathElement::orbit_def)
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.0.iter().all(WreathElement::is_identity)
    }

    /// Check that `other` is a state of the same puzzle shape as `self`.
    ///
    /// # Errors
    ///
    /// If the orbit counts or any orbit definitions differ.
    pub fn check_compatible(&self, other: &Self) -> Result<(), GroupError> {
        if self.0.len() != other.0.len() {
            return Err(InvalidStateError::OrbitCountMismatch {
                expected: self.0.len(),
                actual: other.0.len(),
            }
            .into());
        }
        self.0
            .iter()
            .zip(other.0.iter())
            .try_for_each(|(a, b)| a.check_compatible(b))
    }

    /// The group product `self · rhs`, computed orbit by orbit. `rhs` is
    /// applied first.
    ///
    /// # Errors
    ///
    /// If the states have different shapes.
    pub fn compose(&self, rhs: &Self) -> Result<Self, GroupError> {
        self.check_compatible(rhs)?;
        Ok(self.compose_unchecked(rhs))
    }

    pub(crate) fn compose_unchecked(&self, rhs: &Self) -> Self {
        PuzzleState(
            self.0
                .iter()
                .zip(rhs.0.iter())
                .map(|(a, b)| a.mul_unchecked(b))
                .collect(),
        )
    }

    #[must_use]
    pub fn inverse(&self) -> Self {
        PuzzleState(self.0.iter().map(WreathElement::inverse).collect())
    }

    /// `(orbit index, position)` pairs where `self` and `other` differ.
    #[must_use]
    pub fn differing_positions(&self, other: &Self) -> Vec<(usize, usize)> {
        self.0
            .iter()
            .zip(other.0.iter())
            .enumerate()
            .flat_map(|(orbit_index, (a, b))| {
                a.differing_positions(b)
                    .into_iter()
                    .map(move |position| (orbit_index, position))
            })
            .collect_vec()
    }
}

impl Move {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn puzzle_state(&self) -> &PuzzleState {
        &self.puzzle_state
    }

    /// Whether applying `self` then `other` equals applying `other` then
    /// `self`. Both moves must belong to the same puzzle.
    #[must_use]
    pub fn commutes_with(&self, other: &Self) -> bool {
        self.puzzle_state.compose_unchecked(&other.puzzle_state)
            == other.puzzle_state.compose_unchecked(&self.puzzle_state)
    }
}

impl PuzzleDef {
    /// Create a puzzle from literal generator tables. Every generator is
    /// validated against `orbit_defs` once, here.
    ///
    /// # Errors
    ///
    /// If the orbit or move list is empty, a move name repeats, or a table
    /// entry is not a valid group element. See `PuzzleDefError`.
    pub fn new(
        name: &str,
        orbit_defs: &[OrbitDef],
        move_tables: &[MoveTable],
    ) -> Result<Self, PuzzleDefError> {
        if orbit_defs.is_empty() {
            return Err(PuzzleDefError::NoOrbits);
        }
        if move_tables.is_empty() {
            return Err(PuzzleDefError::NoMoves);
        }

        let mut moves: Vec<Move> = Vec::with_capacity(move_tables.len());
        for move_table in move_tables {
            if moves.iter().any(|move_| move_.name == move_table.name) {
                return Err(PuzzleDefError::DuplicateMove(move_table.name.to_owned()));
            }
            let puzzle_state =
                PuzzleState::from_tables(orbit_defs, move_table.orbits).map_err(|source| {
                    PuzzleDefError::InvalidMove {
                        name: move_table.name.to_owned(),
                        source,
                    }
                })?;
            moves.push(Move {
                name: move_table.name.to_owned(),
                puzzle_state,
            });
        }

        let start_state = PuzzleState::identity(orbit_defs);
        let mut solved_states = FxHashSet::default();
        solved_states.insert(start_state.clone());

        Ok(PuzzleDef {
            name: name.to_owned(),
            orbit_defs: orbit_defs.into(),
            moves: moves.into_boxed_slice(),
            start_state,
            solved_states,
        })
    }

    /// Register additional states that count as solved, such as symmetric
    /// relabelings of the identity.
    ///
    /// # Errors
    ///
    /// If a state does not belong to this puzzle.
    pub fn with_solved_states(
        mut self,
        solved_states: impl IntoIterator<Item = PuzzleState>,
    ) -> Result<Self, PuzzleDefError> {
        for solved_state in solved_states {
            self.check_state(&solved_state)?;
            self.solved_states.insert(solved_state);
        }
        Ok(self)
    }

    /// Build a state of this puzzle from untrusted tables.
    ///
    /// # Errors
    ///
    /// If the tables do not describe a state of this puzzle.
    pub fn state_from_tables(
        &self,
        tables: &[(&[u8], &[u8])],
    ) -> Result<PuzzleState, InvalidStateError> {
        PuzzleState::from_tables(&self.orbit_defs, tables)
    }

    /// The generator table, in the stable order used for move indices.
    #[must_use]
    pub fn generators(&self) -> &[Move] {
        &self.moves
    }

    #[must_use]
    pub fn orbit_defs(&self) -> &[OrbitDef] {
        &self.orbit_defs
    }

    /// The canonical identity state.
    #[must_use]
    pub fn start_state(&self) -> PuzzleState {
        self.start_state.clone()
    }

    /// Check that `puzzle_state` has the orbit layout of this puzzle.
    ///
    /// # Errors
    ///
    /// If `puzzle_state` belongs to another puzzle.
    pub fn check_state(&self, puzzle_state: &PuzzleState) -> Result<(), GroupError> {
        self.start_state.check_compatible(puzzle_state)
    }

    pub fn solved_states(&self) -> impl Iterator<Item = &PuzzleState> {
        self.solved_states.iter()
    }

    #[must_use]
    pub fn is_done(&self, puzzle_state: &PuzzleState) -> bool {
        self.solved_states.contains(puzzle_state)
    }

    #[must_use]
    pub fn find_move(&self, name: &str) -> Option<&Move> {
        self.moves.iter().find(|move_| move_.name == name)
    }

    #[must_use]
    pub fn move_index(&self, name: &str) -> Option<usize> {
        self.moves.iter().position(|move_| move_.name == name)
    }

    /// The index of the generator that undoes generator `move_index`, if the
    /// table contains one. Tables are not required to be closed under
    /// inverses.
    #[must_use]
    pub fn inverse_move_index(&self, move_index: usize) -> Option<usize> {
        let inverse = self.moves.get(move_index)?.puzzle_state.inverse();
        self.moves
            .iter()
            .position(|move_| move_.puzzle_state == inverse)
    }

    /// The single-orbit puzzle that only tracks orbit `orbit_index`, with
    /// every generator and solved state projected onto it.
    ///
    /// # Panics
    ///
    /// Panics if `orbit_index` is out of bounds.
    #[must_use]
    pub fn restrict(&self, name: &str, orbit_index: usize) -> PuzzleDef {
        let project =
            |puzzle_state: &PuzzleState| PuzzleState::new(vec![puzzle_state.0[orbit_index].clone()]);
        PuzzleDef {
            name: name.to_owned(),
            orbit_defs: Box::new([self.orbit_defs[orbit_index]]),
            moves: self
                .moves
                .iter()
                .map(|move_| Move {
                    name: move_.name.clone(),
                    puzzle_state: project(&move_.puzzle_state),
                })
                .collect(),
            start_state: project(&self.start_state),
            solved_states: self.solved_states.iter().map(project).collect(),
        }
    }
}
