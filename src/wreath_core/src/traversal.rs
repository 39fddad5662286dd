//! Walking the state graph of a puzzle: single steps, full neighborhoods and
//! seeded random walks.

use crate::{
    group::GroupError,
    puzzle::{Move, PuzzleDef, PuzzleState},
};
use itertools::Itertools;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum TraversalError {
    #[error("Invalid move index, expected a value below {move_count} but got {index}")]
    InvalidMoveIndex { index: usize, move_count: usize },
    #[error("Unknown move: {0}")]
    UnknownMove(String),
    #[error(transparent)]
    Group(#[from] GroupError),
}

impl PuzzleDef {
    /// Apply generator `move_index` to `puzzle_state`. The move acts on the
    /// left: the result is `move · state`.
    ///
    /// # Errors
    ///
    /// If `move_index` is out of range or `puzzle_state` belongs to another
    /// puzzle.
    pub fn step(
        &self,
        puzzle_state: &PuzzleState,
        move_index: usize,
    ) -> Result<PuzzleState, TraversalError> {
        let move_ = self
            .generators()
            .get(move_index)
            .ok_or(TraversalError::InvalidMoveIndex {
                index: move_index,
                move_count: self.generators().len(),
            })?;
        Ok(move_.puzzle_state().compose(puzzle_state)?)
    }

    /// Every successor of `puzzle_state`, one per generator, in table order.
    /// Nothing is deduplicated or filtered.
    ///
    /// # Panics
    ///
    /// Panics if `puzzle_state` is not a state of this puzzle.
    #[must_use]
    pub fn neighbors(&self, puzzle_state: &PuzzleState) -> Vec<PuzzleState> {
        assert!(
            self.check_state(puzzle_state).is_ok(),
            "State does not belong to puzzle {}",
            self.name
        );
        self.generators()
            .iter()
            .map(|move_| move_.puzzle_state().compose_unchecked(puzzle_state))
            .collect_vec()
    }

    /// Apply a whitespace separated sequence of move names, left to right.
    ///
    /// # Errors
    ///
    /// If a name is not in the move table or `puzzle_state` belongs to
    /// another puzzle.
    pub fn apply_moves(
        &self,
        puzzle_state: &PuzzleState,
        moves: &str,
    ) -> Result<PuzzleState, TraversalError> {
        self.check_state(puzzle_state)?;
        let mut result = puzzle_state.clone();
        for name in moves.split_whitespace() {
            let move_ = self
                .find_move(name)
                .ok_or_else(|| TraversalError::UnknownMove(name.to_owned()))?;
            result = move_.puzzle_state().compose_unchecked(&result);
        }
        Ok(result)
    }
}

/// A puzzle definition paired with its own random source. Everything random
/// about a traversal is reproducible from its seed.
#[derive(Debug, Clone)]
pub struct Traversal<'a> {
    puzzle_def: &'a PuzzleDef,
    rng: fastrand::Rng,
}

impl<'a> Traversal<'a> {
    #[must_use]
    pub fn new(puzzle_def: &'a PuzzleDef, rng: fastrand::Rng) -> Self {
        Traversal { puzzle_def, rng }
    }

    #[must_use]
    pub fn with_seed(puzzle_def: &'a PuzzleDef, seed: u64) -> Self {
        Self::new(puzzle_def, fastrand::Rng::with_seed(seed))
    }

    #[must_use]
    pub fn puzzle_def(&self) -> &'a PuzzleDef {
        self.puzzle_def
    }

    #[must_use]
    pub fn start_state(&self) -> PuzzleState {
        self.puzzle_def.start_state()
    }

    #[must_use]
    pub fn generators(&self) -> &'a [Move] {
        self.puzzle_def.generators()
    }

    /// See [`PuzzleDef::step`].
    ///
    /// # Errors
    ///
    /// If `move_index` is out of range or `puzzle_state` belongs to another
    /// puzzle.
    pub fn step(
        &self,
        puzzle_state: &PuzzleState,
        move_index: usize,
    ) -> Result<PuzzleState, TraversalError> {
        self.puzzle_def.step(puzzle_state, move_index)
    }

    /// See [`PuzzleDef::neighbors`].
    ///
    /// # Panics
    ///
    /// Panics if `puzzle_state` is not a state of this puzzle.
    #[must_use]
    pub fn neighbors(&self, puzzle_state: &PuzzleState) -> Vec<PuzzleState> {
        self.puzzle_def.neighbors(puzzle_state)
    }

    #[must_use]
    pub fn is_done(&self, puzzle_state: &PuzzleState) -> bool {
        self.puzzle_def.is_done(puzzle_state)
    }

    /// The random source, for callers that draw alongside the walk.
    pub fn rng(&mut self) -> &mut fastrand::Rng {
        &mut self.rng
    }

    /// A uniformly random generator index.
    pub fn random_move(&mut self) -> usize {
        self.rng.usize(..self.puzzle_def.generators().len())
    }

    /// A walk of `length` uniformly random moves from the start state. The
    /// returned states include the start, so there are `length + 1` of them.
    pub fn random_walk(&mut self, length: usize) -> Vec<PuzzleState> {
        let mut walk = Vec::with_capacity(length + 1);
        let mut current = self.puzzle_def.start_state();
        for _ in 0..length {
            let move_index = self.random_move();
            let move_ = &self.puzzle_def.generators()[move_index];
            let next = move_.puzzle_state().compose_unchecked(&current);
            walk.push(std::mem::replace(&mut current, next));
        }
        walk.push(current);
        walk
    }

    /// The last state of a random walk of `length` moves.
    pub fn random_state(&mut self, length: usize) -> PuzzleState {
        let start_state = self.puzzle_def.start_state();
        self.walk_from(start_state, length)
    }

    /// Apply `length` uniformly random moves to `puzzle_state`.
    ///
    /// # Errors
    ///
    /// If `puzzle_state` belongs to another puzzle.
    pub fn scramble(
        &mut self,
        puzzle_state: &PuzzleState,
        length: usize,
    ) -> Result<PuzzleState, TraversalError> {
        self.puzzle_def.check_state(puzzle_state)?;
        Ok(self.walk_from(puzzle_state.clone(), length))
    }

    fn walk_from(&mut self, mut current: PuzzleState, length: usize) -> PuzzleState {
        for _ in 0..length {
            let move_index = self.random_move();
            let move_ = &self.puzzle_def.generators()[move_index];
            current = move_.puzzle_state().compose_unchecked(&current);
        }
        current
    }
}
