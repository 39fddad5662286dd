//! A dense bijection between the permutations of `{1..k}` and `[0, k!)`.

use crate::{
    FACT_UNTIL_20,
    group::{InvalidStateError, validate_permutation},
};
use itertools::Itertools;
use log::debug;
use std::time::Instant;
use thiserror::Error;

/// Tables above this size do not fit comfortably in memory.
pub const MAX_INDEXED_PIECES: usize = 12;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum IndexingError {
    #[error("Cannot index {piece_count} pieces, at most {MAX_INDEXED_PIECES} are supported")]
    TooLarge { piece_count: usize },
    #[error("Index {index} is out of range for a table of {len} states")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Invalid state: {0}")]
    InvalidState(#[from] InvalidStateError),
}

/// The lexicographic ranking of every permutation of `{1..k}`. Index 0 is
/// the identity and index `k! - 1` is the reversal.
#[derive(Debug, Clone)]
pub struct PermutationIndex {
    piece_count: usize,
    states: Box<[Box<[u8]>]>,
}

impl PermutationIndex {
    /// Enumerate every permutation of `{1..piece_count}`.
    ///
    /// # Errors
    ///
    /// If `piece_count` is above [`MAX_INDEXED_PIECES`].
    pub fn new(piece_count: usize) -> Result<Self, IndexingError> {
        if piece_count > MAX_INDEXED_PIECES {
            return Err(IndexingError::TooLarge { piece_count });
        }
        let start = Instant::now();
        // Bounded by MAX_INDEXED_PIECES so this cannot truncate.
        #[allow(clippy::cast_possible_truncation)]
        let states = (1..=piece_count as u8)
            .permutations(piece_count)
            .map(Vec::into_boxed_slice)
            .collect::<Box<[_]>>();
        debug!(
            "Indexed {} permutations of {piece_count} pieces in {:.3?}",
            states.len(),
            start.elapsed()
        );
        Ok(PermutationIndex {
            piece_count,
            states,
        })
    }

    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.piece_count
    }

    /// `k!`, the number of indexed states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false: even `k = 0` has the empty permutation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The lexicographic rank of `state`.
    ///
    /// # Errors
    ///
    /// If `state` is not a permutation of `{1..k}`.
    pub fn state_to_index(&self, state: &[u8]) -> Result<usize, IndexingError> {
        if state.len() != self.piece_count {
            return Err(InvalidStateError::PieceCountMismatch {
                expected: self.piece_count,
                actual: state.len(),
            }
            .into());
        }
        validate_permutation(state)?;

        let mut rank = 0;
        for (i, &piece) in state.iter().enumerate() {
            let smaller_after = state[i + 1..].iter().filter(|&&p| p < piece).count();
            // Bounded by 12! so this cannot truncate.
            #[allow(clippy::cast_possible_truncation)]
            let weight = FACT_UNTIL_20[self.piece_count - i - 1] as usize;
            rank += smaller_after * weight;
        }
        Ok(rank)
    }

    /// The state at `index`, or `None` if `index >= k!`.
    #[must_use]
    pub fn index_to_state(&self, index: usize) -> Option<&[u8]> {
        self.states.get(index).map(AsRef::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.states.iter().map(AsRef::as_ref)
    }
}
