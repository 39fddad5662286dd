//! Mapping states to the compact keys a search stores.

use std::hash::Hash;
use wreath_core::{IndexingError, PermutationIndex, TileState};

/// A bijection between states and keys. Searches store keys in their queues
/// and visited sets and recover states with [`StateIndex::state`].
pub trait StateIndex<S> {
    type Key: Clone + Eq + Hash;

    /// # Errors
    ///
    /// If `state` is outside the indexed space.
    fn key(&self, state: &S) -> Result<Self::Key, IndexingError>;

    /// # Errors
    ///
    /// If `key` was not produced by this index.
    fn state(&self, key: &Self::Key) -> Result<S, IndexingError>;
}

impl StateIndex<TileState> for PermutationIndex {
    type Key = usize;

    fn key(&self, state: &TileState) -> Result<usize, IndexingError> {
        self.state_to_index(state.tiles())
    }

    fn state(&self, key: &usize) -> Result<TileState, IndexingError> {
        let tiles = self
            .index_to_state(*key)
            .ok_or(IndexingError::IndexOutOfRange {
                index: *key,
                len: self.len(),
            })?;
        Ok(TileState::new(tiles)?)
    }
}

/// Every state is its own key. For spaces too large to enumerate, such as
/// the full cube.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityIndex;

impl<S: Clone + Eq + Hash> StateIndex<S> for IdentityIndex {
    type Key = S;

    fn key(&self, state: &S) -> Result<S, IndexingError> {
        Ok(state.clone())
    }

    fn state(&self, key: &S) -> Result<S, IndexingError> {
        Ok(key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wreath_core::SlidingTile;

    #[test]
    fn tile_keys_round_trip() {
        let eight = SlidingTile::new(3).unwrap();
        let index = PermutationIndex::new(eight.cell_count()).unwrap();
        let solved = eight.solved_state();
        assert_eq!(index.key(&solved).unwrap(), 0);

        let mut rng = fastrand::Rng::with_seed(2);
        let scrambled = eight.scramble(30, &mut rng);
        let key = index.key(&scrambled).unwrap();
        assert_eq!(StateIndex::<TileState>::state(&index, &key).unwrap(), scrambled);
        assert_eq!(
            StateIndex::<TileState>::state(&index, &index.len()).unwrap_err(),
            IndexingError::IndexOutOfRange {
                index: 362_880,
                len: 362_880
            }
        );
    }
}
