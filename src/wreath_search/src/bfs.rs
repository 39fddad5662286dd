use crate::{heuristic::DistanceOracle, index::StateIndex};
use fxhash::FxHashMap;
use itertools::Itertools;
use log::{debug, info};
use std::{collections::VecDeque, hash::Hash, time::Instant};
use wreath_core::{IndexingError, StateGraph, start, success, working};

/// The exact distance from every reachable state to the nearest solved
/// state, found by breadth-first search outward from the solved states.
/// This needs a move set closed under inverses, like the full `cube3` and
/// `pyraminx` tables and the sliding tile puzzle. For a forward-only set
/// such as `cube3_face_turns` the table holds distances from solved instead.
#[derive(Debug, Clone)]
pub struct DistanceTable<'a, I, K> {
    index: &'a I,
    distances: FxHashMap<K, u32>,
    max_distance: u32,
}

impl<'a, I, K: Clone + Eq + Hash> DistanceTable<'a, I, K> {
    /// # Errors
    ///
    /// If the index rejects a reachable state.
    pub fn from_solved<G: StateGraph>(
        graph: &G,
        index: &'a I,
        solved_states: impl IntoIterator<Item = G::State>,
    ) -> Result<Self, IndexingError>
    where
        I: StateIndex<G::State, Key = K>,
    {
        info!(start!("Building the distance table"));
        let start = Instant::now();

        let mut distances = FxHashMap::default();
        let mut queue = VecDeque::new();
        for solved_state in solved_states {
            if distances.insert(index.key(&solved_state)?, 0).is_none() {
                queue.push_back((solved_state, 0));
            }
        }

        let mut max_distance = 0;
        let mut layer_size = 0_usize;
        while let Some((state, distance)) = queue.pop_front() {
            if distance > max_distance {
                debug!(
                    working!("Distance {} has {} states"),
                    max_distance, layer_size
                );
                max_distance = distance;
                layer_size = 0;
            }
            layer_size += 1;
            for neighbor in graph.neighbors(&state) {
                let key = index.key(&neighbor)?;
                if !distances.contains_key(&key) {
                    distances.insert(key, distance + 1);
                    queue.push_back((neighbor, distance + 1));
                }
            }
        }
        debug!(
            working!("Distance {} has {} states"),
            max_distance, layer_size
        );

        info!(
            success!("Found {} states up to distance {} in {:.3}s"),
            distances.len(),
            max_distance,
            start.elapsed().as_secs_f64()
        );
        Ok(DistanceTable {
            index,
            distances,
            max_distance,
        })
    }

    /// The number of reachable states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    #[must_use]
    pub fn max_distance(&self) -> u32 {
        self.max_distance
    }

    /// How many states sit at each distance, indexed by distance.
    #[must_use]
    pub fn distance_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.max_distance as usize + 1];
        for &distance in self.distances.values() {
            counts[distance as usize] += 1;
        }
        counts
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u32)> {
        self.distances.iter().map(|(key, &distance)| (key, distance))
    }

    #[must_use]
    pub fn distance_of_key(&self, key: &K) -> Option<u32> {
        self.distances.get(key).copied()
    }

    /// Up to `count` distinct keys at exactly `distance`, chosen uniformly
    /// at random. Every key at that distance is returned if there are at
    /// most `count` of them.
    pub fn sample_keys(&self, distance: u32, count: usize, rng: &mut fastrand::Rng) -> Vec<K> {
        let mut keys = self
            .distances
            .iter()
            .filter(|&(_, &key_distance)| key_distance == distance)
            .map(|(key, _)| key.clone())
            .collect_vec();
        if keys.len() > count {
            rng.shuffle(&mut keys);
            keys.truncate(count);
        }
        keys
    }

    /// [`DistanceTable::sample_keys`], decoded back into states.
    ///
    /// # Errors
    ///
    /// If the index cannot decode a key it produced.
    pub fn sample_states<S>(
        &self,
        distance: u32,
        count: usize,
        rng: &mut fastrand::Rng,
    ) -> Result<Vec<S>, IndexingError>
    where
        I: StateIndex<S, Key = K>,
    {
        self.sample_keys(distance, count, rng)
            .iter()
            .map(|key| self.index.state(key))
            .collect()
    }
}

impl<S, I: StateIndex<S, Key = K>, K: Clone + Eq + Hash> DistanceOracle<S>
    for DistanceTable<'_, I, K>
{
    fn distance(&self, state: &S) -> Option<u32> {
        let key = self.index.key(state).ok()?;
        self.distance_of_key(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IdentityIndex;
    use wreath_core::{
        PermutationIndex, SlidingTile, TileState,
        puzzle::pyraminx::pyraminx,
    };

    #[test]
    fn two_by_two_tiles() {
        let four = SlidingTile::new(2).unwrap();
        let index = PermutationIndex::new(four.cell_count()).unwrap();
        let table = DistanceTable::from_solved(&four, &index, [four.solved_state()]).unwrap();
        // Half of all permutations are reachable; the blank cycles through a
        // 12-state loop.
        assert_eq!(table.len(), 12);
        assert_eq!(table.max_distance(), 6);
        assert_eq!(table.distance_counts(), vec![1, 2, 2, 2, 2, 2, 1]);
        assert_eq!(table.distance(&four.solved_state()), Some(0));
    }

    #[test]
    fn pyraminx_edges_by_layer() {
        let pyraminx = pyraminx().unwrap();
        let table =
            DistanceTable::from_solved(&pyraminx, &IdentityIndex, [pyraminx.start_state()])
                .unwrap();
        // Even permutations of 6 edges with an even number of flips.
        assert_eq!(table.len(), 360 * 32);
        assert_eq!(table.distance_counts()[1], 8);
        for neighbor in pyraminx.neighbors(&pyraminx.start_state()) {
            assert_eq!(table.distance(&neighbor), Some(1));
        }
    }

    #[test]
    fn samples_exact_distances() {
        let eight = SlidingTile::new(3).unwrap();
        let index = PermutationIndex::new(eight.cell_count()).unwrap();
        let table = DistanceTable::from_solved(&eight, &index, [eight.solved_state()]).unwrap();
        let mut rng = fastrand::Rng::with_seed(31);

        let sampled = table.sample_states::<TileState>(10, 5, &mut rng).unwrap();
        assert_eq!(sampled.len(), 5);
        assert_eq!(sampled.iter().unique().count(), 5);
        for tile_state in &sampled {
            assert_eq!(table.distance(tile_state), Some(10));
        }

        assert_eq!(
            table.sample_states::<TileState>(0, 5, &mut rng).unwrap(),
            vec![eight.solved_state()]
        );
        let farthest = table.sample_keys(table.max_distance(), 100, &mut rng);
        assert_eq!(
            farthest.len(),
            table.distance_counts()[table.max_distance() as usize]
        );
        assert!(table.sample_keys(table.max_distance() + 1, 5, &mut rng).is_empty());
    }

    /// A one-way cycle 0 -> 1 -> ... -> (len - 1) -> 0.
    struct Cycle {
        len: u32,
    }

    impl StateGraph for Cycle {
        type State = u32;

        fn neighbors(&self, state: &u32) -> Vec<u32> {
            vec![(state + 1) % self.len]
        }

        fn is_done(&self, state: &u32) -> bool {
            *state == 0
        }
    }

    #[test]
    fn forward_only_moves_measure_distance_from_solved() {
        let cycle = Cycle { len: 4 };
        let table = DistanceTable::from_solved(&cycle, &IdentityIndex, [0]).unwrap();
        // State 1 takes three moves to solve but is one move out.
        assert_eq!(table.distance(&1), Some(1));
        assert_eq!(table.distance(&3), Some(3));
    }
}
