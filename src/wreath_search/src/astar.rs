use crate::{heuristic::Heuristic, index::StateIndex};
use fxhash::{FxHashMap, FxHashSet};
use log::{debug, info};
use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    time::{Duration, Instant},
};
use thiserror::Error;
use wreath_core::{IndexingError, StateGraph, start, success, working};

#[derive(Error, Debug, PartialEq, Clone)]
pub enum SearchError {
    #[error("Heuristic values must be finite and non-negative but got {0}")]
    InvalidHeuristic(f64),
    #[error("Batch evaluation returned {actual} values for {expected} states")]
    BatchLengthMismatch { expected: usize, actual: usize },
    #[error("Could not index a state: {0}")]
    Indexing(#[from] IndexingError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<S> {
    /// `path` runs from the start state to the solved state, both included,
    /// so it holds `length + 1` states.
    Solved { length: usize, path: Vec<S> },
    /// Every reachable state was expanded without finding a solved one.
    Exhausted,
    /// The node budget ran out first.
    BudgetExceeded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchStats {
    pub nodes_explored: usize,
    /// The smallest priority ever popped, starting from the heuristic value
    /// of the start state.
    pub min_heuristic_seen: f64,
    pub solution_length: Option<usize>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport<S> {
    pub outcome: SearchOutcome<S>,
    pub stats: SearchStats,
}

impl<S> SearchReport<S> {
    #[must_use]
    pub fn is_solved(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Solved { .. })
    }
}

/// A queued visit of `key`. Lower `f` pops first, then lower `g`, then the
/// earlier push.
#[derive(Debug)]
struct QueueEntry<K> {
    f: f64,
    g: usize,
    insertion: u64,
    key: K,
    parent: Option<K>,
}

impl<K> Ord for QueueEntry<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.g.cmp(&self.g))
            .then_with(|| other.insertion.cmp(&self.insertion))
    }
}

impl<K> PartialOrd for QueueEntry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> PartialEq for QueueEntry<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K> Eq for QueueEntry<K> {}

/// A* over any [`StateGraph`] with unit move costs.
#[derive(Debug)]
pub struct AStarSolver<'a, G, I> {
    graph: &'a G,
    index: &'a I,
    max_nodes: Option<usize>,
}

fn checked_heuristic(value: f64) -> Result<f64, SearchError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SearchError::InvalidHeuristic(value))
    }
}

impl<'a, G: StateGraph, I: StateIndex<G::State>> AStarSolver<'a, G, I> {
    #[must_use]
    pub fn new(graph: &'a G, index: &'a I) -> Self {
        Self {
            graph,
            index,
            max_nodes: None,
        }
    }

    /// Give up once this many nodes have been expanded.
    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    /// Search for a shortest path from `start_state` to any solved state,
    /// ordering the frontier by `g + h`. With an admissible heuristic the
    /// returned length is optimal.
    ///
    /// # Errors
    ///
    /// If the heuristic returns a negative or non-finite value, a batch
    /// evaluation returns the wrong number of values, or the index rejects a
    /// state. Running out of states or budget is reported in the
    /// outcome instead.
    pub fn solve<H: Heuristic<G::State> + ?Sized>(
        &self,
        start_state: &G::State,
        heuristic: &H,
    ) -> Result<SearchReport<G::State>, SearchError> {
        info!(start!("Searching with A*"));
        let start = Instant::now();

        let start_h = checked_heuristic(heuristic.evaluate(start_state))?;
        let mut stats = SearchStats {
            nodes_explored: 0,
            min_heuristic_seen: start_h,
            solution_length: None,
            elapsed: Duration::ZERO,
        };

        let mut insertion = 0;
        let mut queue = BinaryHeap::new();
        queue.push(QueueEntry {
            f: start_h,
            g: 0,
            insertion,
            key: self.index.key(start_state)?,
            parent: None,
        });
        let mut visited: FxHashSet<I::Key> = FxHashSet::default();
        let mut parents: FxHashMap<I::Key, Option<I::Key>> = FxHashMap::default();

        let outcome = loop {
            let Some(entry) = queue.pop() else {
                break SearchOutcome::Exhausted;
            };
            if visited.contains(&entry.key) {
                continue;
            }
            if self
                .max_nodes
                .is_some_and(|max_nodes| stats.nodes_explored >= max_nodes)
            {
                break SearchOutcome::BudgetExceeded;
            }

            visited.insert(entry.key.clone());
            parents.insert(entry.key.clone(), entry.parent);
            stats.nodes_explored += 1;
            stats.min_heuristic_seen = stats.min_heuristic_seen.min(entry.f);

            let state = self.index.state(&entry.key)?;
            if self.graph.is_done(&state) {
                let path = self.reconstruct_path(&parents, entry.key)?;
                break SearchOutcome::Solved {
                    length: entry.g,
                    path,
                };
            }

            let mut children = vec![];
            let mut child_keys = vec![];
            for child in self.graph.neighbors(&state) {
                let child_key = self.index.key(&child)?;
                if !visited.contains(&child_key) {
                    children.push(child);
                    child_keys.push(child_key);
                }
            }
            let child_hs = heuristic.evaluate_batch(&children);
            if child_hs.len() != children.len() {
                return Err(SearchError::BatchLengthMismatch {
                    expected: children.len(),
                    actual: child_hs.len(),
                });
            }
            for (child_key, child_h) in child_keys.into_iter().zip(child_hs) {
                let g = entry.g + 1;
                // Depths stay far below 2^53 so the conversion is exact.
                #[allow(clippy::cast_precision_loss)]
                let f = g as f64 + checked_heuristic(child_h)?;
                insertion += 1;
                queue.push(QueueEntry {
                    f,
                    g,
                    insertion,
                    key: child_key,
                    parent: Some(entry.key.clone()),
                });
            }

            if stats.nodes_explored % 100_000 == 0 {
                debug!(
                    working!("Explored {} nodes, {} queued"),
                    stats.nodes_explored,
                    queue.len()
                );
            }
        };

        stats.elapsed = start.elapsed();
        match &outcome {
            SearchOutcome::Solved { length, .. } => {
                stats.solution_length = Some(*length);
                info!(
                    success!("Found a solution of length {} in {:.3}s after {} nodes"),
                    length,
                    stats.elapsed.as_secs_f64(),
                    stats.nodes_explored
                );
            }
            SearchOutcome::Exhausted => info!(
                "Exhausted the state space in {:.3}s after {} nodes",
                stats.elapsed.as_secs_f64(),
                stats.nodes_explored
            ),
            SearchOutcome::BudgetExceeded => info!(
                "Gave up in {:.3}s after {} nodes",
                stats.elapsed.as_secs_f64(),
                stats.nodes_explored
            ),
        }
        Ok(SearchReport { outcome, stats })
    }

    fn reconstruct_path(
        &self,
        parents: &FxHashMap<I::Key, Option<I::Key>>,
        goal: I::Key,
    ) -> Result<Vec<G::State>, SearchError> {
        let mut path = vec![];
        let mut current = Some(goal);
        while let Some(key) = current {
            path.push(self.index.state(&key)?);
            // Every expanded key has a recorded parent.
            current = parents.get(&key).cloned().flatten();
        }
        path.reverse();
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{heuristic::ZeroHeuristic, index::IdentityIndex};

    /// A path 0 - 1 - ... - (len - 1) with the goal at the end.
    struct Line {
        len: u32,
        goal: Option<u32>,
    }

    impl StateGraph for Line {
        type State = u32;

        fn neighbors(&self, state: &u32) -> Vec<u32> {
            let mut neighbors = vec![];
            if *state > 0 {
                neighbors.push(state - 1);
            }
            if *state + 1 < self.len {
                neighbors.push(state + 1);
            }
            neighbors
        }

        fn is_done(&self, state: &u32) -> bool {
            self.goal == Some(*state)
        }
    }

    #[test]
    fn queue_pops_lowest_f_then_g() {
        let mut queue = BinaryHeap::new();
        for (f, g, insertion) in [(2.0, 1, 0), (1.0, 1, 1), (2.0, 0, 2), (1.0, 1, 3)] {
            queue.push(QueueEntry {
                f,
                g,
                insertion,
                key: insertion,
                parent: None,
            });
        }
        let order = std::iter::from_fn(|| queue.pop().map(|entry| entry.key)).collect::<Vec<_>>();
        assert_eq!(order, vec![1, 3, 2, 0]);
    }

    #[test]
    fn finds_path_on_a_line() {
        let line = Line {
            len: 10,
            goal: Some(7),
        };
        let report = AStarSolver::new(&line, &IdentityIndex)
            .solve(&2, &ZeroHeuristic)
            .unwrap();
        assert_eq!(
            report.outcome,
            SearchOutcome::Solved {
                length: 5,
                path: vec![2, 3, 4, 5, 6, 7]
            }
        );
        assert_eq!(report.stats.solution_length, Some(5));
        assert!(report.stats.min_heuristic_seen.abs() < f64::EPSILON);
    }

    #[test]
    fn start_can_be_solved() {
        let line = Line {
            len: 3,
            goal: Some(0),
        };
        let report = AStarSolver::new(&line, &IdentityIndex)
            .solve(&0, &ZeroHeuristic)
            .unwrap();
        assert_eq!(
            report.outcome,
            SearchOutcome::Solved {
                length: 0,
                path: vec![0]
            }
        );
        assert_eq!(report.stats.nodes_explored, 1);
    }

    #[test]
    fn exhausts_without_goal() {
        let line = Line { len: 6, goal: None };
        let report = AStarSolver::new(&line, &IdentityIndex)
            .solve(&3, &ZeroHeuristic)
            .unwrap();
        assert_eq!(report.outcome, SearchOutcome::Exhausted);
        assert_eq!(report.stats.nodes_explored, 6);
        assert_eq!(report.stats.solution_length, None);
    }

    #[test]
    fn respects_node_budget() {
        let line = Line {
            len: 100,
            goal: Some(99),
        };
        let report = AStarSolver::new(&line, &IdentityIndex)
            .with_max_nodes(10)
            .solve(&0, &ZeroHeuristic)
            .unwrap();
        assert_eq!(report.outcome, SearchOutcome::BudgetExceeded);
        assert_eq!(report.stats.nodes_explored, 10);
    }

    #[test]
    fn rejects_bad_heuristics() {
        let line = Line {
            len: 4,
            goal: Some(3),
        };
        let solver = AStarSolver::new(&line, &IdentityIndex);
        assert_eq!(
            solver.solve(&0, &|_: &u32| -1.0).unwrap_err(),
            SearchError::InvalidHeuristic(-1.0)
        );
        assert!(matches!(
            solver.solve(&0, &|state: &u32| if *state == 1 { f64::NAN } else { 0.0 }),
            Err(SearchError::InvalidHeuristic(value)) if value.is_nan()
        ));
    }

    #[test]
    fn min_heuristic_tracks_popped_priorities() {
        let line = Line {
            len: 10,
            goal: Some(9),
        };
        // Inadmissible on purpose: the start looks far, its neighbor close.
        let heuristic = |state: &u32| if *state == 0 { 8.0 } else { 0.5 };
        let report = AStarSolver::new(&line, &IdentityIndex)
            .solve(&0, &heuristic)
            .unwrap();
        assert!(report.is_solved());
        assert!((report.stats.min_heuristic_seen - 1.5).abs() < f64::EPSILON);
    }

    /// Scores every batch as if it were empty.
    struct ShortBatch;

    impl Heuristic<u32> for ShortBatch {
        fn evaluate(&self, _: &u32) -> f64 {
            0.0
        }

        fn evaluate_batch(&self, _: &[u32]) -> Vec<f64> {
            vec![]
        }
    }

    #[test]
    fn rejects_short_batches() {
        let line = Line {
            len: 4,
            goal: Some(3),
        };
        assert_eq!(
            AStarSolver::new(&line, &IdentityIndex)
                .solve(&0, &ShortBatch)
                .unwrap_err(),
            SearchError::BatchLengthMismatch {
                expected: 1,
                actual: 0
            }
        );
    }
}
