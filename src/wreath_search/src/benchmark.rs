//! Measurements of how well an external model guides search.

use crate::{
    astar::{AStarSolver, SearchError, SearchOutcome},
    heuristic::{DistanceOracle, Heuristic, ValueFunction},
    index::IdentityIndex,
};
use itertools::Itertools;
use log::{debug, info};
use wreath_core::{PuzzleState, StateGraph, Traversal, start, success, working};

/// Follow the neighbor with the lowest value for up to `max_steps` moves.
/// Succeeds as soon as the current state or any of its neighbors is solved.
pub fn greedy_rollout<G: StateGraph, V: ValueFunction<G::State> + ?Sized>(
    graph: &G,
    value: &V,
    state: &G::State,
    max_steps: usize,
) -> bool {
    if graph.is_done(state) {
        return true;
    }
    let mut state = state.clone();
    for _ in 0..max_steps {
        let mut neighbors = graph.neighbors(&state);
        if neighbors.iter().any(|neighbor| graph.is_done(neighbor)) {
            return true;
        }
        let Some(best) = value
            .values(&neighbors)
            .into_iter()
            .position_min_by(f64::total_cmp)
        else {
            return false;
        };
        state = neighbors.swap_remove(best);
    }
    false
}

/// Whether the neighbor `value` ranks best is one of the neighbors closest
/// to solved according to `oracle`. Ties in `value` go to the earliest
/// neighbor. Neighbors unknown to the oracle are never optimal.
pub fn picks_optimal_neighbor<G, O, V>(graph: &G, oracle: &O, value: &V, state: &G::State) -> bool
where
    G: StateGraph,
    O: DistanceOracle<G::State> + ?Sized,
    V: ValueFunction<G::State> + ?Sized,
{
    let neighbors = graph.neighbors(state);
    let distances = neighbors
        .iter()
        .map(|neighbor| oracle.distance(neighbor))
        .collect_vec();
    let Some(optimal) = distances.iter().flatten().min() else {
        return false;
    };
    value
        .values(&neighbors)
        .into_iter()
        .position_min_by(f64::total_cmp)
        .is_some_and(|best| distances.get(best) == Some(&Some(*optimal)))
}

/// The fraction of `states` for which [`picks_optimal_neighbor`] holds, or
/// `None` if `states` is empty.
pub fn optimal_neighbor_rate<G, O, V>(
    graph: &G,
    oracle: &O,
    value: &V,
    states: &[G::State],
) -> Option<f64>
where
    G: StateGraph,
    O: DistanceOracle<G::State> + ?Sized,
    V: ValueFunction<G::State> + ?Sized,
{
    if states.is_empty() {
        return None;
    }
    let correct = states
        .iter()
        .filter(|state| picks_optimal_neighbor(graph, oracle, value, state))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let rate = correct as f64 / states.len() as f64;
    Some(rate)
}

/// [`optimal_neighbor_rate`] broken down by the oracle's distance of each
/// state. Entry `d` is the rate over the states at distance `d`, or `None`
/// if there are none. States unknown to the oracle are left out.
pub fn optimal_neighbor_rate_by_distance<G, O, V>(
    graph: &G,
    oracle: &O,
    value: &V,
    states: &[G::State],
) -> Vec<Option<f64>>
where
    G: StateGraph,
    O: DistanceOracle<G::State> + ?Sized,
    V: ValueFunction<G::State> + ?Sized,
{
    let mut tallies: Vec<(usize, usize)> = vec![];
    for state in states {
        let Some(distance) = oracle.distance(state) else {
            continue;
        };
        let distance = distance as usize;
        if tallies.len() <= distance {
            tallies.resize(distance + 1, (0, 0));
        }
        let (correct, total) = &mut tallies[distance];
        *correct += usize::from(picks_optimal_neighbor(graph, oracle, value, state));
        *total += 1;
    }
    tallies
        .into_iter()
        .map(|(correct, total)| {
            #[allow(clippy::cast_precision_loss)]
            let rate = (total > 0).then(|| correct as f64 / total as f64);
            rate
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BenchmarkResult {
    pub trials: usize,
    pub solved: usize,
    pub solution_lengths: Vec<usize>,
}

/// Run budgeted A* from `trials` random scrambles. Each scramble is
/// `scramble_length` moves long, plus one more with probability one half so
/// that both parities of the move count are covered.
///
/// # Errors
///
/// If the heuristic returns a negative or non-finite value.
pub fn astar_benchmark<H: Heuristic<PuzzleState> + ?Sized>(
    traversal: &mut Traversal<'_>,
    heuristic: &H,
    trials: usize,
    max_nodes: usize,
    scramble_length: usize,
) -> Result<BenchmarkResult, SearchError> {
    info!(start!("Benchmarking A* on {} scrambles"), trials);
    let puzzle_def = traversal.puzzle_def();
    let solver = AStarSolver::new(puzzle_def, &IdentityIndex).with_max_nodes(max_nodes);

    let mut result = BenchmarkResult {
        trials,
        ..BenchmarkResult::default()
    };
    for trial in 0..trials {
        let length = scramble_length + usize::from(traversal.rng().bool());
        let scrambled = traversal.random_state(length);
        let report = solver.solve(&scrambled, heuristic)?;
        debug!(
            working!("Trial {} of {}: {:?} after {} nodes"),
            trial + 1,
            trials,
            report.stats.solution_length,
            report.stats.nodes_explored
        );
        if let SearchOutcome::Solved { length, .. } = report.outcome {
            result.solved += 1;
            result.solution_lengths.push(length);
        }
    }
    info!(
        success!("Solved {} of {} scrambles"),
        result.solved, result.trials
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bfs::DistanceTable;
    use wreath_core::{PermutationIndex, SlidingTile, TileState};

    fn eight_puzzle() -> (SlidingTile, PermutationIndex) {
        let eight = SlidingTile::new(3).unwrap();
        let index = PermutationIndex::new(eight.cell_count()).unwrap();
        (eight, index)
    }

    #[test]
    fn exact_distances_roll_out_and_pick_optimally() {
        let (eight, index) = eight_puzzle();
        let table = DistanceTable::from_solved(&eight, &index, [eight.solved_state()]).unwrap();
        let exact = |state: &TileState| f64::from(table.distance(state).unwrap());

        let mut rng = fastrand::Rng::with_seed(8);
        let states = (0..20).map(|_| eight.scramble(40, &mut rng)).collect_vec();
        for state in &states {
            let distance = table.distance(state).unwrap() as usize;
            assert!(greedy_rollout(&eight, &exact, state, distance));
            if distance > 0 {
                assert!(picks_optimal_neighbor(&eight, &table, &exact, state));
            }
        }
        let unsolved = states
            .into_iter()
            .filter(|state| !eight.is_done(state))
            .collect_vec();
        assert_eq!(
            optimal_neighbor_rate(&eight, &table, &exact, &unsolved),
            Some(1.0)
        );
        assert_eq!(optimal_neighbor_rate(&eight, &table, &exact, &[]), None);
    }

    #[test]
    fn pessimal_value_fails() {
        let (eight, index) = eight_puzzle();
        let table = DistanceTable::from_solved(&eight, &index, [eight.solved_state()]).unwrap();
        let worst = |state: &TileState| -f64::from(table.distance(state).unwrap());

        let far = eight
            .state_from_tiles(&[8, 6, 7, 2, 5, 4, 3, 9, 1])
            .unwrap();
        assert_eq!(table.distance(&far), Some(31));
        let near = eight
            .state_from_tiles(&[1, 2, 3, 4, 5, 6, 7, 9, 8])
            .unwrap();
        assert!(!picks_optimal_neighbor(&eight, &table, &worst, &near));
        assert!(picks_optimal_neighbor(&eight, &table, &worst, &far));
        assert!(!greedy_rollout(&eight, &worst, &far, 50));
        assert!(greedy_rollout(&eight, &worst, &eight.solved_state(), 0));
    }

    #[test]
    fn rates_by_distance() {
        let (eight, index) = eight_puzzle();
        let table = DistanceTable::from_solved(&eight, &index, [eight.solved_state()]).unwrap();
        let exact = |state: &TileState| f64::from(table.distance(state).unwrap());
        let worst = |state: &TileState| -exact(state);

        let mut rng = fastrand::Rng::with_seed(5);
        let mut states = table.sample_states::<TileState>(1, 4, &mut rng).unwrap();
        states.extend(table.sample_states::<TileState>(4, 4, &mut rng).unwrap());

        assert_eq!(
            optimal_neighbor_rate_by_distance(&eight, &table, &exact, &states),
            vec![None, Some(1.0), None, None, Some(1.0)]
        );
        // One slide from solved the other neighbors are two slides away.
        assert_eq!(
            optimal_neighbor_rate_by_distance(&eight, &table, &worst, &states)[1],
            Some(0.0)
        );
        assert!(optimal_neighbor_rate_by_distance(&eight, &table, &exact, &[]).is_empty());
    }
}
