//! What a search or benchmark needs from an external model. Closures of the
//! form `Fn(&S) -> f64` implement both [`Heuristic`] and [`ValueFunction`].

/// An estimate of the number of moves left to a solved state. Searches
/// reject negative or non-finite estimates.
pub trait Heuristic<S> {
    fn evaluate(&self, state: &S) -> f64;

    /// Evaluate many states at once. Models that batch on an accelerator
    /// should override this; search always calls it with every new child of
    /// an expanded node.
    fn evaluate_batch(&self, states: &[S]) -> Vec<f64> {
        states.iter().map(|state| self.evaluate(state)).collect()
    }
}

impl<S, F: Fn(&S) -> f64> Heuristic<S> for F {
    fn evaluate(&self, state: &S) -> f64 {
        self(state)
    }
}

/// The heuristic that knows nothing. A* with it is uniform cost search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl<S> Heuristic<S> for ZeroHeuristic {
    fn evaluate(&self, _state: &S) -> f64 {
        0.0
    }

    fn evaluate_batch(&self, states: &[S]) -> Vec<f64> {
        vec![0.0; states.len()]
    }
}

/// A learned score for a state, lower meaning closer to solved.
pub trait ValueFunction<S> {
    fn value(&self, state: &S) -> f64;

    fn values(&self, states: &[S]) -> Vec<f64> {
        states.iter().map(|state| self.value(state)).collect()
    }
}

impl<S, F: Fn(&S) -> f64> ValueFunction<S> for F {
    fn value(&self, state: &S) -> f64 {
        self(state)
    }
}

/// Exact distances to the nearest solved state. `None` for states the
/// oracle does not know.
pub trait DistanceOracle<S> {
    fn distance(&self, state: &S) -> Option<u32>;
}
