//! Best-first search, exhaustive distance tables and benchmarks over the
//! state graphs of `wreath_core`.

#![warn(clippy::pedantic)]

pub mod astar;
pub mod benchmark;
pub mod bfs;
pub mod heuristic;
pub mod index;

pub use astar::{AStarSolver, SearchError, SearchOutcome, SearchReport, SearchStats};
pub use bfs::DistanceTable;
pub use heuristic::{DistanceOracle, Heuristic, ValueFunction, ZeroHeuristic};
pub use index::{IdentityIndex, StateIndex};
