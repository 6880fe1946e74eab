//! Route planning over covers.
//!
//! Small inputs go to a budgeted branch-and-bound search; large ones fall back
//! to a 2-opt local search. Distances are measured between cover centers unless
//! the planner is given another cost function.

pub mod branch_bound;
pub mod config;
pub mod matrix;
pub mod planner;
pub mod two_opt;

pub use branch_bound::{BranchAndBound, DEFAULT_NODE_BUDGET, PruneBound, solve_branch_and_bound};
pub use config::{DEFAULT_EXACT_THRESHOLD, PlannerConfig};
pub use matrix::{DistanceFn, DistanceMatrix, center_distance, center_manhattan};
pub use planner::RoutePlanner;
pub use two_opt::solve_two_opt;

/// Total weight along `route`, including the closing edge when `closed`
pub fn route_length(matrix: &DistanceMatrix, route: &[usize], closed: bool) -> f32 {
    matrix.route_length(route, closed)
}
