//! Route planner configuration

use serde::{Deserialize, Serialize};

use super::branch_bound::{BranchAndBound, DEFAULT_NODE_BUDGET, PruneBound};

/// Cover counts below this are solved exactly
pub const DEFAULT_EXACT_THRESHOLD: usize = 100;

/// Configuration for [`RoutePlanner`](super::RoutePlanner)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Use branch-and-bound below this many covers, 2-opt at or above it
    pub exact_threshold: usize,
    /// Pruning bound for branch-and-bound
    pub bound: PruneBound,
    /// Branch-and-bound search nodes before the best path so far is taken (0 = unlimited)
    pub node_budget: usize,
    /// Keep only this many nearest neighbours per cover (0 = all)
    pub max_neighbors: usize,
    /// Return to the starting cover at the end
    pub closed: bool,
    /// Seed for the 2-opt start order when the caller does not supply an RNG
    pub seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            exact_threshold: DEFAULT_EXACT_THRESHOLD,
            bound: PruneBound::Heuristic,
            node_budget: DEFAULT_NODE_BUDGET,
            max_neighbors: 0,
            closed: false,
            seed: None,
        }
    }
}

impl PlannerConfig {
    /// Branch-and-bound settings taken from this config
    pub fn branch_and_bound(&self) -> BranchAndBound {
        BranchAndBound { bound: self.bound, node_budget: self.node_budget }
    }
}
