//! Hamiltonian path search by branch-and-bound
//!
//! Depth-first search over paths starting at a fixed source, seeded with a
//! nearest-neighbour walk tidied by 2-opt. Two pruning bounds are available:
//!
//! - [`PruneBound::Heuristic`] starts from half the sum of every row's two
//!   cheapest edges and lowers it by half an edge pair on each step. It is
//!   fast but not admissible, so the result can miss the optimum.
//! - [`PruneBound::Admissible`] takes the larger of a degree bound and a
//!   minimum spanning tree over the unvisited vertices. Pruning never drops a
//!   better path, so with no node budget the result is optimal.
//!
//! A node budget caps the number of expanded search nodes. When it runs out
//! the best path found so far is returned.

use serde::{Deserialize, Serialize};

use super::matrix::DistanceMatrix;
use super::two_opt;

/// Search nodes expanded before branch-and-bound settles for its incumbent
pub const DEFAULT_NODE_BUDGET: usize = 50_000;

/// Lower bound used to prune partial paths
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PruneBound {
    /// Running half-sum of each row's two cheapest edges
    #[default]
    Heuristic,
    /// Degree and spanning-tree bounds on symmetrised weights
    Admissible,
}

/// Cheapest and second-cheapest finite edge per vertex.
///
/// With `symmetric` set, weights are `min(a[u][v], a[v][u])`; otherwise row
/// `u` is read as is. Missing edges count as zero.
fn cheapest_pairs(matrix: &DistanceMatrix, symmetric: bool) -> (Vec<f64>, Vec<f64>) {
    let n = matrix.len();
    let mut first = vec![0.0; n];
    let mut second = vec![0.0; n];
    for u in 0..n {
        let mut lo = f64::INFINITY;
        let mut hi = f64::INFINITY;
        for v in (0..n).filter(|&v| v != u) {
            let w = if symmetric {
                matrix.get(u, v).min(matrix.get(v, u))
            } else {
                matrix.get(u, v)
            };
            if !w.is_finite() {
                continue;
            }
            let w = w as f64;
            if w < lo {
                hi = lo;
                lo = w;
            } else if w < hi {
                hi = w;
            }
        }
        first[u] = if lo.is_finite() { lo } else { 0.0 };
        second[u] = if hi.is_finite() { hi } else { 0.0 };
    }
    (first, second)
}

/// Branch-and-bound settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchAndBound {
    pub bound: PruneBound,
    /// Maximum expanded search nodes (0 = unlimited)
    pub node_budget: usize,
}

impl Default for BranchAndBound {
    fn default() -> Self {
        Self { bound: PruneBound::Heuristic, node_budget: DEFAULT_NODE_BUDGET }
    }
}

impl BranchAndBound {
    /// Short Hamiltonian path starting at `source`.
    ///
    /// Only edges with a finite weight are followed. When `closed` is set the
    /// return edge counts toward the path weight and `source` is appended to
    /// the result. If no complete path exists the result is `source` followed
    /// by the remaining nodes in index order.
    ///
    /// # Panics
    /// Panics if `source` is not a node of a non-empty matrix.
    pub fn solve(&self, matrix: &DistanceMatrix, source: usize, closed: bool) -> Vec<usize> {
        if matrix.is_empty() {
            return Vec::new();
        }
        assert!(source < matrix.len(), "source {} out of range", source);
        if matrix.len() == 1 {
            return if closed { vec![source, source] } else { vec![source] };
        }

        let mut route = Search::new(self, matrix, source, closed).run().unwrap_or_else(|| {
            log::warn!(
                "No complete path over {} nodes from {}; using index order",
                matrix.len(),
                source
            );
            std::iter::once(source)
                .chain((0..matrix.len()).filter(|&v| v != source))
                .collect()
        });
        if closed {
            route.push(source);
        }
        route
    }
}

/// [`BranchAndBound::solve`] with the default bound and node budget
pub fn solve_branch_and_bound(matrix: &DistanceMatrix, source: usize, closed: bool) -> Vec<usize> {
    BranchAndBound::default().solve(matrix, source, closed)
}

struct Search<'a> {
    matrix: &'a DistanceMatrix,
    source: usize,
    closed: bool,
    bound: PruneBound,
    node_budget: usize,
    nodes: usize,
    first: Vec<f64>,
    second: Vec<f64>,
    // Admissible bound only
    symmetric: Vec<f64>,
    max_second: f64,
    open: Vec<usize>,
    keys: Vec<f64>,
    path: Vec<usize>,
    visited: Vec<bool>,
    best: Option<Vec<usize>>,
    best_weight: f64,
}

impl<'a> Search<'a> {
    fn new(
        options: &BranchAndBound,
        matrix: &'a DistanceMatrix,
        source: usize,
        closed: bool,
    ) -> Self {
        let n = matrix.len();
        let admissible = options.bound == PruneBound::Admissible;
        let (first, second) = cheapest_pairs(matrix, admissible);
        let mut symmetric = Vec::new();
        let mut max_second = 0.0;
        if admissible {
            max_second = second.iter().copied().fold(0.0, f64::max);
            symmetric.reserve(n * n);
            for u in 0..n {
                for v in 0..n {
                    symmetric.push(matrix.get(u, v).min(matrix.get(v, u)) as f64);
                }
            }
        }
        Self {
            matrix,
            source,
            closed,
            bound: options.bound,
            node_budget: options.node_budget,
            nodes: 0,
            first,
            second,
            symmetric,
            max_second,
            open: Vec::with_capacity(n),
            keys: Vec::with_capacity(n),
            path: Vec::with_capacity(n + 1),
            visited: vec![false; n],
            best: None,
            best_weight: f64::INFINITY,
        }
    }

    fn edge(&self, from: usize, to: usize) -> f64 {
        self.matrix.get(from, to) as f64
    }

    fn exhausted(&self) -> bool {
        self.node_budget != 0 && self.nodes >= self.node_budget
    }

    /// Bound state before the first step
    fn initial(&self) -> f64 {
        match self.bound {
            PruneBound::Heuristic => {
                let sum: f64 = self.first.iter().zip(&self.second).map(|(f, s)| f + s).sum();
                (0.5 * sum).ceil()
            }
            PruneBound::Admissible => (0..self.matrix.len())
                .filter(|&v| v != self.source)
                .map(|v| self.first[v] + self.second[v])
                .sum(),
        }
    }

    /// Bound state after stepping from `end` to `next`
    fn step(&self, end: usize, next: usize, state: f64) -> f64 {
        match self.bound {
            PruneBound::Heuristic => {
                let leaving = if self.path.len() == 1 { self.first[end] } else { self.second[end] };
                state - 0.5 * (self.first[next] + leaving)
            }
            PruneBound::Admissible => state - (self.first[next] + self.second[next]),
        }
    }

    /// Estimated cost of finishing a path that ends at `end`, which must
    /// already be marked visited
    fn estimate(&mut self, end: usize, state: f64) -> f64 {
        match self.bound {
            PruneBound::Heuristic => state,
            PruneBound::Admissible => self.degree_bound(end, state).max(self.spanning_bound(end)),
        }
    }

    /// Half the degree sum over the vertices the rest of the path must touch
    fn degree_bound(&self, end: usize, remaining: f64) -> f64 {
        let mut bound = 0.5 * (self.first[end] + remaining - self.max_second);
        if self.closed {
            bound += 0.5 * self.first[self.source];
        }
        bound.max(0.0)
    }

    /// Minimum spanning tree over `end`, the unvisited vertices and, when
    /// closed, the source. `+∞` if they are not connected.
    fn spanning_bound(&mut self, end: usize) -> f64 {
        let n = self.matrix.len();
        self.open.clear();
        self.keys.clear();
        for v in 0..n {
            if !self.visited[v] || (self.closed && v == self.source) {
                self.open.push(v);
                self.keys.push(self.symmetric[end * n + v]);
            }
        }

        let mut total = 0.0;
        while !self.open.is_empty() {
            let mut at = 0;
            for i in 1..self.keys.len() {
                if self.keys[i] < self.keys[at] {
                    at = i;
                }
            }
            let key = self.keys.swap_remove(at);
            let u = self.open.swap_remove(at);
            if !key.is_finite() {
                return f64::INFINITY;
            }
            total += key;
            for (v, k) in self.open.iter().zip(self.keys.iter_mut()) {
                *k = k.min(self.symmetric[u * n + v]);
            }
        }
        total
    }

    fn path_weight(&self, path: &[usize]) -> f64 {
        path.windows(2).map(|w| self.edge(w[0], w[1])).sum()
    }

    fn record(&mut self, weight: f64) {
        let end = self.path[self.path.len() - 1];
        let total = if self.closed {
            weight + self.edge(end, self.source)
        } else {
            weight
        };
        if total < self.best_weight {
            log::trace!("New incumbent {:.3} for {:?}", total, self.path);
            self.best_weight = total;
            self.best = Some(self.path.clone());
        }
    }

    /// Walk to the nearest unvisited neighbour until stuck. A complete walk
    /// and its 2-opt refinement both seed the incumbent.
    fn seed_nearest(&mut self) {
        let n = self.matrix.len();
        let mut path = vec![self.source];
        let mut used = vec![false; n];
        used[self.source] = true;
        while path.len() < n {
            let end = path[path.len() - 1];
            let next = (0..n)
                .filter(|&v| !used[v] && self.matrix.get(end, v).is_finite())
                .min_by(|&a, &b| self.matrix.get(end, a).total_cmp(&self.matrix.get(end, b)));
            let Some(next) = next else {
                return;
            };
            used[next] = true;
            path.push(next);
        }

        let mut refined = path.clone();
        two_opt::improve(self.matrix, &mut refined, self.closed);
        for candidate in [path, refined] {
            let weight = self.path_weight(&candidate);
            self.path = candidate;
            self.record(weight);
        }
        self.path.clear();
    }

    fn extend(&mut self, weight: f64, state: f64) {
        let n = self.matrix.len();
        if self.path.len() == n {
            self.record(weight);
            return;
        }
        if self.exhausted() {
            return;
        }
        self.nodes += 1;

        let end = self.path[self.path.len() - 1];
        let mut candidates: Vec<usize> = (0..n)
            .filter(|&v| !self.visited[v] && self.matrix.get(end, v).is_finite())
            .collect();
        candidates.sort_by(|&a, &b| self.matrix.get(end, a).total_cmp(&self.matrix.get(end, b)));

        for next in candidates {
            let weight = weight + self.edge(end, next);
            let state = self.step(end, next, state);
            self.visited[next] = true;
            if weight + self.estimate(next, state) < self.best_weight {
                self.path.push(next);
                self.extend(weight, state);
                self.path.pop();
            }
            self.visited[next] = false;
            if self.exhausted() {
                break;
            }
        }
    }

    fn run(mut self) -> Option<Vec<usize>> {
        self.seed_nearest();

        let state = self.initial();
        self.path.push(self.source);
        self.visited[self.source] = true;
        self.extend(0.0, state);

        if self.exhausted() {
            log::debug!(
                "Branch-and-bound over {} nodes stopped at the {} node budget",
                self.matrix.len(),
                self.node_budget
            );
        }
        log::debug!(
            "Branch-and-bound over {} nodes: best weight {:.3} after {} expansions",
            self.matrix.len(),
            self.best_weight,
            self.nodes
        );
        self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use std::time::{Duration, Instant};

    const INF: f32 = f32::INFINITY;

    fn random_points(rng: &mut StdRng, n: usize) -> DistanceMatrix {
        let points: Vec<(f32, f32)> = (0..n)
            .map(|_| (rng.random_range(0.0..50.0), rng.random_range(0.0..50.0)))
            .collect();
        let rows: Vec<Vec<f32>> = points
            .iter()
            .map(|a| {
                points
                    .iter()
                    .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
                    .collect()
            })
            .collect();
        DistanceMatrix::from_rows(&rows)
    }

    fn permutations(items: Vec<usize>) -> Vec<Vec<usize>> {
        if items.len() <= 1 {
            return vec![items];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.clone();
            let head = rest.remove(i);
            for mut tail in permutations(rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    fn brute_force(matrix: &DistanceMatrix, source: usize, closed: bool) -> f32 {
        let others: Vec<usize> = (0..matrix.len()).filter(|&v| v != source).collect();
        permutations(others)
            .into_iter()
            .map(|mut tail| {
                tail.insert(0, source);
                matrix.route_length(&tail, closed)
            })
            .fold(f32::INFINITY, f32::min)
    }

    fn is_permutation(route: &[usize], n: usize) -> bool {
        let mut sorted = route.to_vec();
        sorted.sort_unstable();
        sorted == (0..n).collect::<Vec<_>>()
    }

    #[test]
    fn test_three_node_path() {
        let m = DistanceMatrix::from_rows(&[
            vec![INF, 9.0, 0.0],
            vec![2.0, INF, 9.0],
            vec![9.0, 1.0, INF],
        ]);
        assert_eq!(solve_branch_and_bound(&m, 2, false), vec![2, 1, 0]);
        assert_eq!(EXACT.solve(&m, 2, false), vec![2, 1, 0]);
    }

    #[test]
    fn test_collinear_points() {
        // Points at 0, 10 and 1 on a line, starting at 0
        let m = DistanceMatrix::from_rows(&[
            vec![INF, 10.0, 1.0],
            vec![10.0, INF, 9.0],
            vec![1.0, 9.0, INF],
        ]);
        assert_eq!(solve_branch_and_bound(&m, 0, false), vec![0, 2, 1]);
        assert_eq!(EXACT.solve(&m, 0, false), vec![0, 2, 1]);
    }

    const EXACT: BranchAndBound = BranchAndBound { bound: PruneBound::Admissible, node_budget: 0 };

    fn nearest_walk(matrix: &DistanceMatrix, source: usize) -> Vec<usize> {
        let n = matrix.len();
        let mut path = vec![source];
        while path.len() < n {
            let end = path[path.len() - 1];
            let next = (0..n)
                .filter(|v| !path.contains(v))
                .min_by(|&a, &b| matrix.get(end, a).total_cmp(&matrix.get(end, b)))
                .unwrap();
            path.push(next);
        }
        path
    }

    #[test]
    fn test_admissible_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(11);
        for n in 2..=6 {
            for _ in 0..5 {
                let m = random_points(&mut rng, n);
                let source = rng.random_range(0..n);
                for closed in [false, true] {
                    let route = EXACT.solve(&m, source, closed);
                    let (open, tail) = if closed {
                        (&route[..n], Some(route[n]))
                    } else {
                        (&route[..], None)
                    };
                    assert!(is_permutation(open, n));
                    assert_eq!(open[0], source);
                    if closed {
                        assert_eq!(tail, Some(source));
                    }
                    let best = brute_force(&m, source, closed);
                    assert!((m.route_length(open, closed) - best).abs() < 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_admissible_not_worse_than_random_orders() {
        let mut rng = StdRng::seed_from_u64(5);
        let m = random_points(&mut rng, 10);
        let route = EXACT.solve(&m, 0, false);
        let length = m.route_length(&route, false);

        let mut sample: Vec<usize> = (1..10).collect();
        for _ in 0..500 {
            sample.shuffle(&mut rng);
            let mut candidate = vec![0];
            candidate.extend_from_slice(&sample);
            assert!(length <= m.route_length(&candidate, false) + 1e-3);
        }
    }

    #[test]
    fn test_heuristic_not_worse_than_nearest_walk() {
        let mut rng = StdRng::seed_from_u64(17);
        for n in [5, 12, 30] {
            let m = random_points(&mut rng, n);
            let source = rng.random_range(0..n);
            let route = solve_branch_and_bound(&m, source, false);
            assert!(is_permutation(&route, n));
            assert_eq!(route[0], source);
            let walk = nearest_walk(&m, source);
            assert!(m.route_length(&route, false) <= m.route_length(&walk, false) + 1e-3);
        }
    }

    #[test]
    fn test_heuristic_bound_values() {
        let m = DistanceMatrix::from_rows(&[
            vec![INF, 9.0, 0.0],
            vec![2.0, INF, 9.0],
            vec![9.0, 1.0, INF],
        ]);
        let search = Search::new(&BranchAndBound::default(), &m, 2, false);
        // Rows give (0, 9), (2, 9) and (1, 9): ceil(30 / 2)
        assert_eq!(search.initial(), 15.0);
    }

    #[test]
    fn test_node_budget_still_returns_a_path() {
        let mut rng = StdRng::seed_from_u64(23);
        let m = random_points(&mut rng, 40);
        for bound in [PruneBound::Heuristic, PruneBound::Admissible] {
            let route = BranchAndBound { bound, node_budget: 1 }.solve(&m, 3, true);
            assert_eq!(route.len(), 41);
            assert!(is_permutation(&route[..40], 40));
            assert_eq!(route[0], 3);
            assert_eq!(route[40], 3);
        }
    }

    #[test]
    fn test_default_finishes_on_larger_inputs() {
        let mut rng = StdRng::seed_from_u64(29);
        for n in [60, 99] {
            let m = random_points(&mut rng, n);
            let started = Instant::now();
            let route = solve_branch_and_bound(&m, 0, false);
            assert!(started.elapsed() < Duration::from_secs(20));
            assert!(is_permutation(&route, n));
        }
    }

    #[test]
    fn test_bound_names() {
        assert_eq!(serde_json::to_string(&PruneBound::Admissible).unwrap(), "\"admissible\"");
        let options: BranchAndBound = serde_json::from_str(r#"{"bound": "heuristic"}"#).unwrap();
        assert_eq!(options, BranchAndBound::default());
    }

    #[test]
    fn test_zero_weight_edges_followed() {
        let m = DistanceMatrix::from_rows(&[
            vec![INF, 0.0, 5.0],
            vec![0.0, INF, 0.0],
            vec![5.0, 0.0, INF],
        ]);
        assert_eq!(solve_branch_and_bound(&m, 0, false), vec![0, 1, 2]);
    }

    #[test]
    fn test_disconnected_falls_back_to_index_order() {
        let m = DistanceMatrix::from_rows(&[
            vec![INF, 1.0, INF, INF],
            vec![1.0, INF, INF, INF],
            vec![INF, INF, INF, 1.0],
            vec![INF, INF, 1.0, INF],
        ]);
        assert_eq!(solve_branch_and_bound(&m, 2, false), vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_single_node() {
        let m = DistanceMatrix::from_rows(&[vec![0.0]]);
        assert_eq!(solve_branch_and_bound(&m, 0, false), vec![0]);
        assert_eq!(solve_branch_and_bound(&m, 0, true), vec![0, 0]);
        assert!(solve_branch_and_bound(&DistanceMatrix::from_rows(&[]), 0, false).is_empty());
    }
}
