//! Visiting order over a decomposition

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::PlannerConfig;
use super::matrix::{DistanceFn, DistanceMatrix, center_distance, distance_to_point};
use super::two_opt::solve_two_opt;
use crate::core::types::Position;
use crate::decompose::Cover;
use crate::math::Qube;

/// Orders covers into a short path under a travel-cost function.
///
/// `D` defaults to a plain function pointer; closures that capture state
/// (a tilemap, a cost table) plug in through [`with_distance`](Self::with_distance).
#[derive(Clone, Debug)]
pub struct RoutePlanner<D = DistanceFn> {
    pub config: PlannerConfig,
    pub distance: D,
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl RoutePlanner {
    /// Planner measuring Euclidean distance between cover centers
    pub fn new(config: PlannerConfig) -> Self {
        Self { config, distance: center_distance }
    }

    /// Index of the qube whose center is nearest `start` (first on ties, 0 without a start)
    pub fn start_index(qubes: &[Qube], start: Option<Position>) -> usize {
        let Some(start) = start else {
            return 0;
        };
        let mut best = 0;
        let mut best_distance = f32::INFINITY;
        for (i, qube) in qubes.iter().enumerate() {
            let d = distance_to_point(qube, start);
            if d < best_distance {
                best = i;
                best_distance = d;
            }
        }
        best
    }
}

impl<D: Fn(&Qube, &Qube) -> f32> RoutePlanner<D> {
    /// Replace the travel-cost function
    pub fn with_distance<E: Fn(&Qube, &Qube) -> f32>(self, distance: E) -> RoutePlanner<E> {
        RoutePlanner { config: self.config, distance }
    }

    /// Cost matrix with the neighbour cap applied
    pub fn matrix(&self, qubes: &[Qube]) -> DistanceMatrix {
        let mut matrix = DistanceMatrix::from_qubes(qubes, &self.distance);
        matrix.limit_neighbors(self.config.max_neighbors);
        matrix
    }

    /// Visiting order as indices into `qubes`, always a permutation of `0..len`
    pub fn plan_qubes<R: Rng + ?Sized>(
        &self,
        qubes: &[Qube],
        start: Option<Position>,
        rng: &mut R,
    ) -> Vec<usize> {
        let n = qubes.len();
        if n <= 1 {
            return (0..n).collect();
        }
        let source = RoutePlanner::start_index(qubes, start);
        if n == 2 {
            return vec![source, 1 - source];
        }

        let matrix = self.matrix(qubes);
        let mut route = if n < self.config.exact_threshold {
            self.config.branch_and_bound().solve(&matrix, source, self.config.closed)
        } else {
            solve_two_opt(&matrix, source, self.config.closed, rng)
        };
        route.truncate(n);

        log::debug!(
            "Planned {} covers from {}: length {:.2}{}",
            n,
            source,
            matrix.route_length(&route, self.config.closed),
            if self.config.closed { " (closed)" } else { "" }
        );
        route
    }

    /// Visiting order as indices into `covers`
    pub fn plan_indices<T, R: Rng + ?Sized>(
        &self,
        covers: &[Cover<T>],
        start: Option<Position>,
        rng: &mut R,
    ) -> Vec<usize> {
        let qubes: Vec<Qube> = covers.iter().map(|c| c.qube).collect();
        self.plan_qubes(&qubes, start, rng)
    }

    /// Covers reordered into visiting order
    pub fn plan<T: Clone, R: Rng + ?Sized>(
        &self,
        covers: &[Cover<T>],
        start: Option<Position>,
        rng: &mut R,
    ) -> Vec<Cover<T>> {
        self.plan_indices(covers, start, rng)
            .into_iter()
            .map(|i| covers[i].clone())
            .collect()
    }

    /// [`plan`](Self::plan) with an RNG built from `config.seed`, or from the OS when unset
    pub fn plan_seeded<T: Clone>(
        &self,
        covers: &[Cover<T>],
        start: Option<Position>,
    ) -> Vec<Cover<T>> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.plan(covers, start, &mut rng)
    }
}
