//! Pairwise travel-cost matrix

use crate::core::types::Position;
use crate::math::Qube;

/// Plain travel-cost function. Any `Fn(&Qube, &Qube) -> f32` works where a
/// cost is taken, including closures that capture map state.
pub type DistanceFn = fn(&Qube, &Qube) -> f32;

/// Euclidean distance between qube centers
pub fn center_distance(p: &Qube, q: &Qube) -> f32 {
    p.center().distance(q.center())
}

/// Manhattan distance between qube centers
pub fn center_manhattan(p: &Qube, q: &Qube) -> f32 {
    let d = (p.center() - q.center()).abs();
    d.x + d.y + d.z
}

/// Euclidean distance from a qube center to an arbitrary cell
pub fn distance_to_point(q: &Qube, pos: Position) -> f32 {
    q.center().distance(pos.as_vec3())
}

/// Square matrix of directed edge weights.
///
/// `+∞` marks a missing edge; the diagonal is always `+∞` so no route can
/// stay at a node.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    len: usize,
    weights: Vec<f32>,
}

impl DistanceMatrix {
    /// Build from explicit rows. The diagonal is forced to `+∞`.
    ///
    /// # Panics
    /// Panics if the rows do not form a square matrix.
    pub fn from_rows(rows: &[Vec<f32>]) -> Self {
        let len = rows.len();
        let mut weights = Vec::with_capacity(len * len);
        for row in rows {
            assert_eq!(row.len(), len, "distance matrix must be square");
            weights.extend_from_slice(row);
        }
        let mut matrix = Self { len, weights };
        matrix.clear_diagonal();
        matrix
    }

    /// Pairwise costs between qubes
    pub fn from_qubes(qubes: &[Qube], distance: impl Fn(&Qube, &Qube) -> f32) -> Self {
        let len = qubes.len();
        let mut weights = Vec::with_capacity(len * len);
        for p in qubes {
            for q in qubes {
                weights.push(distance(p, q));
            }
        }
        let mut matrix = Self { len, weights };
        matrix.clear_diagonal();
        matrix
    }

    fn clear_diagonal(&mut self) {
        for i in 0..self.len {
            self.weights[i * self.len + i] = f32::INFINITY;
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Weight of the edge `from -> to`
    pub fn get(&self, from: usize, to: usize) -> f32 {
        self.weights[from * self.len + to]
    }

    /// Outgoing weights of `from`
    pub fn row(&self, from: usize) -> &[f32] {
        &self.weights[from * self.len..(from + 1) * self.len]
    }

    /// Keep only the `k` cheapest outgoing edges of every node; `k == 0` keeps all.
    ///
    /// Masking is per row, so the result may be asymmetric.
    pub fn limit_neighbors(&mut self, k: usize) {
        if k == 0 || k >= self.len {
            return;
        }
        let mut order: Vec<usize> = Vec::with_capacity(self.len);
        for i in 0..self.len {
            order.clear();
            order.extend(0..self.len);
            let row = &self.weights[i * self.len..(i + 1) * self.len];
            order.sort_by(|&a, &b| row[a].total_cmp(&row[b]));
            for &j in &order[k..] {
                self.weights[i * self.len + j] = f32::INFINITY;
            }
        }
    }

    /// Total weight along `route`, including the closing edge when `closed`
    pub fn route_length(&self, route: &[usize], closed: bool) -> f32 {
        let mut total: f32 = route.windows(2).map(|w| self.get(w[0], w[1])).sum();
        if closed && route.len() > 1 {
            total += self.get(route[route.len() - 1], route[0]);
        }
        total
    }
}
