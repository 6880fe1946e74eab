//! 2-opt local search for large instances

use rand::Rng;
use rand::seq::SliceRandom;

use super::matrix::DistanceMatrix;

/// Local-optimum path from `source` by segment reversal.
///
/// Starts from a random order with `source` moved to the front and keeps
/// reversing `path[i+1..=j]` while that strictly shortens the two affected
/// edges. The edge after `j` only counts when it exists, i.e. when `j` is not
/// the last index or the tour is `closed`. When `closed`, `source` is appended
/// to the result.
///
/// # Panics
/// Panics if `source` is not a node of a non-empty matrix.
pub fn solve_two_opt<R: Rng + ?Sized>(
    matrix: &DistanceMatrix,
    source: usize,
    closed: bool,
    rng: &mut R,
) -> Vec<usize> {
    let n = matrix.len();
    if n == 0 {
        return Vec::new();
    }
    assert!(source < n, "source {} out of range", source);

    let mut path: Vec<usize> = (0..n).collect();
    path.shuffle(rng);
    if let Some(at) = path.iter().position(|&v| v == source) {
        path.swap(0, at);
    }

    let passes = improve(matrix, &mut path, closed);
    log::debug!("2-opt over {} nodes converged after {} passes", n, passes);

    if closed {
        path.push(source);
    }
    path
}

/// Upper limit on improvement passes. Reversals on an asymmetric matrix can
/// cycle, since the reversed segment's inner edges change weight.
const MAX_PASSES: usize = 1000;

/// Apply improving segment reversals to `path` until none is left.
///
/// `path[0]` never moves. Returns the number of passes made.
pub(crate) fn improve(matrix: &DistanceMatrix, path: &mut [usize], closed: bool) -> usize {
    let n = path.len();
    let mut passes = 0;
    let mut improved = true;
    while improved {
        if passes == MAX_PASSES {
            log::warn!("2-opt over {} nodes stopped after {} passes", n, passes);
            break;
        }
        improved = false;
        passes += 1;
        for i in 0..n.saturating_sub(1) {
            for j in i + 1..n {
                let wraps = j + 1 < n || closed;
                let after = (j + 1) % n;
                let mut formed = matrix.get(path[i], path[j]);
                let mut broken = matrix.get(path[i], path[i + 1]);
                if wraps {
                    formed += matrix.get(path[i + 1], path[after]);
                    broken += matrix.get(path[j], path[after]);
                }
                if formed < broken {
                    path[i + 1..=j].reverse();
                    improved = true;
                }
            }
        }
    }
    passes
}
