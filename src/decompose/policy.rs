//! Axis-order strategies that shape the covers the decomposer grows

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;


/// Grid axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index into a position
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two remaining axes, in cyclic order
    pub fn others(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::Z, Axis::X],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }
}

/// Decides in which order a cover tries to grow along the axes.
///
/// The decomposer asks for a fresh order at the start of every growth round.
/// After each axis, if the round has grown anything and [`ends_round`] returns
/// true, the round restarts with a new order. Any policy produces a valid
/// decomposition; policies only change the shapes of the covers.
///
/// [`ends_round`]: GrowthPolicy::ends_round
pub trait GrowthPolicy {
    /// Axis order for the next growth round
    fn axis_order(&mut self) -> [Axis; 3];

    /// Whether a round that has grown should restart after visiting `axis`
    fn ends_round(&self, _axis: Axis, _order: &[Axis; 3]) -> bool {
        false
    }

    /// Block lateral growth into cells with a same-valued cell directly above or below
    fn vertical_bias(&self) -> bool {
        false
    }
}

impl<P: GrowthPolicy + ?Sized> GrowthPolicy for Box<P> {
    fn axis_order(&mut self) -> [Axis; 3] {
        (**self).axis_order()
    }

    fn ends_round(&self, axis: Axis, order: &[Axis; 3]) -> bool {
        (**self).ends_round(axis, order)
    }

    fn vertical_bias(&self) -> bool {
        (**self).vertical_bias()
    }
}

fn coin_flip<R: Rng>(jitter: &mut Option<R>) -> bool {
    jitter.as_mut().is_some_and(|rng| rng.random_bool(0.5))
}

/// Fixed `X, Y, Z` order. Fully deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct Balanced;

impl GrowthPolicy for Balanced {
    fn axis_order(&mut self) -> [Axis; 3] {
        [Axis::X, Axis::Y, Axis::Z]
    }
}

/// Prefers tall columns: grows along Z first, restarts after every vertical
/// growth, and refuses lateral growth that would swallow part of a column.
#[derive(Debug, Clone)]
pub struct Vertical<R = StdRng> {
    jitter: Option<R>,
}

impl Vertical<StdRng> {
    /// Deterministic `Z, X, Y` order
    pub fn new() -> Self {
        Self { jitter: None }
    }
}

impl Default for Vertical<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Vertical<R> {
    /// Swap the two lateral axes with probability ½ each round
    pub fn jittered(rng: R) -> Self {
        Self { jitter: Some(rng) }
    }
}

impl<R: Rng> GrowthPolicy for Vertical<R> {
    fn axis_order(&mut self) -> [Axis; 3] {
        if coin_flip(&mut self.jitter) {
            [Axis::Z, Axis::Y, Axis::X]
        } else {
            [Axis::Z, Axis::X, Axis::Y]
        }
    }

    fn ends_round(&self, axis: Axis, order: &[Axis; 3]) -> bool {
        axis == order[0]
    }

    fn vertical_bias(&self) -> bool {
        true
    }
}

/// Prefers flat slabs: finishes both lateral axes before trying Z.
#[derive(Debug, Clone)]
pub struct Wide<R = StdRng> {
    jitter: Option<R>,
}

impl Wide<StdRng> {
    /// Deterministic `X, Y, Z` order
    pub fn new() -> Self {
        Self { jitter: None }
    }
}

impl Default for Wide<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Wide<R> {
    /// Swap X and Y with probability ½ each round
    pub fn jittered(rng: R) -> Self {
        Self { jitter: Some(rng) }
    }
}

impl<R: Rng> GrowthPolicy for Wide<R> {
    fn axis_order(&mut self) -> [Axis; 3] {
        if coin_flip(&mut self.jitter) {
            [Axis::Y, Axis::X, Axis::Z]
        } else {
            [Axis::X, Axis::Y, Axis::Z]
        }
    }

    fn ends_round(&self, axis: Axis, order: &[Axis; 3]) -> bool {
        axis == order[1]
    }
}

/// Uniformly random axis order every round
#[derive(Debug, Clone)]
pub struct Shuffled<R> {
    rng: R,
}

impl<R: Rng> Shuffled<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> GrowthPolicy for Shuffled<R> {
    fn axis_order(&mut self) -> [Axis; 3] {
        let mut order = [Axis::X, Axis::Y, Axis::Z];
        order.shuffle(&mut self.rng);
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_axis_others() {
        assert_eq!(Axis::X.others(), [Axis::Y, Axis::Z]);
        assert_eq!(Axis::Z.others(), [Axis::X, Axis::Y]);
        assert_eq!(Axis::Y.index(), 1);
    }

    #[test]
    fn test_vertical_leads_with_z() {
        let mut policy = Vertical::jittered(StdRng::seed_from_u64(7));
        for _ in 0..32 {
            let order = policy.axis_order();
            assert_eq!(order[0], Axis::Z);
            assert!(policy.ends_round(Axis::Z, &order));
            assert!(!policy.ends_round(order[1], &order));
        }
        assert!(policy.vertical_bias());
    }

    #[test]
    fn test_wide_keeps_z_last() {
        let mut policy = Wide::jittered(StdRng::seed_from_u64(7));
        for _ in 0..32 {
            let order = policy.axis_order();
            assert_eq!(order[2], Axis::Z);
            assert!(policy.ends_round(order[1], &order));
        }
        assert!(!policy.vertical_bias());
    }

    #[test]
    fn test_shuffled_is_permutation() {
        let mut policy = Shuffled::new(StdRng::seed_from_u64(3));
        for _ in 0..32 {
            let mut order = policy.axis_order();
            order.sort_by_key(|a| a.index());
            assert_eq!(order, [Axis::X, Axis::Y, Axis::Z]);
        }
    }

    #[test]
    fn test_boxed_policy_delegates() {
        let mut policy: Box<dyn GrowthPolicy> = Box::new(Vertical::new());
        assert_eq!(policy.axis_order(), [Axis::Z, Axis::X, Axis::Y]);
        assert!(policy.vertical_bias());
    }
}
