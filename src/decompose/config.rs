//! Decomposition configuration

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::policy::{Balanced, GrowthPolicy, Shuffled, Vertical, Wide};

/// Which cover shapes the decomposer should favour
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverShape {
    /// Fixed X, Y, Z growth order
    #[default]
    Balanced,
    /// Tall columns, for staircase runs
    Vertical,
    /// Flat slabs
    Wide,
    /// Random growth order every round (requires a seed to be reproducible)
    Shuffled,
}

/// Configuration for [`decompose`](super::decompose)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecomposeConfig {
    /// Shape preference
    pub shape: CoverShape,
    /// Seed for the growth-order jitter. `None` keeps vertical and wide
    /// growth deterministic; shuffled growth then seeds from the OS.
    pub seed: Option<u64>,
}

impl DecomposeConfig {
    pub fn vertical() -> Self {
        Self { shape: CoverShape::Vertical, ..Default::default() }
    }

    /// Build the growth policy this configuration describes
    pub fn policy(&self) -> Box<dyn GrowthPolicy> {
        let rng = self.seed.map(StdRng::seed_from_u64);
        match (self.shape, rng) {
            (CoverShape::Balanced, _) => Box::new(Balanced),
            (CoverShape::Vertical, None) => Box::new(Vertical::new()),
            (CoverShape::Vertical, Some(rng)) => Box::new(Vertical::jittered(rng)),
            (CoverShape::Wide, None) => Box::new(Wide::new()),
            (CoverShape::Wide, Some(rng)) => Box::new(Wide::jittered(rng)),
            (CoverShape::Shuffled, rng) => {
                Box::new(Shuffled::new(rng.unwrap_or_else(StdRng::from_os_rng)))
            }
        }
    }
}
