//! Random horizontal flip.

use crate::{common::*, pipeline::Transform, sample::Sample};

/// Horizontal flip initializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RandomHorizontalFlipInit {
    /// Flip probability.
    pub p: R64,
    /// Seed for the owned generator. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl RandomHorizontalFlipInit {
    pub fn build(self) -> Result<RandomHorizontalFlip> {
        let Self { p, seed } = self;
        ensure!(
            (0.0..=1.0).contains(&p.raw()),
            "p must be between 0.0 and 1.0"
        );

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(RandomHorizontalFlip { p: p.raw(), rng })
    }
}

/// Mirrors the image along the width axis with a fixed probability.
#[derive(Debug, Clone)]
pub struct RandomHorizontalFlip {
    p: f64,
    rng: StdRng,
}

impl Transform for RandomHorizontalFlip {
    fn forward(&mut self, mut sample: Sample) -> Result<Sample> {
        if self.rng.gen_bool(self.p) {
            sample.image = tch::no_grad(|| sample.image.flip(&[2]));
        }
        Ok(sample)
    }
}
