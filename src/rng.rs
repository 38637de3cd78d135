use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::collections::VecDeque;

/// Every random draw the game makes goes through here.
pub trait RandomSource {
    /// Uniform in [0, 1).
    fn unit(&mut self) -> f64;

    /// Uniform integer in `lo..=hi`.
    fn pick(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo + 1) as f64;
        let k = (self.unit() * span).floor() as i32;
        lo + k.clamp(0, hi - lo)
    }
}

pub struct Dice {
    rng: SmallRng,
}

impl Dice {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl RandomSource for Dice {
    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn pick(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }
}

/// Replays a fixed list of unit draws, then repeats `fallback` forever.
/// Handy for pinning spawns in tests and demos.
#[derive(Clone, Debug)]
pub struct Scripted {
    queue: VecDeque<f64>,
    fallback: f64,
}

impl Scripted {
    pub fn new(values: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            queue: values.into_iter().collect(),
            fallback: fallback.clamp(0.0, 0.999_999),
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(Vec::new(), value)
    }
}

impl RandomSource for Scripted {
    fn unit(&mut self) -> f64 {
        self.queue
            .pop_front()
            .map(|v| v.clamp(0.0, 0.999_999))
            .unwrap_or(self.fallback)
    }
}
