//! Move selection for the computer opponent.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Picks one of the currently empty squares.
///
/// `select` returns `None` only when `empty` is empty.
pub trait MoveSelector {
    fn select(&mut self, empty: &[usize]) -> Option<usize>;
}

/// Uniform choice over the empty squares, reproducible from its seed.
#[derive(Clone, Debug)]
pub struct RandomSelector {
    inner: ChaCha8Rng,
    seed: u64,
}

impl RandomSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MoveSelector for RandomSelector {
    fn select(&mut self, empty: &[usize]) -> Option<usize> {
        empty.choose(&mut self.inner).copied()
    }
}

impl<F> MoveSelector for F
where
    F: FnMut(&[usize]) -> Option<usize>,
{
    fn select(&mut self, empty: &[usize]) -> Option<usize> {
        self(empty)
    }
}
