//! Shared input generation for the benchmarks.

use dftcheck::num::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `len` complex samples uniform in `[-0.5, 0.5)`.
pub fn random_signal(len: usize, seed: u64) -> Vec<Complex64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| Complex64::new(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_is_reproducible() {
        assert_eq!(random_signal(16, 3), random_signal(16, 3));
    }
}
