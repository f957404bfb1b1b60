//! Randomness seam shared by game simulation and tie-break fallback.

use rand::RngCore;

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_uniform(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let index = (self.next_uniform() * len as f64) as usize;
        index.min(len - 1)
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_uniform(&mut self) -> f64 {
        use rand::Rng;
        self.gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
#[derive(Clone, Debug)]
pub struct SequenceSource {
    values: Vec<f64>,
    position: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "sequence source needs at least one value");
        SequenceSource { values, position: 0 }
    }

    /// Source that always returns `value`.
    pub fn constant(value: f64) -> Self {
        SequenceSource::new(vec![value])
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.position
    }
}

impl RandomSource for SequenceSource {
    fn next_uniform(&mut self) -> f64 {
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_sequence_cycles() {
        let mut source = SequenceSource::new(vec![0.1, 0.9]);
        assert_eq!(source.next_uniform(), 0.1);
        assert_eq!(source.next_uniform(), 0.9);
        assert_eq!(source.next_uniform(), 0.1);
        assert_eq!(source.draws(), 3);
    }

    #[test]
    fn test_pick_index_bounds() {
        let mut low = SequenceSource::constant(0.0);
        assert_eq!(low.pick_index(3), 0);

        let mut high = SequenceSource::constant(0.999_999);
        assert_eq!(high.pick_index(3), 2);

        let mut middle = SequenceSource::constant(0.5);
        assert_eq!(middle.pick_index(2), 1);
    }

    #[test]
    fn test_seeded_rng_reproducible() {
        let mut rng1 = ChaCha8Rng::seed_from_u64(7);
        let mut rng2 = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10 {
            let draw = rng1.next_uniform();
            assert!((0.0..1.0).contains(&draw));
            assert_eq!(draw, rng2.next_uniform());
        }
    }
}
