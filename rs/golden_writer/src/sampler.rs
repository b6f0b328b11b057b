use rand::distributions::Uniform;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use utils::max_element_value;

/// One test case: two vectors of the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub a: Vec<u32>,
    pub b: Vec<u32>,
}

impl Sample {
    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }
}

pub struct VectorSampler<R: Rng> {
    rng: R,
}

impl VectorSampler<ChaCha8Rng> {
    /// Sampler for sample `index` of a run seeded with `seed`. The seed picks the
    /// key and the index picks the stream, so every `(seed, index)` pair draws
    /// from its own sequence.
    pub fn for_sample(seed: u64, index: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(index as u64);
        Self::new(rng)
    }
}

impl<R: Rng> VectorSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draws `length` elements uniformly from [0, 2^bits - 1]. `bits = 0` gives all zeros.
    pub fn sample_vector(&mut self, length: usize, bits: u32) -> Vec<u32> {
        debug_assert!(bits <= u32::BITS);
        if bits == 0 {
            return vec![0; length];
        }
        let range = Uniform::new_inclusive(0, max_element_value(bits));
        (&mut self.rng).sample_iter(range).take(length).collect()
    }

    /// Draws A then B, independently.
    pub fn sample_pair(&mut self, length: usize, bits: u32) -> Sample {
        let a = self.sample_vector(length, bits);
        let b = self.sample_vector(length, bits);
        Sample { a, b }
    }
}
