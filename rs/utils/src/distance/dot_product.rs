use crate::distance::{KernelImpl, LANES};
use crate::{max_element_value, ExactCalculator};

pub struct DotProductCalculator {}

impl DotProductCalculator {
    pub fn calculate_scalar(a: &[u32], b: &[u32]) -> u128 {
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| x as u128 * y as u128)
            .sum()
    }

    pub fn calculate_with(kernel: KernelImpl, a: &[u32], b: &[u32]) -> u128 {
        match kernel {
            KernelImpl::Scalar => Self::calculate_scalar(a, b),
            KernelImpl::Lanes => Self::calculate(a, b),
        }
    }

    /// Worst-case dot product of two `length`-element vectors of `bits`-bit elements.
    pub fn max_value(length: usize, bits: u32) -> u128 {
        let max_element = max_element_value(bits) as u128;
        length as u128 * max_element * max_element
    }
}

impl ExactCalculator for DotProductCalculator {
    type Output = u128;

    fn calculate(a: &[u32], b: &[u32]) -> u128 {
        debug_assert_eq!(a.len(), b.len());
        let a_chunks = a.chunks_exact(LANES);
        let b_chunks = b.chunks_exact(LANES);
        let a_rem = a_chunks.remainder();
        let b_rem = b_chunks.remainder();

        let mut lanes = [0u128; LANES];
        a_chunks.zip(b_chunks).for_each(|(a_chunk, b_chunk)| {
            for i in 0..LANES {
                // u32 * u32 always fits in u64
                lanes[i] += (a_chunk[i] as u64 * b_chunk[i] as u64) as u128;
            }
        });

        lanes.iter().sum::<u128>() + Self::calculate_scalar(a_rem, b_rem)
    }
}
