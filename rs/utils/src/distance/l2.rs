use crate::distance::{KernelImpl, LANES};
use crate::fixed_point::{sqrt_q16, SqrtMode};
use crate::{max_element_value, ExactCalculator};

/// Sum of squared differences. An exact integer stand-in for the squared L2 distance.
pub struct SquaredL2Calculator {}

impl SquaredL2Calculator {
    pub fn calculate_scalar(a: &[u32], b: &[u32]) -> u128 {
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| {
                let diff = x.abs_diff(y) as u128;
                diff * diff
            })
            .sum()
    }

    pub fn calculate_with(kernel: KernelImpl, a: &[u32], b: &[u32]) -> u128 {
        match kernel {
            KernelImpl::Scalar => Self::calculate_scalar(a, b),
            KernelImpl::Lanes => Self::calculate(a, b),
        }
    }

    pub fn max_value(length: usize, bits: u32) -> u128 {
        let max_diff = max_element_value(bits) as u128;
        length as u128 * max_diff * max_diff
    }
}

impl ExactCalculator for SquaredL2Calculator {
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
                let diff = a_chunk[i].abs_diff(b_chunk[i]) as u64;
                lanes[i] += (diff * diff) as u128;
            }
        });

        lanes.iter().sum::<u128>() + Self::calculate_scalar(a_rem, b_rem)
    }
}

/// Euclidean distance encoded as a truncated Q16.16 integer.
pub struct EuclideanQ16Calculator {}

impl EuclideanQ16Calculator {
    pub fn calculate(a: &[u32], b: &[u32], mode: SqrtMode) -> u64 {
        sqrt_q16(SquaredL2Calculator::calculate(a, b), mode)
    }

    pub fn max_value(length: usize, bits: u32, mode: SqrtMode) -> u64 {
        sqrt_q16(SquaredL2Calculator::max_value(length, bits), mode)
    }
}
