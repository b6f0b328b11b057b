pub mod distance;
pub mod error;
pub mod fixed_point;
pub mod reference;
pub mod test_utils;

/// Exact kernel over two unsigned integer vectors of equal length.
pub trait ExactCalculator {
    type Output;

    fn calculate(a: &[u32], b: &[u32]) -> Self::Output;
}

/// Largest value representable by an unsigned element of `bits` bits.
/// `bits = 0` yields 0, anything at or above 32 saturates to `u32::MAX`.
pub fn max_element_value(bits: u32) -> u32 {
    match bits {
        0 => 0,
        b if b >= u32::BITS => u32::MAX,
        b => (1u32 << b) - 1,
    }
}
