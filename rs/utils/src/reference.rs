use crate::distance::dot_product::DotProductCalculator;
use crate::distance::l2::SquaredL2Calculator;
use crate::error::GoldenError;
use crate::fixed_point::{q16_to_f64, sqrt_q16, SqrtMode};
use crate::ExactCalculator;

/// Expected outputs of the hardware kernels for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceResult {
    pub dot_product: u128,
    /// Raw Q16.16 integer. Divide by 2^16 for the real distance.
    pub euc_dist_q16: u64,
}

impl ReferenceResult {
    pub fn euc_dist(&self) -> f64 {
        q16_to_f64(self.euc_dist_q16)
    }
}

/// Computes the exact dot product and the truncated Q16.16 Euclidean distance
/// of `a` and `b`.
pub fn compute_references(
    a: &[u32],
    b: &[u32],
    sqrt_mode: SqrtMode,
) -> Result<ReferenceResult, GoldenError> {
    if a.len() != b.len() {
        return Err(GoldenError::InvalidInput(format!(
            "vector length mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product = DotProductCalculator::calculate(a, b);
    let ssd = SquaredL2Calculator::calculate(a, b);
    Ok(ReferenceResult {
        dot_product,
        euc_dist_q16: sqrt_q16(ssd, sqrt_mode),
    })
}
