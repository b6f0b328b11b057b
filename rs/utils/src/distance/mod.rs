use strum::EnumIter;

pub mod dot_product;
pub mod l2;

/// Number of independent accumulators used by the chunked kernels.
pub(crate) const LANES: usize = 8;

/// Kernel variants. Both must produce identical results.
#[derive(Debug, EnumIter, PartialEq, Clone, Copy)]
pub enum KernelImpl {
    Scalar,
    Lanes,
}
