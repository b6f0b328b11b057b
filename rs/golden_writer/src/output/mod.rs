use anyhow::Result;
use utils::reference::ReferenceResult;

use crate::sampler::Sample;

pub mod csv_reader;
pub mod csv_writer;

pub const DOT_PROD_COLUMN: &str = "DOT_PROD";
pub const EUC_DIST_COLUMN: &str = "EUC_DIST_Q16";

/// Header of the inputs artifact: A0..A{n-1} followed by B0..B{n-1}.
pub fn input_header(length: usize) -> Vec<String> {
    (0..length)
        .map(|i| format!("A{}", i))
        .chain((0..length).map(|i| format!("B{}", i)))
        .collect()
}

pub fn reference_header() -> [&'static str; 2] {
    [DOT_PROD_COLUMN, EUC_DIST_COLUMN]
}

/// Destination of generated rows. Rows arrive in sample order.
pub trait ReferenceSink {
    fn append(&mut self, sample: &Sample, result: &ReferenceResult) -> Result<()>;
}
