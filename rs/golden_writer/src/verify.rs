use anyhow::{bail, Result};
use log::info;
use utils::reference::compute_references;

use crate::config::GeneratorConfig;
use crate::output::csv_reader::{read_inputs, read_references};
use crate::output::{DOT_PROD_COLUMN, EUC_DIST_COLUMN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Data row (0-based). `None` for file-level problems.
    pub row: Option<usize>,
    pub column: String,
    pub expected: String,
    pub found: String,
}

#[derive(Debug, Default)]
pub struct VerifyReport {
    pub num_rows: usize,
    pub mismatches: Vec<Mismatch>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }

    fn record(&mut self, row: Option<usize>, column: &str, expected: String, found: String) {
        self.mismatches.push(Mismatch {
            row,
            column: column.to_string(),
            expected,
            found,
        });
    }
}

/// Re-reads both artifacts named by `config` and recomputes every reference from
/// the stored inputs. Structural problems (unreadable files, malformed headers,
/// row counts that differ between the two files) are errors; value problems are
/// collected in the report.
pub fn verify_artifacts(config: &GeneratorConfig) -> Result<VerifyReport> {
    config.validate()?;
    let inputs = read_inputs(&config.input_path)?;
    let references = read_references(&config.reference_path)?;

    if inputs.length != config.length {
        bail!(
            "{} holds vectors of length {}, expected {}",
            config.input_path,
            inputs.length,
            config.length
        );
    }
    if inputs.samples.len() != references.len() {
        bail!(
            "{} has {} rows but {} has {}",
            config.input_path,
            inputs.samples.len(),
            config.reference_path,
            references.len()
        );
    }

    let mut report = VerifyReport {
        num_rows: references.len(),
        mismatches: vec![],
    };
    if report.num_rows != config.sample_count {
        report.record(
            None,
            "ROWS",
            config.sample_count.to_string(),
            report.num_rows.to_string(),
        );
    }

    let max_element = config.max_element();
    for (row, (sample, reference)) in inputs.samples.iter().zip(references.iter()).enumerate() {
        for (prefix, vector) in [("A", &sample.a), ("B", &sample.b)] {
            for (i, &value) in vector.iter().enumerate() {
                if value > max_element {
                    report.record(
                        Some(row),
                        &format!("{}{}", prefix, i),
                        format!("<= {}", max_element),
                        value.to_string(),
                    );
                }
            }
        }

        let expected = compute_references(&sample.a, &sample.b, config.sqrt_mode)?;
        if expected.dot_product != reference.dot_product {
            report.record(
                Some(row),
                DOT_PROD_COLUMN,
                expected.dot_product.to_string(),
                reference.dot_product.to_string(),
            );
        }
        if expected.euc_dist_q16 != reference.euc_dist_q16 {
            report.record(
                Some(row),
                EUC_DIST_COLUMN,
                expected.euc_dist_q16.to_string(),
                reference.euc_dist_q16.to_string(),
            );
        }
    }

    info!(
        "Verified {} rows, {} mismatches",
        report.num_rows,
        report.mismatches.len()
    );
    Ok(report)
}
