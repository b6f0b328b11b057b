use anyhow::Result;
use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use utils::distance::dot_product::DotProductCalculator;
use utils::distance::l2::EuclideanQ16Calculator;
use utils::reference::{compute_references, ReferenceResult};

use crate::config::GeneratorConfig;
use crate::output::csv_writer::GoldenWriter;
use crate::output::ReferenceSink;
use crate::sampler::{Sample, VectorSampler};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub num_samples: usize,
    /// Seed the run actually used. Pass it back in to regenerate the same artifacts.
    pub seed: u64,
}

/// Largest value of a two's complement register of `bits` bits.
pub fn signed_word_max(bits: u32) -> u128 {
    (1u128 << (bits - 1)) - 1
}

pub struct GoldenGenerator {
    config: GeneratorConfig,
    seed: u64,
}

impl GoldenGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random::<u64>);
        Ok(Self { config, seed })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sample `index` and its references. Depends only on the seed and the index.
    pub fn generate_sample(&self, index: usize) -> Result<(Sample, ReferenceResult)> {
        let sample = VectorSampler::for_sample(self.seed, index)
            .sample_pair(self.config.length, self.config.bitsize);
        let result = compute_references(&sample.a, &sample.b, self.config.sqrt_mode)?;
        Ok((sample, result))
    }

    fn log_range_warnings(&self) {
        let word_bits = self.config.result_word_bits;
        let word_max = signed_word_max(word_bits);

        let max_dot = DotProductCalculator::max_value(self.config.length, self.config.bitsize);
        if max_dot > word_max {
            warn!(
                "Dot product can reach {}, which does not fit a signed {}-bit result ({})",
                max_dot, word_bits, word_max
            );
        }

        let max_euc = EuclideanQ16Calculator::max_value(
            self.config.length,
            self.config.bitsize,
            self.config.sqrt_mode,
        );
        if max_euc as u128 > word_max {
            warn!(
                "Q16.16 distance can reach {}, which does not fit a signed {}-bit result ({})",
                max_euc, word_bits, word_max
            );
        }
    }

    /// Streams `sample_count` samples and their references into `sink`, in order.
    pub fn run(&self, sink: &mut impl ReferenceSink) -> Result<GenerationSummary> {
        let total = self.config.sample_count;
        info!(
            "Generating {} samples for dot product & euclidean distance (length {}, bitsize {}, seed {})",
            total, self.config.length, self.config.bitsize, self.seed
        );
        self.log_range_warnings();

        let pool = match self.config.num_threads {
            1 => None,
            num_threads => Some(ThreadPoolBuilder::new().num_threads(num_threads).build()?),
        };

        let mut start = 0;
        while start < total {
            let end = (start + self.config.batch_size).min(total);
            match &pool {
                Some(pool) => {
                    let batch = pool.install(|| {
                        (start..end)
                            .into_par_iter()
                            .map(|i| self.generate_sample(i))
                            .collect::<Result<Vec<_>>>()
                    })?;
                    for (sample, result) in &batch {
                        sink.append(sample, result)?;
                    }
                }
                None => {
                    for i in start..end {
                        let (sample, result) = self.generate_sample(i)?;
                        sink.append(&sample, &result)?;
                    }
                }
            }
            debug!("Generated {}/{} samples", end, total);
            start = end;
        }

        Ok(GenerationSummary {
            num_samples: total,
            seed: self.seed,
        })
    }
}

/// Generates both artifacts described by `config`. Nothing is left on disk if
/// generation fails.
pub fn generate_to_files(config: GeneratorConfig) -> Result<GenerationSummary> {
    let generator = GoldenGenerator::new(config)?;
    let mut writer = GoldenWriter::create(generator.config())?;
    let summary = generator.run(&mut writer)?;

    info!(
        "Writing {} and {}",
        generator.config().input_path,
        generator.config().reference_path
    );
    writer.finish()?;
    info!("Files generated successfully");
    Ok(summary)
}
