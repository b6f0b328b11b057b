use std::io::Write;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use utils::error::GoldenError;
use utils::fixed_point::{SqrtMode, Q16_FRACTIONAL_BITS};
use utils::max_element_value;

use crate::output::csv_writer::check_distinct_paths;

/// Line terminator of both artifacts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LineEnding {
    /// What Python's `csv.writer` emits. Existing goldens use this.
    #[default]
    Crlf,
    Lf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }
}

/// Config for one golden generation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of elements in each of the two vectors.
    /// Default: 1024
    pub length: usize,

    /// Bits per element. Elements are drawn from [0, 2^bitsize - 1].
    /// Must be between 1 and 32.
    /// Default: 10
    pub bitsize: u32,

    /// Number of (A, B) pairs to generate.
    /// Default: 100
    pub sample_count: usize,

    /// Destination of the inputs artifact.
    /// Default: golden_inputs.csv
    pub input_path: String,

    /// Destination of the references artifact.
    /// Default: golden_references.csv
    pub reference_path: String,

    /// Base seed. Sample i is drawn from a generator seeded with `seed + i`.
    /// When unset, a random seed is chosen and logged.
    /// Default: None
    pub seed: Option<u64>,

    /// Square root policy for the Q16.16 distance.
    /// Default: Float
    pub sqrt_mode: SqrtMode,

    /// Default: Crlf
    pub line_ending: LineEnding,

    /// Worker threads. 0 uses one thread per core, 1 runs sequentially.
    /// Default: 1
    pub num_threads: usize,

    /// Samples computed per parallel batch before being streamed out.
    /// Default: 64
    pub batch_size: usize,

    /// Width of the result register of the design under test. Only used to warn
    /// when a reference may not fit.
    /// Default: 32
    pub result_word_bits: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            length: 1024,
            bitsize: 10,
            sample_count: 100,
            input_path: "golden_inputs.csv".to_string(),
            reference_path: "golden_references.csv".to_string(),
            seed: None,
            sqrt_mode: SqrtMode::Float,
            line_ending: LineEnding::Crlf,
            num_threads: 1,
            batch_size: 64,
            result_word_bits: 32,
        }
    }
}

impl GeneratorConfig {
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config: GeneratorConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path))?;
        Ok(config)
    }

    pub fn write_yaml_file(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    pub fn max_element(&self) -> u32 {
        max_element_value(self.bitsize)
    }

    /// Bits needed to hold the sum of squared differences (and the dot product)
    /// without overflow: 2 * bitsize + ceil(log2(length)).
    pub fn accumulator_bits(&self) -> u32 {
        let log2_length = match self.length {
            0 | 1 => 0,
            n => usize::BITS - (n - 1).leading_zeros(),
        };
        2 * self.bitsize + log2_length
    }

    pub fn validate(&self) -> Result<(), GoldenError> {
        if self.length == 0 {
            return Err(GoldenError::Config("length must be positive".to_string()));
        }
        if self.bitsize == 0 || self.bitsize > u32::BITS {
            return Err(GoldenError::Config(format!(
                "bitsize must be between 1 and {}, got {}",
                u32::BITS,
                self.bitsize
            )));
        }
        if self.sample_count == 0 {
            return Err(GoldenError::Config(
                "sample_count must be positive".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(GoldenError::Config("batch_size must be positive".to_string()));
        }
        if self.input_path.is_empty() || self.reference_path.is_empty() {
            return Err(GoldenError::Config("output paths must not be empty".to_string()));
        }
        if self.input_path == self.reference_path {
            return Err(GoldenError::Config(format!(
                "input and reference artifacts share the path {}",
                self.input_path
            )));
        }
        check_distinct_paths(&self.input_path, &self.reference_path)?;
        // The exact square root shifts the accumulator left by 32 bits.
        if self.accumulator_bits() + 2 * Q16_FRACTIONAL_BITS > u128::BITS {
            return Err(GoldenError::Config(format!(
                "length {} with bitsize {} needs a {}-bit accumulator, which overflows the fixed-point path",
                self.length,
                self.bitsize,
                self.accumulator_bits()
            )));
        }
        if self.result_word_bits == 0 || self.result_word_bits > u128::BITS {
            return Err(GoldenError::Config(format!(
                "result_word_bits must be between 1 and {}, got {}",
                u128::BITS,
                self.result_word_bits
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.length, 1024);
        assert_eq!(config.bitsize, 10);
        assert_eq!(config.sample_count, 100);
        assert_eq!(config.input_path, "golden_inputs.csv");
        assert_eq!(config.reference_path, "golden_references.csv");
        assert_eq!(config.max_element(), 1023);
        assert_eq!(config.accumulator_bits(), 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_values() {
        let mut config = GeneratorConfig::default();
        config.length = 0;
        assert!(matches!(config.validate(), Err(GoldenError::Config(_))));

        let mut config = GeneratorConfig::default();
        config.bitsize = 0;
        assert!(matches!(config.validate(), Err(GoldenError::Config(_))));

        let mut config = GeneratorConfig::default();
        config.sample_count = 0;
        assert!(matches!(config.validate(), Err(GoldenError::Config(_))));

        let mut config = GeneratorConfig::default();
        config.batch_size = 0;
        assert!(matches!(config.validate(), Err(GoldenError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_widths() {
        let mut config = GeneratorConfig::default();
        config.bitsize = 33;
        assert!(config.validate().is_err());

        // 2 * 32 + 40 + 32 > 128
        let mut config = GeneratorConfig::default();
        config.bitsize = 32;
        config.length = 1 << 40;
        assert!(config.validate().is_err());

        // 2 * 32 + 32 + 32 == 128
        config.length = 1 << 32;
        assert!(config.validate().is_ok());

        let mut config = GeneratorConfig::default();
        config.result_word_bits = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_shared_path() {
        let mut config = GeneratorConfig::default();
        config.reference_path = config.input_path.clone();
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::default();
        config.input_path = String::new();
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::default();
        config.input_path = "golden.csv.tmp".to_string();
        config.reference_path = "golden.csv".to_string();
        assert!(matches!(config.validate(), Err(GoldenError::Config(_))));
    }

    #[test]
    fn test_accumulator_bits() {
        let mut config = GeneratorConfig::default();
        config.length = 1;
        config.bitsize = 2;
        assert_eq!(config.accumulator_bits(), 4);
        config.length = 2;
        assert_eq!(config.accumulator_bits(), 5);
        config.length = 3;
        assert_eq!(config.accumulator_bits(), 6);
    }

    #[test]
    fn test_yaml_round_trip() {
        let temp_dir = tempdir::TempDir::new("generator_config_test").unwrap();
        let path = temp_dir.path().join("config.yaml");
        let path = path.to_str().unwrap();

        let mut config = GeneratorConfig::default();
        config.length = 16;
        config.seed = Some(42);
        config.sqrt_mode = SqrtMode::Exact;
        config.line_ending = LineEnding::Lf;
        config.write_yaml_file(path).unwrap();

        let read_back = GeneratorConfig::from_yaml_file(path).unwrap();
        assert_eq!(read_back, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: GeneratorConfig =
            serde_yaml::from_str("length: 2\nbitsize: 2\nsample_count: 1\n").unwrap();
        assert_eq!(config.length, 2);
        assert_eq!(config.bitsize, 2);
        assert_eq!(config.sample_count, 1);
        assert_eq!(config.input_path, "golden_inputs.csv");
        assert_eq!(config.sqrt_mode, SqrtMode::Float);
        assert_eq!(config.seed, None);
    }
}
