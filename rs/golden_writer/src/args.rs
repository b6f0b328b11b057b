use anyhow::Result;
use clap::Parser;
use utils::fixed_point::SqrtMode;

use crate::config::{GeneratorConfig, LineEnding};

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum SqrtModeArgs {
    Float,
    Exact,
}

impl From<SqrtModeArgs> for SqrtMode {
    fn from(value: SqrtModeArgs) -> Self {
        match value {
            SqrtModeArgs::Float => SqrtMode::Float,
            SqrtModeArgs::Exact => SqrtMode::Exact,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum LineEndingArgs {
    Crlf,
    Lf,
}

impl From<LineEndingArgs> for LineEnding {
    fn from(value: LineEndingArgs) -> Self {
        match value {
            LineEndingArgs::Crlf => LineEnding::Crlf,
            LineEndingArgs::Lf => LineEnding::Lf,
        }
    }
}

/// Generator settings shared by the binaries. Unset flags fall back to the
/// config file, then to the defaults.
#[derive(Parser, Debug, Default)]
pub struct ConfigArgs {
    /// YAML config file
    #[arg(long)]
    pub config: Option<String>,

    /// Vector length (N)
    #[arg(long)]
    pub length: Option<usize>,

    /// Bits per element
    #[arg(long)]
    pub bitsize: Option<u32>,

    #[arg(long = "num-samples")]
    pub num_samples: Option<usize>,

    #[arg(long = "input-path")]
    pub input_path: Option<String>,

    #[arg(long = "reference-path")]
    pub reference_path: Option<String>,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long = "sqrt-mode", value_enum)]
    pub sqrt_mode: Option<SqrtModeArgs>,

    #[arg(long = "line-ending", value_enum)]
    pub line_ending: Option<LineEndingArgs>,

    /// 0 uses every core
    #[arg(long = "num-threads")]
    pub num_threads: Option<usize>,

    #[arg(long = "batch-size")]
    pub batch_size: Option<usize>,

    #[arg(long = "result-word-bits")]
    pub result_word_bits: Option<u32>,
}

impl ConfigArgs {
    pub fn resolve(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_yaml_file(path)?,
            None => GeneratorConfig::default(),
        };

        if let Some(length) = self.length {
            config.length = length;
        }
        if let Some(bitsize) = self.bitsize {
            config.bitsize = bitsize;
        }
        if let Some(num_samples) = self.num_samples {
            config.sample_count = num_samples;
        }
        if let Some(input_path) = &self.input_path {
            config.input_path = input_path.clone();
        }
        if let Some(reference_path) = &self.reference_path {
            config.reference_path = reference_path.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(sqrt_mode) = self.sqrt_mode {
            config.sqrt_mode = sqrt_mode.into();
        }
        if let Some(line_ending) = self.line_ending {
            config.line_ending = line_ending.into();
        }
        if let Some(num_threads) = self.num_threads {
            config.num_threads = num_threads;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(result_word_bits) = self.result_word_bits {
            config.result_word_bits = result_word_bits;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = ConfigArgs::try_parse_from(
            [
                "golden_generator",
                "--length",
                "2",
                "--bitsize",
                "2",
                "--num-samples",
                "1",
                "--sqrt-mode",
                "exact",
                "--line-ending",
                "lf",
                "--seed",
                "9",
            ]
            .iter(),
        )
        .unwrap();
        assert_eq!(args.length, Some(2));
        assert_eq!(args.sqrt_mode, Some(SqrtModeArgs::Exact));

        let config = args.resolve().unwrap();
        assert_eq!(config.length, 2);
        assert_eq!(config.bitsize, 2);
        assert_eq!(config.sample_count, 1);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.sqrt_mode, SqrtMode::Exact);
        assert_eq!(config.line_ending, LineEnding::Lf);
        assert_eq!(config.input_path, "golden_inputs.csv");

        // Test parsing with invalid sqrt mode
        let result = ConfigArgs::try_parse_from(
            ["golden_generator", "--sqrt-mode", "round"].iter(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_no_flags_gives_defaults() {
        let config = ConfigArgs::default().resolve().unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp_dir = tempdir::TempDir::new("config_args_test").unwrap();
        let path = temp_dir
            .path()
            .join("config.yaml")
            .to_str()
            .unwrap()
            .to_string();
        let mut file_config = GeneratorConfig::default();
        file_config.length = 64;
        file_config.bitsize = 8;
        file_config.num_threads = 4;
        file_config.write_yaml_file(&path).unwrap();

        let args = ConfigArgs::try_parse_from(
            ["golden_generator", "--config", path.as_str(), "--bitsize", "12"].iter(),
        )
        .unwrap();
        let config = args.resolve().unwrap();
        assert_eq!(config.length, 64);
        assert_eq!(config.bitsize, 12);
        assert_eq!(config.num_threads, 4);
    }

    #[test]
    fn test_missing_config_file() {
        let args = ConfigArgs {
            config: Some("/nonexistent/config.yaml".to_string()),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }
}
