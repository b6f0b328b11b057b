use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use log::debug;
use utils::error::GoldenError;
use utils::reference::ReferenceResult;

use crate::config::GeneratorConfig;
use crate::output::{input_header, reference_header, ReferenceSink};
use crate::sampler::Sample;

/// Where an artifact is written before it is committed to `path`.
pub fn temp_path(path: &str) -> PathBuf {
    let mut temp_path = PathBuf::from(path).into_os_string();
    temp_path.push(".tmp");
    PathBuf::from(temp_path)
}

/// Fails if writing one artifact would touch the final or temporary file of the other.
pub fn check_distinct_paths(input_path: &str, reference_path: &str) -> Result<(), GoldenError> {
    let inputs = [PathBuf::from(input_path), temp_path(input_path)];
    let references = [PathBuf::from(reference_path), temp_path(reference_path)];
    if inputs.iter().any(|path| references.contains(path)) {
        return Err(GoldenError::Config(format!(
            "input path {} and reference path {} collide",
            input_path, reference_path
        )));
    }
    Ok(())
}

/// A file written under `<path>.tmp` and renamed into place on commit.
/// Dropping it uncommitted removes the temporary file.
struct PendingFile {
    path: PathBuf,
    temp_path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl PendingFile {
    fn create(path: &str) -> Result<Self> {
        let temp_path = temp_path(path);
        let path = PathBuf::from(path);
        let file = File::create(&temp_path)
            .with_context(|| format!("Failed to create {}", temp_path.display()))?;
        Ok(Self {
            path,
            temp_path,
            writer: Some(BufWriter::new(file)),
        })
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>> {
        let path = &self.path;
        self.writer
            .as_mut()
            .ok_or_else(|| anyhow!("{} is already committed", path.display()))
    }

    fn write_row<T: Display>(
        &mut self,
        values: impl IntoIterator<Item = T>,
        line_ending: &str,
    ) -> Result<()> {
        let writer = self.writer()?;
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                writer.write_all(b",")?;
            }
            write!(writer, "{}", value)?;
        }
        writer.write_all(line_ending.as_bytes())?;
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        let temp_path = self.temp_path.clone();
        let writer = self.writer()?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", temp_path.display()))?;
        writer.get_ref().sync_all()?;
        Ok(())
    }

    /// Must be called after `sync`.
    fn commit(&mut self) -> Result<()> {
        // Close the handle before renaming.
        drop(self.writer.take());
        if let Err(e) = fs::rename(&self.temp_path, &self.path) {
            fs::remove_file(&self.temp_path).unwrap_or_default();
            return Err(e).with_context(|| {
                format!(
                    "Failed to move {} to {}",
                    self.temp_path.display(),
                    self.path.display()
                )
            });
        }
        Ok(())
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if self.writer.take().is_some() {
            // Cleanup is best effort
            fs::remove_file(&self.temp_path).unwrap_or_default();
        }
    }
}

/// Streams samples and their references into the two CSV artifacts.
pub struct GoldenWriter {
    inputs: PendingFile,
    references: PendingFile,
    line_ending: &'static str,
    length: usize,
    num_rows: usize,
}

impl GoldenWriter {
    /// Opens both artifacts and writes their headers.
    pub fn create(config: &GeneratorConfig) -> Result<Self> {
        check_distinct_paths(&config.input_path, &config.reference_path)?;
        let line_ending = config.line_ending.as_str();

        let mut inputs = PendingFile::create(&config.input_path)?;
        inputs.write_row(input_header(config.length), line_ending)?;

        let mut references = PendingFile::create(&config.reference_path)?;
        references.write_row(reference_header(), line_ending)?;

        Ok(Self {
            inputs,
            references,
            line_ending,
            length: config.length,
            num_rows: 0,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Commits both artifacts and returns the number of data rows written.
    pub fn finish(mut self) -> Result<usize> {
        self.inputs.sync()?;
        self.references.sync()?;

        self.inputs.commit()?;
        if let Err(e) = self.references.commit() {
            // Don't leave an inputs artifact without its references.
            fs::remove_file(&self.inputs.path).unwrap_or_default();
            return Err(e);
        }

        debug!(
            "Committed {} rows to {} and {}",
            self.num_rows,
            self.inputs.path.display(),
            self.references.path.display()
        );
        Ok(self.num_rows)
    }
}

impl ReferenceSink for GoldenWriter {
    fn append(&mut self, sample: &Sample, result: &ReferenceResult) -> Result<()> {
        if sample.a.len() != self.length || sample.b.len() != self.length {
            return Err(GoldenError::InvalidInput(format!(
                "expected vectors of length {}, got {} and {}",
                self.length,
                sample.a.len(),
                sample.b.len()
            ))
            .into());
        }

        self.inputs
            .write_row(sample.a.iter().chain(sample.b.iter()), self.line_ending)?;
        self.references.write_row(
            [result.dot_product, result.euc_dist_q16 as u128],
            self.line_ending,
        )?;
        self.num_rows += 1;
        Ok(())
    }
}
