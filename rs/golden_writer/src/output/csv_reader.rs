use std::fs::File;
use std::io::{BufRead, BufReader};
use std::str::FromStr;

use anyhow::{Context, Result};
use utils::error::GoldenError;
use utils::reference::ReferenceResult;

use crate::output::{input_header, reference_header};
use crate::sampler::Sample;

/// Parsed inputs artifact.
#[derive(Debug)]
pub struct GoldenInputs {
    /// Vector length, derived from the header.
    pub length: usize,
    pub samples: Vec<Sample>,
}

fn parse_error(path: &str, line: usize, message: impl Into<String>) -> anyhow::Error {
    GoldenError::Parse {
        path: path.to_string(),
        line,
        message: message.into(),
    }
    .into()
}

/// Non-empty lines with their 1-based line number. Accepts both LF and CRLF.
fn non_empty_lines(path: &str) -> Result<impl Iterator<Item = Result<(usize, String)>>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path))?;
    Ok(BufReader::new(file)
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Ok(line) => {
                let line = line.trim_end_matches('\r');
                if line.is_empty() {
                    None
                } else {
                    Some(Ok((i + 1, line.to_string())))
                }
            }
            Err(e) => Some(Err(anyhow::Error::from(e))),
        }))
}

fn parse_field<T: FromStr>(path: &str, line: usize, field: &str) -> Result<T> {
    field
        .trim()
        .parse::<T>()
        .map_err(|_| parse_error(path, line, format!("invalid integer '{}'", field)))
}

fn split_header(line: &str) -> Vec<&str> {
    line.split(',').map(|column| column.trim()).collect()
}

pub fn read_inputs(path: &str) -> Result<GoldenInputs> {
    let mut lines = non_empty_lines(path)?;
    let (header_line, header) = lines
        .next()
        .ok_or_else(|| parse_error(path, 1, "missing header"))??;

    let columns = split_header(&header);
    if columns.len() % 2 != 0 {
        return Err(parse_error(
            path,
            header_line,
            format!("expected an even number of columns, got {}", columns.len()),
        ));
    }
    let length = columns.len() / 2;
    let expected = input_header(length);
    if let Some(i) = (0..columns.len()).find(|&i| columns[i] != expected[i]) {
        return Err(parse_error(
            path,
            header_line,
            format!("column {} is '{}', expected '{}'", i, columns[i], expected[i]),
        ));
    }

    let mut samples = vec![];
    for line in lines {
        let (line_no, line) = line?;
        let values = line
            .split(',')
            .map(|field| parse_field::<u32>(path, line_no, field))
            .collect::<Result<Vec<_>>>()?;
        if values.len() != 2 * length {
            return Err(parse_error(
                path,
                line_no,
                format!("expected {} values, got {}", 2 * length, values.len()),
            ));
        }
        let b = values[length..].to_vec();
        let mut a = values;
        a.truncate(length);
        samples.push(Sample { a, b });
    }

    Ok(GoldenInputs { length, samples })
}

pub fn read_references(path: &str) -> Result<Vec<ReferenceResult>> {
    let mut lines = non_empty_lines(path)?;
    let (header_line, header) = lines
        .next()
        .ok_or_else(|| parse_error(path, 1, "missing header"))??;
    if split_header(&header) != reference_header() {
        return Err(parse_error(
            path,
            header_line,
            format!("unexpected header '{}'", header),
        ));
    }

    let mut references = vec![];
    for line in lines {
        let (line_no, line) = line?;
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 2 {
            return Err(parse_error(
                path,
                line_no,
                format!("expected 2 values, got {}", fields.len()),
            ));
        }
        references.push(ReferenceResult {
            dot_product: parse_field(path, line_no, fields[0])?,
            euc_dist_q16: parse_field(path, line_no, fields[1])?,
        });
    }
    Ok(references)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write_file(dir: &tempdir::TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name).to_str().unwrap().to_string();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_inputs() {
        let temp_dir = tempdir::TempDir::new("golden_reader_test").unwrap();
        let path = write_file(
            &temp_dir,
            "inputs.csv",
            "A0,A1,B0,B1\r\n3,0,1,2\r\n1,1,2,2\r\n",
        );
        let inputs = read_inputs(&path).unwrap();
        assert_eq!(inputs.length, 2);
        assert_eq!(inputs.samples.len(), 2);
        assert_eq!(inputs.samples[0].a, vec![3, 0]);
        assert_eq!(inputs.samples[0].b, vec![1, 2]);
        assert_eq!(inputs.samples[1].a, vec![1, 1]);
        assert_eq!(inputs.samples[1].b, vec![2, 2]);
    }

    #[test]
    fn test_read_inputs_header_only() {
        let temp_dir = tempdir::TempDir::new("golden_reader_test").unwrap();
        let path = write_file(&temp_dir, "inputs.csv", "A0,B0\n");
        let inputs = read_inputs(&path).unwrap();
        assert_eq!(inputs.length, 1);
        assert!(inputs.samples.is_empty());
    }

    #[test]
    fn test_read_inputs_bad_header() {
        let temp_dir = tempdir::TempDir::new("golden_reader_test").unwrap();
        let path = write_file(&temp_dir, "inputs.csv", "A0,A1,B1,B0\n1,2,3,4\n");
        let err = read_inputs(&path).unwrap_err();
        match err.downcast_ref::<GoldenError>() {
            Some(GoldenError::Parse { line, .. }) => assert_eq!(*line, 1),
            other => panic!("unexpected error {:?}", other),
        }

        let path = write_file(&temp_dir, "odd.csv", "A0,A1,B0\n");
        assert!(read_inputs(&path).is_err());

        let path = write_file(&temp_dir, "empty.csv", "");
        assert!(read_inputs(&path).is_err());
    }

    #[test]
    fn test_read_inputs_bad_row() {
        let temp_dir = tempdir::TempDir::new("golden_reader_test").unwrap();
        let path = write_file(&temp_dir, "inputs.csv", "A0,B0\n1,2\n1,x\n");
        match read_inputs(&path).unwrap_err().downcast_ref::<GoldenError>() {
            Some(GoldenError::Parse { line, message, .. }) => {
                assert_eq!(*line, 3);
                assert!(message.contains("'x'"));
            }
            other => panic!("unexpected error {:?}", other),
        }

        let path = write_file(&temp_dir, "short.csv", "A0,B0\n1\n");
        assert!(read_inputs(&path).is_err());
    }

    #[test]
    fn test_read_references() {
        let temp_dir = tempdir::TempDir::new("golden_reader_test").unwrap();
        let path = write_file(
            &temp_dir,
            "references.csv",
            "DOT_PROD,EUC_DIST_Q16\n3,185363\n340282366920938463463374607431768211455,0\n",
        );
        let references = read_references(&path).unwrap();
        assert_eq!(references.len(), 2);
        assert_eq!(references[0].dot_product, 3);
        assert_eq!(references[0].euc_dist_q16, 185363);
        assert_eq!(references[1].dot_product, u128::MAX);
    }

    #[test]
    fn test_read_references_bad_input() {
        let temp_dir = tempdir::TempDir::new("golden_reader_test").unwrap();
        let path = write_file(&temp_dir, "header.csv", "DOT,EUC\n3,4\n");
        assert!(read_references(&path).is_err());

        let path = write_file(&temp_dir, "fields.csv", "DOT_PROD,EUC_DIST_Q16\n3\n");
        assert!(read_references(&path).is_err());

        let path = write_file(&temp_dir, "negative.csv", "DOT_PROD,EUC_DIST_Q16\n3,-4\n");
        assert!(read_references(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(read_references("/nonexistent/golden_references.csv").is_err());
    }
}
