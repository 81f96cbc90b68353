use std::ffi::OsStr;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// Get a reader for a gzipped file, a plain file, or stdin when given '-'
pub fn get_dynamic_reader_w_stdin(file_path_str: &str) -> Result<BufReader<Box<dyn Read>>> {
    if file_path_str == "-" {
        Ok(BufReader::new(Box::new(io::stdin()) as Box<dyn Read>))
    } else {
        get_dynamic_reader(Path::new(file_path_str))
    }
}

/// A value that can be read from a samples file.
pub trait Sample: FromStr {
    fn is_finite(&self) -> bool {
        true
    }
}

impl Sample for u64 {}

impl Sample for f64 {
    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

///
/// Parse one sample per line. Blank lines and lines starting with '#' are skipped.
/// NaN and infinities are rejected.
///
pub fn read_samples<T, R>(reader: R) -> Result<Vec<T>>
where
    T: Sample,
    T::Err: Display,
    R: BufRead,
{
    let mut samples = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let value = line.trim();

        if value.is_empty() || value.starts_with('#') {
            continue;
        }

        let sample = value
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Bad sample on line {}: '{}' ({})", lineno + 1, value, e))?;

        if !sample.is_finite() {
            anyhow::bail!("Bad sample on line {}: '{}' (not finite)", lineno + 1, value);
        }

        samples.push(sample);
    }

    Ok(samples)
}

/// Write to the given path, or stdout when there is none.
pub fn get_output_writer(output_path: Option<&String>) -> Result<Box<dyn Write>> {
    match output_path {
        Some(p) => {
            let file = File::create(Path::new(p))
                .with_context(|| format!("Failed to create output file: {}", p))?;
            Ok(Box::new(io::BufWriter::new(file)))
        }
        None => Ok(Box::new(io::BufWriter::new(io::stdout()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_read_samples_skips_comments_and_blanks() {
        let input = "# read lengths\n1200\n\n  900 \n#\n1500\n";
        let samples: Vec<u64> = read_samples(input.as_bytes()).unwrap();
        assert_eq!(samples, vec![1200, 900, 1500]);
    }

    #[rstest]
    fn test_read_samples_reports_bad_line() {
        let err = read_samples::<u64, _>("12\n-3\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[rstest]
    #[case("1\nnan\n3\n", 2)]
    #[case("inf\n", 1)]
    #[case("4\n5\n-inf\n", 3)]
    fn test_read_samples_rejects_non_finite(#[case] input: &str, #[case] line: usize) {
        let err = read_samples::<f64, _>(input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains(&format!("line {line}")));
        assert!(err.to_string().contains("not finite"));
    }

    #[rstest]
    fn test_read_gzipped_samples() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("lengths.txt.gz");

        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"3.5\n4.25\n").unwrap();
        encoder.finish().unwrap();

        let reader = get_dynamic_reader(&path).unwrap();
        let samples: Vec<f64> = read_samples(reader).unwrap();
        assert_eq!(samples, vec![3.5, 4.25]);
    }

    #[rstest]
    fn test_missing_file_is_an_error() {
        assert!(get_dynamic_reader(Path::new("does/not/exist.txt")).is_err());
    }
}
