use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Single-column numeric series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalarSeries {
    pub values: Vec<f64>,
    pub skipped_rows: usize,
}

/// Two-column `(timestep, value)` series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SteppedSeries {
    pub steps: Vec<f64>,
    pub values: Vec<f64>,
    pub skipped_rows: usize,
}

fn data_lines(
    reader: &mut impl BufRead,
    mut accept: impl FnMut(&[&str]) -> bool,
) -> Result<usize, SeriesError> {
    let mut skipped = 0usize;
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        if !accept(&tokens) {
            skipped += 1;
        }
    }
    Ok(skipped)
}

/// One value per line, taken from the first token.
pub fn parse_scalar_series(reader: &mut impl BufRead) -> Result<ScalarSeries, SeriesError> {
    let mut values = Vec::new();
    let skipped_rows = data_lines(reader, |tokens| {
        match tokens.first().map(|t| t.parse::<f64>()) {
            Some(Ok(v)) => {
                values.push(v);
                true
            }
            _ => false,
        }
    })?;
    Ok(ScalarSeries {
        values,
        skipped_rows,
    })
}

/// `(step, value)` pairs from the first two tokens of each line.
pub fn parse_stepped_series(reader: &mut impl BufRead) -> Result<SteppedSeries, SeriesError> {
    let mut steps = Vec::new();
    let mut values = Vec::new();
    let skipped_rows = data_lines(reader, |tokens| match tokens {
        [step, value, ..] => match (step.parse::<f64>(), value.parse::<f64>()) {
            (Ok(s), Ok(v)) => {
                steps.push(s);
                values.push(v);
                true
            }
            _ => false,
        },
        _ => false,
    })?;
    Ok(SteppedSeries {
        steps,
        values,
        skipped_rows,
    })
}

/// Box-dimension records `step Lx Ly Lz` reduced to `(step, Lx*Ly*Lz)`.
/// Lines with any other token count are dropped.
pub fn parse_box_volume_series(reader: &mut impl BufRead) -> Result<SteppedSeries, SeriesError> {
    let mut steps = Vec::new();
    let mut values = Vec::new();
    let skipped_rows = data_lines(reader, |tokens| match tokens {
        [step, lx, ly, lz] => {
            let parsed = (
                step.parse::<f64>(),
                lx.parse::<f64>(),
                ly.parse::<f64>(),
                lz.parse::<f64>(),
            );
            match parsed {
                (Ok(s), Ok(x), Ok(y), Ok(z)) => {
                    steps.push(s);
                    values.push(x * y * z);
                    true
                }
                _ => false,
            }
        }
        _ => false,
    })?;
    Ok(SteppedSeries {
        steps,
        values,
        skipped_rows,
    })
}

pub fn load_scalar_series(path: &Path) -> Result<Option<ScalarSeries>, SeriesError> {
    let Some(mut reader) = open_optional(path)? else {
        return Ok(None);
    };
    parse_scalar_series(&mut reader).map(Some)
}

pub fn load_stepped_series(path: &Path) -> Result<Option<SteppedSeries>, SeriesError> {
    let Some(mut reader) = open_optional(path)? else {
        return Ok(None);
    };
    parse_stepped_series(&mut reader).map(Some)
}

pub fn load_box_volume_series(path: &Path) -> Result<Option<SteppedSeries>, SeriesError> {
    let Some(mut reader) = open_optional(path)? else {
        return Ok(None);
    };
    parse_box_volume_series(&mut reader).map(Some)
}

fn open_optional(path: &Path) -> Result<Option<BufReader<File>>, SeriesError> {
    if !path.exists() {
        warn!("Series file not found: {}", path.display());
        return Ok(None);
    }
    Ok(Some(BufReader::new(File::open(path)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_series_skips_comments_and_garbage() {
        let text = "# gel volume\n100.0\nnot-a-number\n101.5\n\n102.0\n";
        let series = parse_scalar_series(&mut text.as_bytes()).unwrap();
        assert_eq!(series.values, vec![100.0, 101.5, 102.0]);
        assert_eq!(series.skipped_rows, 1);
    }

    #[test]
    fn stepped_series_pairs_first_two_tokens() {
        let text = "0 10.0\n100 11.0 extra\n200\n";
        let series = parse_stepped_series(&mut text.as_bytes()).unwrap();
        assert_eq!(series.steps, vec![0.0, 100.0]);
        assert_eq!(series.values, vec![10.0, 11.0]);
        assert_eq!(series.skipped_rows, 1);
    }

    #[test]
    fn box_volume_needs_exactly_four_tokens() {
        let text = "0 2.0 3.0 4.0\n100 2.0 3.0\n200 1.0 1.0 10.0\n";
        let series = parse_box_volume_series(&mut text.as_bytes()).unwrap();
        assert_eq!(series.steps, vec![0.0, 200.0]);
        assert_eq!(series.values, vec![24.0, 10.0]);
        assert_eq!(series.skipped_rows, 1);
    }
}
