use crate::core::models::profile::ProfileBlock;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum AveTimeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Parsed `ave/time` blocks plus the per-parse data-quality diagnostic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AveTimeParse {
    pub blocks: Vec<ProfileBlock>,
    /// Body rows and stray lines dropped during the scan.
    pub skipped_rows: usize,
}

/// Extracts `(timestep, N-row block)` records from an `ave/time` file.
///
/// Comment (`#`) and blank lines are stripped first. A remaining line with
/// exactly two tokens parsing as `(timestep, N)` introduces a block of N body
/// lines; each body line with exactly two tokens contributes its second token
/// as a value, anything else is dropped but still counted against N — the
/// scan always advances N+1 lines. A block is emitted only if at least one
/// row was accepted, with indices renumbered densely over the accepted rows.
pub fn parse_ave_time(reader: &mut impl BufRead) -> Result<AveTimeParse, AveTimeError> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        lines.push(trimmed.to_owned());
    }

    let mut blocks = Vec::new();
    let mut skipped_rows = 0usize;
    let mut i = 0usize;
    while i < lines.len() {
        let head: Vec<&str> = lines[i].split_whitespace().collect();
        if head.len() != 2 {
            skipped_rows += 1;
            i += 1;
            continue;
        }
        let header = head[0]
            .parse::<u64>()
            .ok()
            .zip(head[1].parse::<usize>().ok());
        let Some((timestep, nrows)) = header else {
            skipped_rows += 1;
            i += 1;
            continue;
        };

        let mut values = Vec::with_capacity(nrows);
        for j in 1..=nrows {
            let Some(body) = lines.get(i + j) else {
                break;
            };
            let parts: Vec<&str> = body.split_whitespace().collect();
            match parts.as_slice() {
                [_, value] => match value.parse::<f64>() {
                    Ok(v) => values.push(v),
                    Err(_) => skipped_rows += 1,
                },
                _ => skipped_rows += 1,
            }
        }
        if !values.is_empty() {
            blocks.push(ProfileBlock::from_values(timestep, values));
        }
        i += nrows + 1;
    }

    Ok(AveTimeParse {
        blocks,
        skipped_rows,
    })
}

/// Path-level wrapper; a missing file is a logged no-data condition.
pub fn load_ave_time(path: &Path) -> Result<Option<AveTimeParse>, AveTimeError> {
    if !path.exists() {
        warn!("Profile data file not found: {}", path.display());
        return Ok(None);
    }
    let mut reader = BufReader::new(File::open(path)?);
    parse_ave_time(&mut reader).map(Some)
}
