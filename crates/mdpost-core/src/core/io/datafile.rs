use crate::core::models::structure::BoxDims;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Structural/support particles held fixed during a run.
pub const SUPPORT_ATOM_TYPE: u32 = 4;
/// Piston particles used to apply load.
pub const PISTON_ATOM_TYPE: u32 = 5;

/// The conventional non-mobile atom types.
pub const DEFAULT_EXCLUDED_TYPES: &[u32] = &[SUPPORT_ATOM_TYPE, PISTON_ATOM_TYPE];

#[derive(Debug, Error)]
pub enum DataFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Missing required record: {0}")]
    MissingRecord(&'static str),
}

/// Box geometry and atom counts extracted from a LAMMPS data file.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFileSummary {
    pub box_dims: BoxDims,
    pub total_atoms: u64,
    /// Atoms whose type was in the exclusion set.
    pub excluded_atoms: u64,
    /// Atom-section rows whose type token failed to parse.
    pub skipped_rows: usize,
}

impl DataFileSummary {
    /// Total count minus structural/support and piston particles.
    pub fn mobile_atoms(&self) -> u64 {
        self.total_atoms.saturating_sub(self.excluded_atoms)
    }
}

/// Scans a LAMMPS data file for box bounds and atom counts.
///
/// The first line containing the token `atoms` before the `Atoms` section
/// supplies the total count; `xlo xhi`/`ylo yhi`/`zlo zhi` lines supply edge
/// lengths as hi - lo from their two leading numeric tokens. Inside the
/// `Atoms` section every non-blank line not starting with `Bonds` with at
/// least three tokens has its third token read as the atom type, and types
/// in `excluded_types` are tallied. All three box records and the atom count
/// are required.
pub fn parse_data_file(
    reader: &mut impl BufRead,
    excluded_types: &[u32],
) -> Result<DataFileSummary, DataFileError> {
    let mut total_atoms: Option<u64> = None;
    let mut spans: [Option<f64>; 3] = [None, None, None];
    let mut excluded_atoms = 0u64;
    let mut skipped_rows = 0usize;
    let mut reading_atoms = false;

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();

        if !reading_atoms
            && total_atoms.is_none()
            && trimmed.split_whitespace().any(|t| t == "atoms")
        {
            match trimmed.split_whitespace().next().map(str::parse::<u64>) {
                Some(Ok(count)) => total_atoms = Some(count),
                _ => skipped_rows += 1,
            }
        } else if trimmed.contains("xlo xhi") {
            spans[0] = bound_span(trimmed);
        } else if trimmed.contains("ylo yhi") {
            spans[1] = bound_span(trimmed);
        } else if trimmed.contains("zlo zhi") {
            spans[2] = bound_span(trimmed);
        } else if trimmed == "Atoms" {
            reading_atoms = true;
        } else if reading_atoms && !trimmed.is_empty() && !trimmed.starts_with("Bonds") {
            let Some(type_token) = trimmed.split_whitespace().nth(2) else {
                continue;
            };
            match type_token.parse::<u32>() {
                Ok(atom_type) if excluded_types.contains(&atom_type) => excluded_atoms += 1,
                Ok(_) => {}
                Err(_) => skipped_rows += 1,
            }
        }
    }

    let box_dims = BoxDims {
        x: spans[0].ok_or(DataFileError::MissingRecord("xlo xhi"))?,
        y: spans[1].ok_or(DataFileError::MissingRecord("ylo yhi"))?,
        z: spans[2].ok_or(DataFileError::MissingRecord("zlo zhi"))?,
    };
    let total_atoms = total_atoms.ok_or(DataFileError::MissingRecord("atoms"))?;

    Ok(DataFileSummary {
        box_dims,
        total_atoms,
        excluded_atoms,
        skipped_rows,
    })
}

fn bound_span(line: &str) -> Option<f64> {
    let mut tokens = line.split_whitespace();
    let lo: f64 = tokens.next()?.parse().ok()?;
    let hi: f64 = tokens.next()?.parse().ok()?;
    Some(hi - lo)
}

/// Path-level wrapper; a missing file is a logged no-data condition.
pub fn load_data_file(
    path: &Path,
    excluded_types: &[u32],
) -> Result<Option<DataFileSummary>, DataFileError> {
    if !path.exists() {
        warn!("Data file not found: {}", path.display());
        return Ok(None);
    }
    let mut reader = BufReader::new(File::open(path)?);
    parse_data_file(&mut reader, excluded_types).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(atom_lines: &str) -> String {
        format!(
            "LAMMPS data file\n\n100 atoms\n5 atom types\n\n\
             0.0 10.0 xlo xhi\n-5.0 5.0 ylo yhi\n0.0 20.0 zlo zhi\n\n\
             Atoms\n\n{atom_lines}"
        )
    }

    fn parse(text: &str) -> Result<DataFileSummary, DataFileError> {
        parse_data_file(&mut text.as_bytes(), DEFAULT_EXCLUDED_TYPES)
    }

    #[test]
    fn box_spans_are_hi_minus_lo() {
        let summary = parse(&sample("1 1 1 0.0 0.0 0.0\n")).unwrap();
        assert_eq!(summary.box_dims.x, 10.0);
        assert_eq!(summary.box_dims.y, 10.0);
        assert_eq!(summary.box_dims.z, 20.0);
    }

    #[test]
    fn excluded_types_reduce_mobile_count() {
        let mut atom_lines = String::new();
        for serial in 1..=20 {
            let atom_type = if serial % 2 == 0 { 4 } else { 5 };
            atom_lines.push_str(&format!("{serial} 1 {atom_type} 0.0 0.0 0.0\n"));
        }
        for serial in 21..=30 {
            atom_lines.push_str(&format!("{serial} 1 1 0.0 0.0 0.0\n"));
        }
        let summary = parse(&sample(&atom_lines)).unwrap();
        assert_eq!(summary.total_atoms, 100);
        assert_eq!(summary.excluded_atoms, 20);
        assert_eq!(summary.mobile_atoms(), 80);
    }

    #[test]
    fn atom_count_comes_from_first_atoms_line() {
        let text = "100 atoms\n42 atoms\n0.0 1.0 xlo xhi\n0.0 1.0 ylo yhi\n0.0 1.0 zlo zhi\nAtoms\n1 1 1 0 0 0\n";
        let summary = parse(text).unwrap();
        assert_eq!(summary.total_atoms, 100);
    }

    #[test]
    fn missing_box_record_is_an_error() {
        let text = "100 atoms\n0.0 1.0 xlo xhi\n0.0 1.0 ylo yhi\nAtoms\n";
        let err = parse(text).unwrap_err();
        assert!(matches!(err, DataFileError::MissingRecord("zlo zhi")));
    }

    #[test]
    fn non_integer_type_token_is_skipped() {
        let summary = parse(&sample("1 1 4 0.0 0.0 0.0\n2 0.5 0.5 0.5\n")).unwrap();
        assert_eq!(summary.excluded_atoms, 1);
        assert_eq!(summary.skipped_rows, 1);
    }

    #[test]
    fn load_missing_file_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_data_file(&dir.path().join("equil.data"), DEFAULT_EXCLUDED_TYPES).unwrap();
        assert!(result.is_none());
    }
}
