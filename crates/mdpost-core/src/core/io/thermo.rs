use crate::core::models::thermo::ThermoTable;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ThermoLogError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Parsed thermo output plus the per-parse data-quality diagnostic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThermoParse {
    pub table: ThermoTable,
    /// Rows dropped while inside a thermo block (wrong width or non-numeric).
    pub skipped_rows: usize,
}

/// Extracts the thermo table from a LAMMPS log.
///
/// A line whose first token is `Step` starts accumulation and its tokens
/// become the column names; the column mapping is reset on every such line,
/// so the last block wins. While reading, a row is accepted only if its token
/// count equals the header width and every token parses as a float. A line
/// containing `Loop time` or starting with `WARNING` stops accumulation.
/// An empty table means "no data", not an error.
pub fn parse_thermo_log(reader: &mut impl BufRead) -> Result<ThermoParse, ThermoLogError> {
    let mut table = ThermoTable::default();
    let mut reading = false;
    let mut skipped_rows = 0usize;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.split_whitespace().next() == Some("Step") {
            table = ThermoTable::new(line.split_whitespace().map(str::to_owned).collect());
            reading = true;
            continue;
        }

        if reading && (line.contains("Loop time") || line.starts_with("WARNING")) {
            reading = false;
            continue;
        }

        if reading && !line.is_empty() && !line.starts_with('#') {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != table.width() {
                skipped_rows += 1;
                continue;
            }
            match tokens
                .iter()
                .map(|t| t.parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
            {
                Ok(values) => table.push_row(&values),
                Err(_) => skipped_rows += 1,
            }
        }
    }

    Ok(ThermoParse {
        table,
        skipped_rows,
    })
}

/// Wall-clock seconds from the last `Loop time of <seconds> ...` line, if any.
pub fn parse_wall_time(reader: &mut impl BufRead) -> Result<Option<f64>, ThermoLogError> {
    let mut wall_time = None;
    for line in reader.lines() {
        let line = line?;
        if line.contains("Loop time of") {
            if let Some(value) = line.split_whitespace().nth(3) {
                if let Ok(seconds) = value.parse::<f64>() {
                    wall_time = Some(seconds);
                }
            }
        }
    }
    Ok(wall_time)
}

/// Path-level wrapper; a missing log is a logged no-data condition.
pub fn load_thermo_log(path: &Path) -> Result<Option<ThermoParse>, ThermoLogError> {
    if !path.exists() {
        warn!("Thermo log not found: {}", path.display());
        return Ok(None);
    }
    let mut reader = BufReader::new(File::open(path)?);
    parse_thermo_log(&mut reader).map(Some)
}

pub fn load_wall_time(path: &Path) -> Result<Option<f64>, ThermoLogError> {
    if !path.exists() {
        warn!("Thermo log not found: {}", path.display());
        return Ok(None);
    }
    let mut reader = BufReader::new(File::open(path)?);
    parse_wall_time(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
LAMMPS (23 Jun 2022)
units lj
Step Temp Press Volume
0 1.0 0.5 1000.0
100 1.1 0.6 1001.0
200 1.2 0.7 1002.0
Loop time of 42.5 on 4 procs for 200 steps
";

    fn parse(text: &str) -> ThermoParse {
        parse_thermo_log(&mut text.as_bytes()).unwrap()
    }

    #[test]
    fn well_formed_block_fills_every_column() {
        let parsed = parse(LOG);
        assert_eq!(parsed.table.rows(), 3);
        assert_eq!(parsed.skipped_rows, 0);
        for name in ["Step", "Temp", "Press", "Volume"] {
            assert_eq!(parsed.table.column(name).unwrap().len(), 3);
        }
        assert_eq!(parsed.table.column("Temp").unwrap(), &[1.0, 1.1, 1.2]);
    }

    #[test]
    fn wrong_width_row_grows_no_column() {
        let parsed = parse(
            "Step Temp\n0 1.0\n100 1.1 999.0\n200 1.2\nLoop time of 1.0 on 1 procs\n",
        );
        assert_eq!(parsed.table.rows(), 2);
        assert_eq!(parsed.skipped_rows, 1);
        assert_eq!(parsed.table.column("Step").unwrap(), &[0.0, 200.0]);
    }

    #[test]
    fn non_numeric_row_is_dropped() {
        let parsed = parse("Step Temp\n0 1.0\n100 abc\nLoop time of 1.0 on 1 procs\n");
        assert_eq!(parsed.table.rows(), 1);
        assert_eq!(parsed.skipped_rows, 1);
    }

    #[test]
    fn warning_line_stops_accumulation() {
        let parsed = parse("Step Temp\n0 1.0\nWARNING: something\n100 1.1\n");
        assert_eq!(parsed.table.rows(), 1);
        // Rows after the terminator are not data and not counted as skipped.
        assert_eq!(parsed.skipped_rows, 0);
    }

    #[test]
    fn later_step_block_wins() {
        let parsed = parse(
            "Step Temp\n0 1.0\n100 1.1\nLoop time of 1.0 on 1 procs\n\
             Step Temp Press\n200 2.0 0.5\nLoop time of 2.0 on 1 procs\n",
        );
        assert_eq!(parsed.table.rows(), 1);
        assert_eq!(parsed.table.column("Temp").unwrap(), &[2.0]);
        assert!(parsed.table.has_column("Press"));
    }

    #[test]
    fn missing_header_yields_empty_table() {
        let parsed = parse("no thermo output here\n1 2 3\n");
        assert!(parsed.table.is_empty());
        assert_eq!(parsed.skipped_rows, 0);
    }

    #[test]
    fn wall_time_takes_last_loop_line() {
        let text = "Loop time of 10.0 on 1 procs\nStep Temp\n0 1.0\nLoop time of 42.5 on 4 procs\n";
        let wall = parse_wall_time(&mut text.as_bytes()).unwrap();
        assert_eq!(wall, Some(42.5));
    }

    #[test]
    fn wall_time_absent_is_none() {
        let wall = parse_wall_time(&mut "Step Temp\n0 1.0\n".as_bytes()).unwrap();
        assert_eq!(wall, None);
    }

    #[test]
    fn load_missing_log_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_thermo_log(&dir.path().join("log.lammps")).unwrap();
        assert!(result.is_none());
    }
}
