use crate::tracking::entry::TrackingEntry;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Number of leading non-record lines (column labels + separator).
const HEADER_LINES: usize = 2;
const SEPARATOR_WIDTH: usize = 125;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Outcome of an upsert; duplicate names are benign no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    AlreadyTracked,
}

#[derive(Debug, Clone, PartialEq)]
struct Record {
    entry: TrackingEntry,
    /// Verbatim line text, written back unchanged on save so an untouched
    /// ledger rewrites byte-identically.
    line: String,
}

/// In-memory tracking repository: parse, upsert, render.
///
/// Records stay sorted ascending by wall-time seconds (stable for ties),
/// with unknown times last. File handling lives in [`TrackingFile`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingLedger {
    records: Vec<Record>,
    /// Record lines that did not fit the schema.
    pub skipped_rows: usize,
}

impl TrackingLedger {
    pub fn parse(reader: &mut impl BufRead) -> Result<Self, TrackingError> {
        let mut records = Vec::new();
        let mut skipped_rows = 0usize;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if index < HEADER_LINES || line.trim().is_empty() {
                continue;
            }
            match TrackingEntry::parse_line(&line) {
                Some(entry) => records.push(Record { entry, line }),
                None => skipped_rows += 1,
            }
        }
        Ok(Self {
            records,
            skipped_rows,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &TrackingEntry> {
        self.records.iter().map(|r| &r.entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.entry.name == name)
    }

    /// Inserts `entry` unless its name is already tracked, then re-sorts the
    /// whole set ascending by wall time.
    pub fn upsert(&mut self, entry: TrackingEntry) -> Upsert {
        if self.contains(&entry.name) {
            return Upsert::AlreadyTracked;
        }
        let line = entry.to_line();
        self.records.push(Record { entry, line });
        self.records
            .sort_by(|a, b| a.entry.wall_time.cmp_by_seconds(&b.entry.wall_time));
        Upsert::Inserted
    }

    pub fn render(&self, writer: &mut impl Write) -> Result<(), TrackingError> {
        writeln!(
            writer,
            "{:<70} {:<10} {:<10} {:<10} {:<10} {:<15}",
            "Simulation", "Box X", "Box Y", "Box Z", "Atoms", "Simulation Time",
        )?;
        writeln!(writer, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        for record in &self.records {
            writeln!(writer, "{}", record.line)?;
        }
        Ok(())
    }

    pub fn render_to_string(&self) -> String {
        let mut out = Vec::new();
        self.render(&mut out)
            .expect("rendering to a Vec cannot fail");
        String::from_utf8(out).expect("ledger lines are UTF-8")
    }
}

/// On-disk ledger: whole-file load and rewrite, with the previous state
/// copied to a `_backup` sibling before every rewrite.
#[derive(Debug, Clone)]
pub struct TrackingFile {
    path: PathBuf,
    backup_path: PathBuf,
}

impl TrackingFile {
    pub fn new(path: PathBuf, backup_path: PathBuf) -> Self {
        Self { path, backup_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// An absent file loads as an empty ledger.
    pub fn load(&self) -> Result<TrackingLedger, TrackingError> {
        if !self.path.exists() {
            debug!("No tracking file at {}, starting empty", self.path.display());
            return Ok(TrackingLedger::default());
        }
        let mut reader = BufReader::new(File::open(&self.path)?);
        TrackingLedger::parse(&mut reader)
    }

    pub fn save(&self, ledger: &TrackingLedger) -> Result<(), TrackingError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        if self.path.exists() {
            fs::copy(&self.path, &self.backup_path)?;
            debug!("Backed up tracking file to {}", self.backup_path.display());
        }
        let mut writer = BufWriter::new(File::create(&self.path)?);
        ledger.render(&mut writer)?;
        writer.flush()?;
        info!("Tracking report rewritten: {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::structure::BoxDims;
    use crate::tracking::entry::WallTime;

    fn entry(name: &str, wall_time: WallTime) -> TrackingEntry {
        TrackingEntry {
            name: name.into(),
            box_dims: BoxDims {
                x: 10.0,
                y: 10.0,
                z: 40.0,
            },
            atoms: 1000,
            wall_time,
        }
    }

    #[test]
    fn upsert_sorts_ascending_by_wall_time() {
        let mut ledger = TrackingLedger::default();
        ledger.upsert(entry("slow", WallTime::parse("1:30").unwrap()));
        ledger.upsert(entry("fast", WallTime::parse("0:45").unwrap()));
        let names: Vec<&str> = ledger.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["fast", "slow"]);
    }

    #[test]
    fn unknown_wall_time_sorts_last() {
        let mut ledger = TrackingLedger::default();
        ledger.upsert(entry("pending", WallTime::Unknown));
        ledger.upsert(entry("slow", WallTime::Seconds(86400.0)));
        let names: Vec<&str> = ledger.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["slow", "pending"]);
    }

    #[test]
    fn duplicate_name_is_a_noop() {
        let mut ledger = TrackingLedger::default();
        assert_eq!(
            ledger.upsert(entry("run", WallTime::Seconds(10.0))),
            Upsert::Inserted
        );
        let before = ledger.render_to_string();
        assert_eq!(
            ledger.upsert(entry("run", WallTime::Seconds(99.0))),
            Upsert::AlreadyTracked
        );
        assert_eq!(ledger.render_to_string(), before);
    }

    #[test]
    fn parse_skips_header_and_keeps_raw_lines() {
        let mut ledger = TrackingLedger::default();
        ledger.upsert(entry("a_run", WallTime::Seconds(61.0)));
        ledger.upsert(entry("b_run", WallTime::Unknown));
        let rendered = ledger.render_to_string();

        let reparsed = TrackingLedger::parse(&mut rendered.as_bytes()).unwrap();
        assert_eq!(reparsed.len(), 2);
        assert_eq!(reparsed.skipped_rows, 0);
        // Round trip is byte-identical.
        assert_eq!(reparsed.render_to_string(), rendered);
    }

    #[test]
    fn malformed_record_lines_are_counted() {
        let text = "header\n-----\nonly three tokens\n";
        let ledger = TrackingLedger::parse(&mut text.as_bytes()).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.skipped_rows, 1);
    }

    #[test]
    fn hours_format_survives_rewrite_untouched() {
        // A hand-written H:MM:SS field must not be reformatted on rewrite.
        let line = format!(
            "{:<70} {:<10.2} {:<10.2} {:<10.2} {:<10} {:<15}",
            "old_run", 1.0, 2.0, 3.0, 10, "1:01:05",
        );
        let text = format!("header\n-----\n{line}\n");
        let ledger = TrackingLedger::parse(&mut text.as_bytes()).unwrap();
        assert!(ledger.render_to_string().contains("1:01:05"));
    }

    #[test]
    fn file_save_refreshes_backup() {
        let dir = tempfile::tempdir().unwrap();
        let file = TrackingFile::new(
            dir.path().join("tracking.txt"),
            dir.path().join("tracking_backup.txt"),
        );

        let mut ledger = file.load().unwrap();
        assert!(ledger.is_empty());
        ledger.upsert(entry("first", WallTime::Seconds(45.0)));
        file.save(&ledger).unwrap();
        assert!(!dir.path().join("tracking_backup.txt").exists());

        let first_state = fs::read_to_string(file.path()).unwrap();

        // Duplicate upsert: file stays byte-identical, backup is refreshed.
        let mut ledger = file.load().unwrap();
        assert_eq!(
            ledger.upsert(entry("first", WallTime::Seconds(45.0))),
            Upsert::AlreadyTracked
        );
        file.save(&ledger).unwrap();
        assert_eq!(fs::read_to_string(file.path()).unwrap(), first_state);
        assert_eq!(
            fs::read_to_string(dir.path().join("tracking_backup.txt")).unwrap(),
            first_state
        );
    }
}
