use crate::cli::TrackArgs;
use crate::error::Result;
use directories::UserDirs;
use mdpost::core::io::datafile::{DEFAULT_EXCLUDED_TYPES, load_data_file};
use mdpost::core::io::thermo::load_wall_time;
use mdpost::layout::{RunLayout, TrackingLayout};
use mdpost::render::performance::{render_time_vs_atoms, render_time_vs_timesteps};
use mdpost::tracking::entry::{TrackingEntry, WallTime};
use mdpost::tracking::store::Upsert;
use std::path::PathBuf;
use tracing::{info, warn};

pub fn run(args: TrackArgs, tracking_dir: Option<PathBuf>) -> Result<()> {
    let layout = RunLayout::new(args.folder, args.dataname);

    let data_path = layout.data_file(&args.suffix);
    let Some(summary) = load_data_file(&data_path, DEFAULT_EXCLUDED_TYPES)? else {
        warn!(
            "Data file not found: {}, not recording this run",
            data_path.display()
        );
        return Ok(());
    };
    println!("Mobile atoms: {}", summary.mobile_atoms());

    let wall_time = WallTime::from_seconds(load_wall_time(&layout.thermo_log())?);
    if wall_time == WallTime::Unknown {
        info!("No loop time in the thermo log, recording wall time as N/A");
    }

    let entry = TrackingEntry {
        name: layout.dataname().to_owned(),
        box_dims: summary.box_dims,
        atoms: summary.mobile_atoms(),
        wall_time,
    };

    let tracking = TrackingLayout::new(tracking_dir.unwrap_or_else(default_tracking_dir));
    let file = tracking.open();
    let mut ledger = file.load()?;
    if ledger.skipped_rows > 0 {
        warn!(
            "{} malformed records skipped in {}",
            ledger.skipped_rows,
            file.path().display()
        );
    }

    if ledger.upsert(entry) == Upsert::AlreadyTracked {
        println!(
            "Entry '{}' already exists in tracking file, skipping.",
            layout.dataname()
        );
    }
    // Rewrite even on a duplicate so the backup copy is refreshed.
    file.save(&ledger)?;
    println!("Tracking info written to {}", file.path().display());

    let entries: Vec<TrackingEntry> = ledger.entries().cloned().collect();
    let atoms_plot = tracking.time_vs_atoms_plot();
    render_time_vs_atoms(&entries, &atoms_plot)?;
    println!("Saved {}", atoms_plot.display());
    let steps_plot = tracking.time_vs_timesteps_plot();
    render_time_vs_timesteps(&entries, &steps_plot)?;
    println!("Saved {}", steps_plot.display());

    Ok(())
}

fn default_tracking_dir() -> PathBuf {
    match UserDirs::new() {
        Some(dirs) => dirs.home_dir().join("Documents").join("lammps_work"),
        None => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const DATANAME: &str = "slab_5beads_extra_padding31_1.5_1.4_1000";

    const DATA_FILE: &str = "\
LAMMPS data file

100 atoms

0.0 10.0 xlo xhi
0.0 10.0 ylo yhi
0.0 40.0 zlo zhi

Atoms

1 1 1 0.0 0.0 0.0
2 1 4 0.0 0.0 0.0
3 1 5 0.0 0.0 0.0
";

    fn write_run(folder: &Path) {
        let data_dir = folder.join("data_files");
        fs::create_dir_all(&data_dir).unwrap();
        // Base name: dataname truncated at the first interaction segment.
        fs::write(
            data_dir.join("slab_5beads_extra_padding31.data"),
            DATA_FILE,
        )
        .unwrap();
        fs::write(
            folder.join("log.lammps"),
            "Step Temp\n0 1.0\nLoop time of 45.0 on 4 procs\n",
        )
        .unwrap();
    }

    fn args(folder: &Path) -> TrackArgs {
        TrackArgs {
            folder: folder.to_path_buf(),
            dataname: DATANAME.into(),
            suffix: String::new(),
        }
    }

    #[test]
    fn records_run_and_renders_performance_figures() {
        let run_dir = tempfile::tempdir().unwrap();
        let work_dir = tempfile::tempdir().unwrap();
        write_run(run_dir.path());

        run(args(run_dir.path()), Some(work_dir.path().to_path_buf())).unwrap();

        let report = fs::read_to_string(work_dir.path().join("tracking.txt")).unwrap();
        assert!(report.contains(DATANAME));
        // 100 atoms minus one support and one piston particle.
        assert!(report.contains("98"));
        assert!(report.contains("0:45"));
        assert!(work_dir.path().join("time_vs_atoms.png").exists());
        assert!(work_dir.path().join("time_vs_timesteps.png").exists());
    }

    #[test]
    fn rerun_is_idempotent_and_refreshes_backup() {
        let run_dir = tempfile::tempdir().unwrap();
        let work_dir = tempfile::tempdir().unwrap();
        write_run(run_dir.path());

        run(args(run_dir.path()), Some(work_dir.path().to_path_buf())).unwrap();
        let first = fs::read_to_string(work_dir.path().join("tracking.txt")).unwrap();

        run(args(run_dir.path()), Some(work_dir.path().to_path_buf())).unwrap();
        let second = fs::read_to_string(work_dir.path().join("tracking.txt")).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            fs::read_to_string(work_dir.path().join("tracking_backup.txt")).unwrap(),
            first
        );
    }

    #[test]
    fn missing_data_file_records_nothing() {
        let run_dir = tempfile::tempdir().unwrap();
        let work_dir = tempfile::tempdir().unwrap();

        run(args(run_dir.path()), Some(work_dir.path().to_path_buf())).unwrap();
        assert!(!work_dir.path().join("tracking.txt").exists());
    }
}
