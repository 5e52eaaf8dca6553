use crate::cli::ConvergenceArgs;
use crate::error::Result;
use mdpost::core::io::series::{
    load_box_volume_series, load_scalar_series, load_stepped_series,
};
use mdpost::core::io::thermo::load_thermo_log;
use mdpost::layout::RunLayout;
use mdpost::render::convergence::{ConvergenceData, render_convergence};
use std::fs;
use tracing::{debug, warn};

pub fn run(args: ConvergenceArgs) -> Result<()> {
    let layout = RunLayout::new(args.folder, args.dataname);
    let log_path = layout.thermo_log();

    let Some(parsed) = load_thermo_log(&log_path)? else {
        println!("No thermo data found in {}", log_path.display());
        return Ok(());
    };
    if parsed.table.is_empty() {
        // A log without a Step block is a no-data condition, not a failure.
        warn!("No thermo table in {}", log_path.display());
        println!("No thermo data found in {}", log_path.display());
        return Ok(());
    }
    if parsed.skipped_rows > 0 {
        debug!(
            "{} malformed thermo rows skipped in {}",
            parsed.skipped_rows,
            log_path.display()
        );
    }

    let data = ConvergenceData {
        table: parsed.table,
        box_volume: load_box_volume_series(&layout.box_dimensions_file())?,
        gel_bounding_box: load_scalar_series(&layout.gel_volume_bb_file())?,
        gel_gyration: load_stepped_series(&layout.gel_volume_rg_file())?,
    };

    let output = layout.convergence_plot();
    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir)?;
    }
    render_convergence(&data, layout.dataname(), &output)?;
    println!("Plot saved to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_log(folder: &std::path::Path) {
        let mut log = String::from("Step Temp Press\n");
        for i in 0..50 {
            log.push_str(&format!("{} {} 0.5\n", i * 100, 1.0 + i as f64 * 0.01));
        }
        log.push_str("Loop time of 12.5 on 4 procs\n");
        fs::write(folder.join("log.lammps"), log).unwrap();
    }

    #[test]
    fn renders_convergence_plot_for_synthetic_run() {
        let dir = tempfile::tempdir().unwrap();
        write_log(dir.path());

        run(ConvergenceArgs {
            folder: dir.path().to_path_buf(),
            dataname: "demo".into(),
        })
        .unwrap();

        assert!(
            dir.path()
                .join("output_plots/convergence_plots/demo_convergence.png")
                .exists()
        );
    }

    #[test]
    fn missing_log_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        run(ConvergenceArgs {
            folder: dir.path().to_path_buf(),
            dataname: "demo".into(),
        })
        .unwrap();
        assert!(!dir.path().join("output_plots").exists());
    }

    #[test]
    fn log_without_thermo_block_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("log.lammps"), "units lj\nrun 0\n").unwrap();
        run(ConvergenceArgs {
            folder: dir.path().to_path_buf(),
            dataname: "demo".into(),
        })
        .unwrap();
        assert!(!dir.path().join("output_plots").exists());
    }
}
