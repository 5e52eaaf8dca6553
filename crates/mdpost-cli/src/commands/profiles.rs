use crate::cli::ProfilesArgs;
use crate::error::Result;
use mdpost::core::io::avetime::load_ave_time;
use mdpost::core::io::datafile::{DEFAULT_EXCLUDED_TYPES, load_data_file};
use mdpost::core::models::structure::Axis;
use mdpost::layout::{Phase, RunLayout};
use mdpost::render::profiles::{ProfileGrid, ProfileKind, render_profiles};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

pub fn run(args: ProfilesArgs) -> Result<()> {
    let layout = RunLayout::new(args.folder, args.dataname);

    let data_path = layout.equil_data_file();
    let Some(summary) = load_data_file(&data_path, DEFAULT_EXCLUDED_TYPES)? else {
        warn!(
            "Cannot determine box dimensions without {}, skipping profile plots",
            data_path.display()
        );
        return Ok(());
    };
    let box_dims = summary.box_dims;
    let title = format!("{} (original {} steps)", layout.dataname(), args.datasteps);

    if layout.has_stress_data() {
        let grid = load_grid(&layout, ProfileKind::Stress)?;
        let output = layout.stress_plot();
        if let Some(dir) = output.parent() {
            fs::create_dir_all(dir)?;
        }
        render_profiles(ProfileKind::Stress, &grid, &box_dims, &title, &output)?;
        println!("Stress profile saved to {}", output.display());
    } else {
        println!(
            "No stress data found for {}, skipping stress plots",
            layout.dataname()
        );
    }

    if layout.has_volume_data() {
        let grid = load_grid(&layout, ProfileKind::VolumeFraction)?;
        let title = format!(
            "{} Volume Fractions (original {} steps)",
            layout.dataname(),
            args.datasteps
        );
        let output = layout.volfrac_plot();
        if let Some(dir) = output.parent() {
            fs::create_dir_all(dir)?;
        }
        render_profiles(
            ProfileKind::VolumeFraction,
            &grid,
            &box_dims,
            &title,
            &output,
        )?;
        println!("Volume fraction profile saved to {}", output.display());
    } else {
        println!(
            "No volume data found for {}, skipping volume fraction plots",
            layout.dataname()
        );
    }

    Ok(())
}

fn load_grid(layout: &RunLayout, kind: ProfileKind) -> Result<ProfileGrid> {
    let mut grid = ProfileGrid::default();
    for &phase in &Phase::ALL {
        let profiles = match phase {
            Phase::Polymer => &mut grid.polymer,
            Phase::Solvent => &mut grid.solvent,
        };
        for &axis in &Axis::ALL {
            let path = profile_path(layout, kind, axis, phase);
            if let Some(parsed) = load_ave_time(&path)? {
                if parsed.skipped_rows > 0 {
                    debug!(
                        "{} malformed profile rows skipped in {}",
                        parsed.skipped_rows,
                        path.display()
                    );
                }
                profiles.set(axis, parsed.blocks);
            }
        }
    }
    Ok(grid)
}

fn profile_path(layout: &RunLayout, kind: ProfileKind, axis: Axis, phase: Phase) -> PathBuf {
    match kind {
        ProfileKind::Stress => layout.stress_profile(axis, phase),
        ProfileKind::VolumeFraction => layout.volume_profile(axis, phase),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const DATA_FILE: &str = "\
LAMMPS data file

100 atoms

0.0 10.0 xlo xhi
0.0 10.0 ylo yhi
0.0 40.0 zlo zhi

Atoms

1 1 1 0.0 0.0 0.0
2 1 4 0.0 0.0 0.0
";

    fn write_run(folder: &Path, with_stress: bool) {
        let data_dir = folder.join("data_files");
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join("equil_demo.data"), DATA_FILE).unwrap();

        if with_stress {
            let stress_dir = folder.join("output_files/stress_data");
            fs::create_dir_all(&stress_dir).unwrap();
            let mut body = String::from("# stress profile\n");
            for t in 1..=3 {
                body.push_str(&format!("{} 4\n1 0.1\n2 0.2\n3 0.3\n4 0.4\n", t * 1000));
            }
            for axis in ["x", "y", "z"] {
                for phase in ["polymer", "solvent"] {
                    fs::write(
                        stress_dir.join(format!("stress_{axis}_{phase}_demo.dat")),
                        &body,
                    )
                    .unwrap();
                }
            }
        }
    }

    fn args(folder: &Path) -> ProfilesArgs {
        ProfilesArgs {
            folder: folder.to_path_buf(),
            dataname: "demo".into(),
            datasteps: "40000".into(),
        }
    }

    #[test]
    fn renders_stress_grid_for_synthetic_run() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), true);

        run(args(dir.path())).unwrap();

        assert!(
            dir.path()
                .join("output_plots/stress_plots/demo_stress.png")
                .exists()
        );
        // No volume files were written, so no volume-fraction figure either.
        assert!(!dir.path().join("output_plots/volfrac_plots").exists());
    }

    #[test]
    fn missing_data_file_skips_everything() {
        let dir = tempfile::tempdir().unwrap();
        run(args(dir.path())).unwrap();
        assert!(!dir.path().join("output_plots").exists());
    }
}
