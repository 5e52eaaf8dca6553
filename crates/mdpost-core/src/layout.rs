//! File-naming conventions shared with the simulation workflow.
//!
//! Every path the utilities touch is derived here from two injected pieces
//! of state (the run folder and the data name, or the tracking directory),
//! so callers and tests never rebuild convention strings ad hoc.

use crate::core::models::structure::Axis;
use crate::tracking::store::TrackingFile;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Particle phase a profile file was averaged over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Polymer,
    Solvent,
}

impl Phase {
    pub const ALL: [Phase; 2] = [Phase::Polymer, Phase::Solvent];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Polymer => "polymer",
            Phase::Solvent => "solvent",
        }
    }
}

/// Conventional paths inside one simulation run directory.
#[derive(Debug, Clone)]
pub struct RunLayout {
    folder: PathBuf,
    dataname: String,
}

impl RunLayout {
    pub fn new(folder: impl Into<PathBuf>, dataname: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            dataname: dataname.into(),
        }
    }

    pub fn dataname(&self) -> &str {
        &self.dataname
    }

    pub fn thermo_log(&self) -> PathBuf {
        self.folder.join("log.lammps")
    }

    fn volume_data(&self) -> PathBuf {
        self.folder.join("output_files").join("volume_data")
    }

    fn stress_data(&self) -> PathBuf {
        self.folder.join("output_files").join("stress_data")
    }

    pub fn box_dimensions_file(&self) -> PathBuf {
        self.volume_data()
            .join(format!("box_dimensions_{}.dat", self.dataname))
    }

    pub fn gel_volume_bb_file(&self) -> PathBuf {
        self.volume_data()
            .join(format!("gel_volume_bb_{}.dat", self.dataname))
    }

    pub fn gel_volume_rg_file(&self) -> PathBuf {
        self.volume_data()
            .join(format!("gel_volume_rg_{}.dat", self.dataname))
    }

    pub fn stress_profile(&self, axis: Axis, phase: Phase) -> PathBuf {
        self.stress_data().join(format!(
            "stress_{}_{}_{}.dat",
            axis.label(),
            phase.label(),
            self.dataname
        ))
    }

    pub fn volume_profile(&self, axis: Axis, phase: Phase) -> PathBuf {
        self.volume_data().join(format!(
            "vol_{}_{}_{}.dat",
            axis.label(),
            phase.label(),
            self.dataname
        ))
    }

    pub fn has_stress_data(&self) -> bool {
        Axis::ALL.iter().any(|&axis| {
            Phase::ALL
                .iter()
                .any(|&phase| self.stress_profile(axis, phase).exists())
        })
    }

    pub fn has_volume_data(&self) -> bool {
        Axis::ALL.iter().any(|&axis| {
            Phase::ALL
                .iter()
                .any(|&phase| self.volume_profile(axis, phase).exists())
        })
    }

    pub fn convergence_plot(&self) -> PathBuf {
        self.folder
            .join("output_plots")
            .join("convergence_plots")
            .join(format!("{}_convergence.png", self.dataname))
    }

    pub fn stress_plot(&self) -> PathBuf {
        self.folder
            .join("output_plots")
            .join("stress_plots")
            .join(format!("{}_stress.png", self.dataname))
    }

    pub fn volfrac_plot(&self) -> PathBuf {
        self.folder
            .join("output_plots")
            .join("volfrac_plots")
            .join(format!("{}_volume.png", self.dataname))
    }

    /// Equilibration data file carrying the box bounds for profile plots.
    pub fn equil_data_file(&self) -> PathBuf {
        self.folder
            .join("data_files")
            .join(format!("equil_{}.data", self.dataname))
    }

    /// Structural data file for the tracking step, named after the base
    /// dataname (interaction parameters and step count stripped).
    pub fn data_file(&self, suffix: &str) -> PathBuf {
        self.folder
            .join("data_files")
            .join(format!("{}.data", base_data_name(&self.dataname, suffix)))
    }
}

/// Truncates a dataname at its first interaction-parameter segment (the
/// first `_`-separated part starting with `<digits>.<digits>`), then strips
/// an optional trailing suffix digit from the base.
pub fn base_data_name(dataname: &str, suffix: &str) -> String {
    static INTERACTION: OnceLock<Regex> = OnceLock::new();
    let re = INTERACTION.get_or_init(|| Regex::new(r"^\d+\.\d+").expect("static regex"));

    let mut base_parts = Vec::new();
    for part in dataname.split('_') {
        if re.is_match(part) {
            break;
        }
        base_parts.push(part);
    }
    let mut base = base_parts.join("_");
    if !suffix.is_empty() && base.ends_with(suffix) {
        base.truncate(base.len() - suffix.len());
    }
    base
}

/// Conventional paths inside the shared tracking directory.
#[derive(Debug, Clone)]
pub struct TrackingLayout {
    dir: PathBuf,
}

impl TrackingLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file(&self) -> PathBuf {
        self.dir.join("tracking.txt")
    }

    pub fn backup_file(&self) -> PathBuf {
        self.dir.join("tracking_backup.txt")
    }

    pub fn time_vs_atoms_plot(&self) -> PathBuf {
        self.dir.join("time_vs_atoms.png")
    }

    pub fn time_vs_timesteps_plot(&self) -> PathBuf {
        self.dir.join("time_vs_timesteps.png")
    }

    pub fn open(&self) -> TrackingFile {
        TrackingFile::new(self.file(), self.backup_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_paths_follow_conventions() {
        let layout = RunLayout::new("/runs/slab_1", "demo");
        assert_eq!(layout.thermo_log(), Path::new("/runs/slab_1/log.lammps"));
        assert_eq!(
            layout.stress_profile(Axis::X, Phase::Polymer),
            Path::new("/runs/slab_1/output_files/stress_data/stress_x_polymer_demo.dat")
        );
        assert_eq!(
            layout.volume_profile(Axis::Z, Phase::Solvent),
            Path::new("/runs/slab_1/output_files/volume_data/vol_z_solvent_demo.dat")
        );
        assert_eq!(
            layout.convergence_plot(),
            Path::new("/runs/slab_1/output_plots/convergence_plots/demo_convergence.png")
        );
        assert_eq!(
            layout.volfrac_plot(),
            Path::new("/runs/slab_1/output_plots/volfrac_plots/demo_volume.png")
        );
    }

    #[test]
    fn base_name_stops_at_interaction_segment() {
        let name = "slab_support_5beads_10x10x5_rho6_extra_padding43_1.5_1.4_20000";
        assert_eq!(
            base_data_name(name, ""),
            "slab_support_5beads_10x10x5_rho6_extra_padding43"
        );
    }

    #[test]
    fn base_name_strips_trailing_suffix() {
        let name = "slab_support_5beads_extra_padding431_1.5_1.4_20000";
        assert_eq!(
            base_data_name(name, "1"),
            "slab_support_5beads_extra_padding43"
        );
    }

    #[test]
    fn tracking_paths_follow_conventions() {
        let layout = TrackingLayout::new("/home/user/Documents/lammps_work");
        assert_eq!(
            layout.file(),
            Path::new("/home/user/Documents/lammps_work/tracking.txt")
        );
        assert_eq!(
            layout.backup_file(),
            Path::new("/home/user/Documents/lammps_work/tracking_backup.txt")
        );
    }
}
