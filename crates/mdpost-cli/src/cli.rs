use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "mdpost contributors",
    version,
    about = "mdpost - post-processing utilities for LAMMPS simulation output: convergence plots, spatial profile plots, and a run-tracking report.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Directory holding the shared tracking report.
    /// Defaults to ~/Documents/lammps_work.
    #[arg(long, global = true, value_name = "DIR")]
    pub tracking_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plot thermo convergence (temperature, pressure, volumes) for one run.
    Convergence(ConvergenceArgs),
    /// Plot stress and volume-fraction profiles for one run.
    Profiles(ProfilesArgs),
    /// Record a finished run in the tracking report and refresh the
    /// performance figures.
    Track(TrackArgs),
}

/// Arguments for the `convergence` subcommand.
#[derive(Args, Debug)]
pub struct ConvergenceArgs {
    /// Simulation run directory holding log.lammps and output_files/.
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Data name used in the run's file-naming convention.
    #[arg(value_name = "DATANAME")]
    pub dataname: String,
}

/// Arguments for the `profiles` subcommand.
#[derive(Args, Debug)]
pub struct ProfilesArgs {
    /// Simulation run directory holding output_files/ and data_files/.
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Data name used in the run's file-naming convention.
    #[arg(value_name = "DATANAME")]
    pub dataname: String,

    /// Step count of the original run, shown in the figure title.
    #[arg(value_name = "DATASTEPS", default_value = "N/A")]
    pub datasteps: String,
}

/// Arguments for the `track` subcommand.
#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Simulation run directory holding log.lammps and data_files/.
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Data name used in the run's file-naming convention.
    #[arg(value_name = "DATANAME")]
    pub dataname: String,

    /// Trailing iteration digit to strip when deriving the data-file name.
    #[arg(value_name = "SUFFIX", default_value = "")]
    pub suffix: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn missing_positional_arguments_are_an_error() {
        assert!(Cli::try_parse_from(["mdpost", "convergence"]).is_err());
        assert!(Cli::try_parse_from(["mdpost", "profiles", "/runs/a"]).is_err());
    }

    #[test]
    fn positional_arguments_parse() {
        let cli = Cli::try_parse_from(["mdpost", "track", "/runs/a", "slab_run", "1"]).unwrap();
        match cli.command {
            Commands::Track(args) => {
                assert_eq!(args.folder, PathBuf::from("/runs/a"));
                assert_eq!(args.dataname, "slab_run");
                assert_eq!(args.suffix, "1");
            }
            _ => panic!("expected track subcommand"),
        }
    }

    #[test]
    fn datasteps_defaults_to_sentinel() {
        let cli = Cli::try_parse_from(["mdpost", "profiles", "/runs/a", "slab_run"]).unwrap();
        match cli.command {
            Commands::Profiles(args) => assert_eq!(args.datasteps, "N/A"),
            _ => panic!("expected profiles subcommand"),
        }
    }
}
