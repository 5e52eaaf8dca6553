use mdpost::core::io::avetime::AveTimeError;
use mdpost::core::io::datafile::DataFileError;
use mdpost::core::io::series::SeriesError;
use mdpost::core::io::thermo::ThermoLogError;
use mdpost::tracking::store::TrackingError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    ThermoLog(#[from] ThermoLogError),

    #[error(transparent)]
    Profile(#[from] AveTimeError),

    #[error(transparent)]
    DataFile(#[from] DataFileError),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error(transparent)]
    Tracking(#[from] TrackingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
