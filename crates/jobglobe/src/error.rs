use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobGlobeError {
    #[error("Data error: {0}")]
    Data(#[from] jobglobe_data::DataError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Map is not mounted")]
    NotMounted,
    #[error("No marker with id {0}")]
    UnknownMarker(usize),
    #[error("Marker {marker} has no position at index {index}")]
    UnknownPosition { marker: usize, index: usize },
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, JobGlobeError>;
