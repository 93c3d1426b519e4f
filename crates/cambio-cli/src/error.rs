use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] cambio_core::ValidationError),

    #[error(transparent)]
    Convert(#[from] cambio_core::ConvertError),

    #[error(transparent)]
    Series(#[from] cambio_core::SeriesError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Store(#[from] cambio_store::StoreError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            // Invalid input is a usage error; exhausted resolution is not.
            Self::Convert(cambio_core::ConvertError::InvalidInput(_)) => 2,
            Self::Convert(_) => 3,
            Self::Series(cambio_core::SeriesError::InvalidDayCount(_)) => 2,
            Self::Series(_) => 3,
            Self::Serialization(_) => 4,
            Self::Store(_) => 7,
            Self::Io(_) => 10,
        }
    }
}
