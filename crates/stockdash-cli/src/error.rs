use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
///
/// Exit code 3 is reserved for a snapshot that completed with fetch errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("the dashboard needs an interactive terminal; try `stockdash snapshot`")]
    NotATerminal,

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::NotATerminal => 2,
            Self::Serialization(_) => 4,
            Self::Logging(_) => 6,
            Self::Io(_) => 10,
        }
    }
}
