use thiserror::Error;

/// Engine-level error taxonomy.
///
/// Every operation validates before it mutates, so a returned error means the
/// observable state is unchanged. The `Display` output doubles as the
/// user-visible `detail` string at the API boundary.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    InvalidSelection(String),

    #[error("{0}")]
    InsufficientData(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
