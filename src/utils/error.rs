use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("position source returned HTTP {status}")]
    SourceUnavailable { status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {field}: {reason}")]
    ValidationError { field: String, reason: String },

    /// Nothing to do: zero inputs or zero emitted records at some stage.
    /// Non-fatal; callers log and exit cleanly instead of alerting.
    #[error("no data produced at {stage} stage")]
    EmptyResult { stage: &'static str },

    #[error("failed to write {path}: {source}")]
    SinkFailure {
        path: String,
        #[source]
        source: Box<EtlError>,
    },
}

impl EtlError {
    pub fn is_empty_result(&self) -> bool {
        matches!(self, EtlError::EmptyResult { .. })
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
