//! Error types for geostat services.

use thiserror::Error;

/// Result type alias using GeostatError.
pub type GeostatResult<T> = Result<T, GeostatError>;

/// Primary error type for statistic and sampling operations.
#[derive(Debug, Error)]
pub enum GeostatError {
    // === Input Validation Errors ===
    #[error("Wrong timestamp format '{value}'. Required format is: YYYY-MM-DDTHH:MM:SS for example 2001-03-16T12:30:15")]
    InvalidTimestamp { value: String },

    #[error("Empty coordinate list")]
    EmptyPointList,

    #[error("Wrong number of coordinate entries at point {index}: expected [id, x, y], found {len} fields")]
    MalformedPoint { index: usize, len: usize },

    #[error("Missing request input: {0}")]
    MissingInput(String),

    #[error("Invalid GeoJSON input: {0}")]
    InvalidGeoJson(String),

    // === Domain Errors ===
    #[error("No raster maps found for timestamp: {timestamp}")]
    NoRasterForTimestamp { timestamp: String },

    // === Chain Execution Errors ===
    #[error("Stage '{stage}' failed with return code {code}: {stderr}")]
    StageFailed {
        stage: String,
        code: i32,
        stderr: String,
    },

    #[error("Processing engine error: {0}")]
    Engine(String),

    #[error("Job timed out")]
    Timeout,

    // === Output Errors ===
    #[error("Malformed module output: {0}")]
    MalformedOutput(String),

    // === Infrastructure Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GeostatError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            GeostatError::InvalidTimestamp { .. }
            | GeostatError::EmptyPointList
            | GeostatError::MalformedPoint { .. }
            | GeostatError::MissingInput(_)
            | GeostatError::InvalidGeoJson(_)
            | GeostatError::NoRasterForTimestamp { .. }
            | GeostatError::StageFailed { .. } => 400,

            GeostatError::Timeout => 504,

            _ => 500,
        }
    }

    /// Whether the request can be corrected by the caller.
    pub fn is_client_error(&self) -> bool {
        self.http_status_code() < 500
    }
}

// Conversion from common error types
impl From<std::io::Error> for GeostatError {
    fn from(err: std::io::Error) -> Self {
        GeostatError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for GeostatError {
    fn from(err: serde_json::Error) -> Self {
        GeostatError::Internal(format!("JSON error: {}", err))
    }
}
