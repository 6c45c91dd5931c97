//! Error handling for Triband
//!
//! The per-block processing path never returns errors. Everything here
//! belongs to the configuration layer, file I/O and the CLI.

use thiserror::Error;

/// Result type alias for Triband operations
pub type Result<T> = std::result::Result<T, TribandError>;

/// Main error type for Triband operations
#[derive(Error, Debug)]
pub enum TribandError {
    // Configuration Errors
    #[error("Invalid parameter '{param}': {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    #[error("Unknown parameter: {name}")]
    UnknownParameter { name: String },

    #[error("Invalid ratio choice: {value}")]
    InvalidRatio { value: String },

    #[error("Crossover order violated: low/mid {low_mid_hz} Hz must be below mid/high {mid_high_hz} Hz")]
    CrossoverOrder { low_mid_hz: f32, mid_high_hz: f32 },

    #[error("Unsupported channel layout: {channels} channels (mono or stereo only)")]
    UnsupportedLayout { channels: usize },

    // Audio Errors
    #[error("Invalid audio: {reason}")]
    InvalidAudio { reason: String },

    #[error("Processor used before prepare()")]
    NotPrepared,

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TribandError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            TribandError::InvalidParameter { .. } => "INVALID_PARAMETER",
            TribandError::UnknownParameter { .. } => "UNKNOWN_PARAMETER",
            TribandError::InvalidRatio { .. } => "INVALID_RATIO",
            TribandError::CrossoverOrder { .. } => "CROSSOVER_ORDER",
            TribandError::UnsupportedLayout { .. } => "UNSUPPORTED_LAYOUT",
            TribandError::InvalidAudio { .. } => "INVALID_AUDIO",
            TribandError::NotPrepared => "NOT_PREPARED",
            TribandError::Io(_) => "IO_ERROR",
            TribandError::Wav(_) => "WAV_ERROR",
            TribandError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable by fixing the input and retrying
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TribandError::InvalidParameter { .. }
                | TribandError::UnknownParameter { .. }
                | TribandError::InvalidRatio { .. }
                | TribandError::CrossoverOrder { .. }
                | TribandError::UnsupportedLayout { .. }
                | TribandError::InvalidAudio { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TribandError::InvalidParameter { .. } => vec![
                "Check the value against the range shown by 'triband-cli params'",
                "Use ControlSnapshot::clamp() to force values into range",
            ],
            TribandError::UnknownParameter { .. } => vec![
                "Parameter names are case sensitive, e.g. \"Threshold Low Band\"",
                "Run 'triband-cli params' to list every parameter",
            ],
            TribandError::InvalidRatio { .. } => vec![
                "Valid ratios: 1, 1.5, 2, 3, 4, 5, 6, 7, 8, 10, 15, 20, 50, 100",
            ],
            TribandError::CrossoverOrder { .. } => vec![
                "Keep the low/mid crossover between 20 and 999 Hz",
                "Keep the mid/high crossover between 1000 and 2000 Hz",
            ],
            TribandError::UnsupportedLayout { .. } => vec![
                "Convert the file to mono or stereo first",
            ],
            TribandError::InvalidAudio { .. } => vec![
                "Check if the file plays in another application",
                "Try re-exporting the file as 16, 24 or 32-bit WAV",
            ],
            TribandError::NotPrepared => vec![
                "Call MultibandProcessor::prepare() before process()",
            ],
            _ => vec![],
        }
    }
}
