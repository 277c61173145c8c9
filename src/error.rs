//! Error types for the iridoscan library

use thiserror::Error;

use crate::quality::QualityMetrics;
use crate::EyeSide;

/// Result type alias for iridoscan operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Every way a capture can fail to produce an analysis.
///
/// All capture-driven kinds are recoverable by taking another photo; none of
/// them is fatal to the hosting process.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Encoded frame could not be decoded into a pixel grid
    #[error("Failed to decode frame: {message}")]
    DecodeFailure {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The detector found no eye in the frame
    #[error("No eye detected in frame")]
    NoDetection,

    /// Both eyes were required but only one was found
    #[error("Both eyes required, only the {detected} eye was detected")]
    PartialDetection { detected: EyeSide },

    /// The padded iris crop does not fit inside the frame
    #[error(
        "Iris crop [{}, {}, {}x{}] exceeds frame bounds {}x{}",
        crop[0], crop[1], crop[2], crop[3], frame[0], frame[1]
    )]
    OutOfBoundsCrop {
        /// Requested crop as [x, y, width, height] in frame pixels
        crop: [i64; 4],
        /// Frame size as [width, height]
        frame: [u32; 2],
    },

    /// Frame failed the quality gate
    #[error("Capture quality too low (overall {:.2}): {feedback}", metrics.overall)]
    LowQuality {
        metrics: Box<QualityMetrics>,
        feedback: String,
    },

    /// A newer capture superseded this one before analysis finished
    #[error("Analysis cancelled by a newer capture")]
    Cancelled,

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Generic processing error
    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

impl AnalysisError {
    /// Create a decode failure with context
    pub fn decode<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::DecodeFailure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    /// Check if this error can be resolved by recapturing the frame
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::DecodeFailure { .. }
                | AnalysisError::NoDetection
                | AnalysisError::PartialDetection { .. }
                | AnalysisError::OutOfBoundsCrop { .. }
                | AnalysisError::LowQuality { .. }
                | AnalysisError::Cancelled
        )
    }

    /// Get user-friendly guidance for the capture screen
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::DecodeFailure { .. } => {
                "Could not read the photo. Please take another picture.".to_string()
            }
            AnalysisError::NoDetection => {
                "No eye detected. Make sure your eye is open and visible to the camera."
                    .to_string()
            }
            AnalysisError::PartialDetection { .. } => {
                "Both eyes must be visible. Face the camera directly.".to_string()
            }
            AnalysisError::OutOfBoundsCrop { .. } => {
                "Your eye is too close to the edge of the frame. Center your eye and try again."
                    .to_string()
            }
            AnalysisError::LowQuality { feedback, .. } => feedback.clone(),
            AnalysisError::Cancelled => "Analysis restarted for the newest photo.".to_string(),
            _ => "Iris analysis failed. Please try again with a different photo.".to_string(),
        }
    }
}
