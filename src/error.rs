//! Error types for texture model construction, persistence and scoring.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LbpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid parameters: {reason}")]
    InvalidParameters { reason: String },

    #[error("Invalid model at line {line}: {reason}")]
    InvalidModel { line: usize, reason: String },

    #[error("Model and sample parameters differ: sample {sample}, reference {reference}")]
    ParameterMismatch { sample: String, reference: String },

    #[error("Sample contains no data")]
    EmptySample,

    #[error("Reference model contains no data")]
    EmptyReference,

    #[error("Image {width}x{height} has no interior pixels for radius {radius}")]
    ImageTooSmall {
        width: usize,
        height: usize,
        radius: usize,
    },

    #[error("No candidate models to classify against")]
    NoCandidates,

    #[error("Invalid config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

impl LbpError {
    pub(crate) fn invalid_parameters(reason: impl Into<String>) -> Self {
        LbpError::InvalidParameters {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_model(line: usize, reason: impl Into<String>) -> Self {
        LbpError::InvalidModel {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LbpError>;
