//! Error types for the story suite and its runners.

use std::path::PathBuf;

use thiserror::Error;
use todomanager_client::ClientError;

#[derive(Debug, Error)]
pub enum StoryError {
    /// Talking to the Todo Manager failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Walking the feature directory failed.
    #[error("Failed to scan feature directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// The feature directory does not exist.
    #[error("Feature directory not found: {}", .0.display())]
    FeatureDirMissing(PathBuf),

    /// The feature directory holds no `.feature` files.
    #[error("No .feature files found in {}", .0.display())]
    NoFeatures(PathBuf),

    /// At least one randomized run had failing scenarios.
    #[error("Tests failed in runs: {runs:?}")]
    RunsFailed { runs: Vec<usize> },

    /// A single ordered pass had failing scenarios.
    #[error("Feature run failed: {0}")]
    FeaturesFailed(String),

    /// Invalid command-line or configuration input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, StoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_failed_display() {
        let err = StoryError::RunsFailed { runs: vec![2, 5] };
        assert_eq!(err.to_string(), "Tests failed in runs: [2, 5]");
    }

    #[test]
    fn test_client_error_is_transparent() {
        let err = StoryError::from(ClientError::UnsupportedMethod("PATCH".into()));
        assert_eq!(err.to_string(), "Unsupported HTTP method: PATCH");
    }

    #[test]
    fn test_no_features_display() {
        let err = StoryError::NoFeatures(PathBuf::from("features"));
        assert_eq!(err.to_string(), "No .feature files found in features");
    }
}
