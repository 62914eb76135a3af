//! Error types for the generation workflow.

use std::time::Duration;

/// Errors that can occur while generating or downloading a video.
#[derive(Debug, thiserror::Error)]
pub enum VidError {
    /// A request parameter failed local validation. Never reaches the network.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The service rejected the submission.
    #[error("submission rejected: {status} - {message}")]
    Submission { status: u16, message: String },

    /// Network-level failure at submit or poll time.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service reported the job as failed.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// The wait budget was exhausted before the job reached a terminal state.
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    /// Downloading the finished artifact failed.
    #[error("download failed: {0}")]
    Download(String),

    /// I/O error (e.g., writing the output file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VidError {
    /// Returns true if this error is transient and the poll loop may retry it.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Stable machine-readable label for this error kind.
    ///
    /// The CLI and the web layer key their user-facing reporting on this,
    /// so a validation mistake reads differently from a service-side failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Submission { .. } => "submission",
            Self::Transport(_) => "transport",
            Self::GenerationFailed(_) => "generation_failed",
            Self::Timeout(_) => "timeout",
            Self::Download(_) => "download",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}

/// Result type alias for workflow operations.
pub type Result<T> = std::result::Result<T, VidError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transient() {
        assert!(!VidError::Validation("bad duration".into()).is_transient());
        assert!(!VidError::GenerationFailed("nsfw".into()).is_transient());
        assert!(!VidError::Timeout(Duration::from_secs(300)).is_transient());
        assert!(!VidError::Download("403".into()).is_transient());
        assert!(
            !VidError::Submission {
                status: 400,
                message: "bad".into()
            }
            .is_transient()
        );
    }

    #[test]
    fn test_error_display() {
        let err = VidError::Submission {
            status: 422,
            message: "duration out of range".into(),
        };
        assert_eq!(
            err.to_string(),
            "submission rejected: 422 - duration out of range"
        );

        let err = VidError::GenerationFailed("content policy".into());
        assert_eq!(err.to_string(), "generation failed: content policy");
    }

    #[test]
    fn test_kind_labels_are_distinct() {
        let errors = [
            VidError::Validation("x".into()),
            VidError::Submission {
                status: 500,
                message: "x".into(),
            },
            VidError::GenerationFailed("x".into()),
            VidError::Timeout(Duration::from_secs(1)),
            VidError::Download("x".into()),
        ];
        let mut kinds: Vec<_> = errors.iter().map(|e| e.kind()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }
}
