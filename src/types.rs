//! Core types for the generation workflow.

use crate::config::Limits;
use crate::error::{Result, VidError};
use serde::{Deserialize, Serialize};

/// A request to generate a video from a text prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The text prompt describing the desired video.
    pub prompt: String,
    /// Video duration in seconds.
    pub duration_secs: u32,
    /// Resolution as a "WxH" string (e.g., "1280x768").
    pub resolution: String,
    /// Amount of motion, 0.0 to 1.0.
    pub motion_strength: f32,
    /// Seed for reproducibility. Zero or absent means "no seed".
    pub seed: Option<u64>,
}

impl GenerationRequest {
    /// Creates a request with the given prompt and the service defaults.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            duration_secs: 4,
            resolution: "1280x768".into(),
            motion_strength: 0.8,
            seed: None,
        }
    }

    /// Sets the video duration in seconds.
    pub fn with_duration(mut self, secs: u32) -> Self {
        self.duration_secs = secs;
        self
    }

    /// Sets the resolution ("WxH").
    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = resolution.into();
        self
    }

    /// Sets the motion strength.
    pub fn with_motion_strength(mut self, strength: f32) -> Self {
        self.motion_strength = strength;
        self
    }

    /// Sets the generation seed. A zero seed is treated as unset.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates all bounded fields against the configured limits.
    ///
    /// An invalid request is rejected here, before any network call.
    pub fn validate(&self, limits: &Limits) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(VidError::Validation("prompt must not be empty".into()));
        }
        if !limits.duration_secs.contains(&self.duration_secs) {
            return Err(VidError::Validation(format!(
                "duration {}s outside allowed range {}..={}s",
                self.duration_secs,
                limits.duration_secs.start(),
                limits.duration_secs.end()
            )));
        }
        if !limits
            .supported_resolutions
            .iter()
            .any(|r| r == &self.resolution)
        {
            return Err(VidError::Validation(format!(
                "unsupported resolution {} (supported: {})",
                self.resolution,
                limits.supported_resolutions.join(", ")
            )));
        }
        if !limits.motion_strength.contains(&self.motion_strength) {
            return Err(VidError::Validation(format!(
                "motion strength {} outside [{}, {}]",
                self.motion_strength,
                limits.motion_strength.start(),
                limits.motion_strength.end()
            )));
        }
        Ok(())
    }
}

/// Opaque identifier for a submitted job, assigned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle(String);

impl JobHandle {
    /// Wraps a service-assigned job identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Current state of a generation job, as reported by the service.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    /// Waiting in the service's queue.
    Queued,
    /// Generation in progress.
    Processing,
    /// Finished; the artifact is available at the given URL.
    Completed {
        /// Remote location of the generated video.
        video_url: String,
    },
    /// The service gave up on the job.
    Failed {
        /// Error text reported by the service.
        error: String,
    },
    /// A status string this client does not recognize. Treated as transient.
    Unknown(String),
}

impl JobStatus {
    /// Returns true for `Completed` and `Failed` — no further polling
    /// changes the outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Processing => write!(f, "processing"),
            Self::Completed { .. } => write!(f, "completed"),
            Self::Failed { .. } => write!(f, "failed"),
            Self::Unknown(s) => write!(f, "unknown({s})"),
        }
    }
}

// Wire types

/// Submission payload sent to the generation endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct SubmitPayload {
    pub text_prompt: String,
    pub duration: u32,
    pub resolution: String,
    pub motion_strength: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SubmitPayload {
    pub fn from_request(req: &GenerationRequest) -> Self {
        Self {
            text_prompt: req.prompt.clone(),
            duration: req.duration_secs,
            resolution: req.resolution.clone(),
            motion_strength: req.motion_strength,
            // A zero seed means "no seed"; only positive seeds go on the wire.
            seed: req.seed.filter(|&s| s > 0),
        }
    }
}

/// Submission response. A missing `id` is a submission failure.
#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponse {
    pub id: Option<String>,
}

/// Status response from the task endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    #[serde(default)]
    pub status: String,
    pub video_url: Option<String>,
    pub error: Option<String>,
}

impl StatusResponse {
    /// Maps the wire payload onto the closed status set.
    ///
    /// A "completed" report without a `video_url` is unusable, so it is
    /// surfaced as a failure rather than retried forever.
    pub fn into_status(self) -> JobStatus {
        match self.status.as_str() {
            "queued" => JobStatus::Queued,
            "processing" => JobStatus::Processing,
            "completed" => match self.video_url {
                Some(video_url) => JobStatus::Completed { video_url },
                None => JobStatus::Failed {
                    error: "service reported completion without a video URL".into(),
                },
            },
            "failed" => JobStatus::Failed {
                error: self.error.unwrap_or_else(|| "unknown error".into()),
            },
            other => JobStatus::Unknown(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> Limits {
        Limits::default()
    }

    #[test]
    fn test_valid_request() {
        let req = GenerationRequest::new("A calm lake at sunrise")
            .with_duration(4)
            .with_resolution("1280x768")
            .with_motion_strength(0.8);
        assert!(req.validate(&limits()).is_ok());
    }

    #[test]
    fn test_empty_prompt_rejected() {
        let req = GenerationRequest::new("   ");
        assert!(matches!(
            req.validate(&limits()),
            Err(VidError::Validation(_))
        ));
    }

    #[test]
    fn test_duration_bounds() {
        let req = GenerationRequest::new("A cat").with_duration(0);
        assert!(req.validate(&limits()).is_err());
        let req = GenerationRequest::new("A cat").with_duration(11);
        assert!(req.validate(&limits()).is_err());
        let req = GenerationRequest::new("A cat").with_duration(10);
        assert!(req.validate(&limits()).is_ok());
    }

    #[test]
    fn test_unsupported_resolution_rejected() {
        let req = GenerationRequest::new("A cat").with_resolution("640x480");
        assert!(req.validate(&limits()).is_err());
    }

    #[test]
    fn test_motion_strength_bounds() {
        let req = GenerationRequest::new("A cat").with_motion_strength(1.01);
        assert!(req.validate(&limits()).is_err());
        let req = GenerationRequest::new("A cat").with_motion_strength(-0.1);
        assert!(req.validate(&limits()).is_err());
        let req = GenerationRequest::new("A cat").with_motion_strength(1.0);
        assert!(req.validate(&limits()).is_ok());
    }

    #[test]
    fn test_payload_omits_zero_seed() {
        let req = GenerationRequest::new("A cat").with_seed(0);
        let payload = SubmitPayload::from_request(&req);
        assert!(payload.seed.is_none());
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("seed").is_none());
    }

    #[test]
    fn test_payload_includes_positive_seed() {
        let req = GenerationRequest::new("A cat").with_seed(42);
        let payload = SubmitPayload::from_request(&req);
        assert_eq!(payload.seed, Some(42));
    }

    #[test]
    fn test_payload_field_names() {
        let req = GenerationRequest::new("A calm lake at sunrise");
        let json = serde_json::to_value(SubmitPayload::from_request(&req)).unwrap();
        assert_eq!(json["text_prompt"], "A calm lake at sunrise");
        assert_eq!(json["duration"], 4);
        assert_eq!(json["resolution"], "1280x768");
    }

    #[test]
    fn test_status_mapping() {
        let resp: StatusResponse = serde_json::from_str(r#"{"status": "queued"}"#).unwrap();
        assert_eq!(resp.into_status(), JobStatus::Queued);

        let resp: StatusResponse =
            serde_json::from_str(r#"{"status": "completed", "video_url": "https://x/y.mp4"}"#)
                .unwrap();
        assert_eq!(
            resp.into_status(),
            JobStatus::Completed {
                video_url: "https://x/y.mp4".into()
            }
        );

        let resp: StatusResponse =
            serde_json::from_str(r#"{"status": "failed", "error": "moderation"}"#).unwrap();
        assert_eq!(
            resp.into_status(),
            JobStatus::Failed {
                error: "moderation".into()
            }
        );

        let resp: StatusResponse = serde_json::from_str(r#"{"status": "warming_up"}"#).unwrap();
        assert_eq!(resp.into_status(), JobStatus::Unknown("warming_up".into()));
    }

    #[test]
    fn test_completed_without_url_is_a_failure() {
        let resp: StatusResponse = serde_json::from_str(r#"{"status": "completed"}"#).unwrap();
        assert!(matches!(resp.into_status(), JobStatus::Failed { .. }));
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobStatus::Completed {
            video_url: "u".into()
        }
        .is_terminal());
        assert!(JobStatus::Failed { error: "e".into() }.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(!JobStatus::Unknown("warming_up".into()).is_terminal());
    }
}
