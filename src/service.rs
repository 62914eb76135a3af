//! Seam between the workflow and the remote generation service.

use crate::error::Result;
use crate::types::{GenerationRequest, JobHandle, JobStatus};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Contract of the remote generation service, as seen by the workflow.
///
/// The production implementation is [`crate::client::RunwayClient`]; tests
/// substitute scripted doubles to exercise the polling policy without a
/// network.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Submits a generation request and returns the service-assigned handle.
    ///
    /// The request is assumed to be validated already; validation lives in
    /// the workflow so an invalid request never reaches an implementation.
    async fn submit(&self, request: &GenerationRequest) -> Result<JobHandle>;

    /// Queries the current status of a job. Stateless and idempotent.
    async fn poll_status(&self, handle: &JobHandle) -> Result<JobStatus>;

    /// Transfers the artifact at `url` to `dest`, returning the local path.
    async fn download_artifact(&self, url: &str, dest: &Path) -> Result<PathBuf>;
}
