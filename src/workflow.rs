//! Submit → poll-until-terminal → download orchestration.

use crate::config::Limits;
use crate::error::{Result, VidError};
use crate::service::GenerationService;
use crate::types::{GenerationRequest, JobHandle, JobStatus};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;

/// Nominal wait between polls while the job is queued or processing.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Shorter wait after a transient poll error or an unrecognized status.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Outcome of a full generation run: the job, where its artifact came
/// from, and where it landed locally.
#[derive(Debug, Clone)]
pub struct CompletedJob {
    /// Handle of the finished job.
    pub handle: JobHandle,
    /// Remote location the artifact was fetched from.
    pub video_url: String,
    /// Local path of the downloaded video.
    pub path: PathBuf,
}

/// Drives a single generation job from submission to a downloaded file.
///
/// Each invocation is independent: no state is shared between jobs beyond
/// the service connection itself. Cancellation is time-budget based; the
/// methods are plain futures, so a caller needing an external cancel signal
/// can additionally `select!` against one.
pub struct GenerationWorkflow<S> {
    service: S,
    limits: Limits,
    max_wait: Duration,
    poll_interval: Duration,
    retry_interval: Duration,
}

impl<S: GenerationService> GenerationWorkflow<S> {
    /// Creates a workflow over the given service.
    ///
    /// `max_wait` is the overall budget for [`Self::await_completion`] when
    /// driven through [`Self::run`].
    pub fn new(service: S, limits: Limits, max_wait: Duration) -> Self {
        Self {
            service,
            limits,
            max_wait,
            poll_interval: POLL_INTERVAL,
            retry_interval: RETRY_INTERVAL,
        }
    }

    /// Overrides the nominal poll interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Overrides the transient-retry interval.
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Validates the request locally, then submits it.
    ///
    /// An invalid request is rejected with [`VidError::Validation`] before
    /// any network call is made.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<JobHandle> {
        request.validate(&self.limits)?;
        let handle = self.service.submit(request).await?;
        tracing::info!(job = %handle, "submitted generation request");
        Ok(handle)
    }

    /// Queries the current status of a job once.
    pub async fn poll_status(&self, handle: &JobHandle) -> Result<JobStatus> {
        self.service.poll_status(handle).await
    }

    /// Polls until the job reaches a terminal state or `max_wait` elapses.
    ///
    /// - `Completed` returns immediately with the artifact location.
    /// - `Failed` aborts with [`VidError::GenerationFailed`], no retry.
    /// - `Queued`/`Processing` wait the nominal interval and poll again.
    /// - Unrecognized statuses and transient transport errors wait the
    ///   shorter retry interval and poll again; both count against the
    ///   overall budget, so the loop always terminates.
    pub async fn await_completion(
        &self,
        handle: &JobHandle,
        max_wait: Duration,
    ) -> Result<JobStatus> {
        let start = Instant::now();

        loop {
            if start.elapsed() >= max_wait {
                return Err(VidError::Timeout(max_wait));
            }

            match self.service.poll_status(handle).await {
                Ok(status @ JobStatus::Completed { .. }) => {
                    tracing::info!(job = %handle, "generation complete");
                    return Ok(status);
                }
                Ok(JobStatus::Failed { error }) => {
                    return Err(VidError::GenerationFailed(error));
                }
                Ok(status @ (JobStatus::Queued | JobStatus::Processing)) => {
                    tracing::debug!(
                        job = %handle,
                        status = %status,
                        elapsed_secs = start.elapsed().as_secs(),
                        "job not finished, waiting"
                    );
                    tokio::time::sleep(self.poll_interval).await;
                }
                Ok(JobStatus::Unknown(status)) => {
                    tracing::warn!(job = %handle, status = %status, "unrecognized status, retrying");
                    tokio::time::sleep(self.retry_interval).await;
                }
                Err(e) if e.is_transient() => {
                    tracing::warn!(job = %handle, error = %e, "poll failed, retrying");
                    tokio::time::sleep(self.retry_interval).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Transfers the finished artifact to `dest`.
    pub async fn download_artifact(&self, url: &str, dest: &Path) -> Result<PathBuf> {
        let path = self.service.download_artifact(url, dest).await?;
        tracing::info!(path = %path.display(), "artifact downloaded");
        Ok(path)
    }

    /// Runs the whole workflow: submit, wait for completion within the
    /// configured budget, download to `dest`.
    pub async fn run(&self, request: &GenerationRequest, dest: &Path) -> Result<CompletedJob> {
        let handle = self.submit(request).await?;
        let status = self.await_completion(&handle, self.max_wait).await?;

        let JobStatus::Completed { video_url } = status else {
            // await_completion only returns Ok on Completed.
            unreachable!("await_completion returned a non-completed status");
        };

        let path = self.download_artifact(&video_url, dest).await?;
        Ok(CompletedJob {
            handle,
            video_url,
            path,
        })
    }
}
