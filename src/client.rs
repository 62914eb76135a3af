//! HTTP client for the Runway generation API.

use crate::error::{Result, VidError};
use crate::service::GenerationService;
use crate::types::{
    GenerationRequest, JobHandle, JobStatus, StatusResponse, SubmitPayload, SubmitResponse,
};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

use crate::config::DEFAULT_API_BASE;

/// Builder for [`RunwayClient`].
#[derive(Debug, Clone)]
pub struct RunwayClientBuilder {
    api_key: Option<String>,
    api_base: String,
    request_timeout: Duration,
    download_timeout: Duration,
}

impl Default for RunwayClientBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.into(),
            request_timeout: Duration::from_secs(30),
            download_timeout: Duration::from_secs(60),
        }
    }
}

impl RunwayClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `RUNWAY_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API base URL (useful for pointing at a test server).
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Sets the timeout for submit and status requests.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the overall timeout for the artifact download request.
    pub fn download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    /// Builds the client, resolving the API key.
    pub fn build(self) -> Result<RunwayClient> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("RUNWAY_API_KEY").ok())
            .ok_or_else(|| {
                VidError::Validation("RUNWAY_API_KEY not set and no API key provided".into())
            })?;

        Ok(RunwayClient {
            client: reqwest::Client::new(),
            api_key,
            api_base: self.api_base.trim_end_matches('/').to_string(),
            request_timeout: self.request_timeout,
            download_timeout: self.download_timeout,
        })
    }
}

/// HTTP implementation of [`GenerationService`] against the Runway API.
pub struct RunwayClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    request_timeout: Duration,
    download_timeout: Duration,
}

impl RunwayClient {
    /// Creates a new [`RunwayClientBuilder`].
    pub fn builder() -> RunwayClientBuilder {
        RunwayClientBuilder::new()
    }

    fn generate_url(&self) -> String {
        format!("{}/generate", self.api_base)
    }

    fn task_url(&self, handle: &JobHandle) -> String {
        format!("{}/tasks/{}", self.api_base, handle.id())
    }
}

#[async_trait]
impl GenerationService for RunwayClient {
    async fn submit(&self, request: &GenerationRequest) -> Result<JobHandle> {
        let payload = SubmitPayload::from_request(request);

        let response = self
            .client
            .post(self.generate_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(self.request_timeout)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VidError::Submission {
                status: status.as_u16(),
                message,
            });
        }

        let body: SubmitResponse = response.json().await?;
        let id = body.id.filter(|id| !id.is_empty()).ok_or_else(|| {
            VidError::Submission {
                status: status.as_u16(),
                message: "response did not include a job id".into(),
            }
        })?;

        Ok(JobHandle::new(id))
    }

    async fn poll_status(&self, handle: &JobHandle) -> Result<JobStatus> {
        let response: StatusResponse = self
            .client
            .get(self.task_url(handle))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.request_timeout)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.into_status())
    }

    async fn download_artifact(&self, url: &str, dest: &Path) -> Result<PathBuf> {
        // The artifact URL is pre-signed by the service; no auth header here.
        let response = self
            .client
            .get(url)
            .timeout(self.download_timeout)
            .send()
            .await
            .map_err(|e| VidError::Download(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VidError::Download(format!(
                "server responded with {status}"
            )));
        }

        write_stream_to_file(response.bytes_stream(), dest).await?;
        Ok(dest.to_path_buf())
    }
}

/// Streams chunks to `dest` without buffering the whole payload in memory.
pub(crate) async fn write_stream_to_file<S, E>(mut stream: S, dest: &Path) -> Result<()>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut file = tokio::fs::File::create(dest).await?;
    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|e| VidError::Download(format!("stream interrupted: {e}")))?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[test]
    fn test_builder_with_explicit_key() {
        let client = RunwayClientBuilder::new().api_key("rw-test").build();
        assert!(client.is_ok());
    }

    #[test]
    fn test_builder_custom_timeouts() {
        let client = RunwayClientBuilder::new()
            .api_key("rw-test")
            .request_timeout(Duration::from_secs(5))
            .download_timeout(Duration::from_secs(120))
            .build()
            .unwrap();
        assert_eq!(client.request_timeout, Duration::from_secs(5));
        assert_eq!(client.download_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_endpoint_urls() {
        let client = RunwayClientBuilder::new()
            .api_key("rw-test")
            .api_base("https://api.example.com/v1/")
            .build()
            .unwrap();
        assert_eq!(client.generate_url(), "https://api.example.com/v1/generate");
        assert_eq!(
            client.task_url(&JobHandle::new("job-123")),
            "https://api.example.com/v1/tasks/job-123"
        );
    }

    fn chunked(payload: &[u8], chunk_size: usize) -> Vec<Result<Bytes>> {
        payload
            .chunks(chunk_size)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect()
    }

    #[tokio::test]
    async fn test_stream_write_round_trip_across_chunk_sizes() {
        let payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        let dir = tempfile::tempdir().unwrap();

        for chunk_size in [1, 7, 512, 8192, 20_000] {
            let dest = dir.path().join(format!("out_{chunk_size}.mp4"));
            let stream = stream::iter(chunked(&payload, chunk_size));
            write_stream_to_file(stream, &dest).await.unwrap();
            assert_eq!(std::fs::read(&dest).unwrap(), payload);
        }
    }

    #[tokio::test]
    async fn test_stream_error_surfaces_as_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("partial.mp4");
        let items: Vec<std::result::Result<Bytes, String>> = vec![
            Ok(Bytes::from_static(b"abc")),
            Err("connection reset".into()),
        ];
        let err = write_stream_to_file(stream::iter(items), &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, VidError::Download(_)));
    }
}
