//! Interactive web form over the generation workflow.

use crate::client::RunwayClient;
use crate::config::Config;
use crate::error::VidError;
use crate::types::GenerationRequest;
use crate::workflow::GenerationWorkflow;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

/// Read-only state shared by handlers. Each request drives its own job;
/// nothing mutable is shared between invocations.
pub struct AppState {
    config: Config,
    workflow: GenerationWorkflow<RunwayClient>,
}

impl AppState {
    /// Builds the shared state from configuration.
    pub fn new(config: Config) -> crate::error::Result<Self> {
        let client = RunwayClient::builder()
            .api_key(&config.api_key)
            .api_base(&config.api_base)
            .build()?;
        let workflow =
            GenerationWorkflow::new(client, config.limits.clone(), config.max_wait);
        Ok(Self { config, workflow })
    }
}

/// Parameters accepted by `POST /api/generate`. Fields other than the
/// prompt fall back to the configured defaults.
#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    prompt: String,
    duration: Option<u32>,
    resolution: Option<String>,
    motion_strength: Option<f32>,
    seed: Option<u64>,
}

/// Successful generation result.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    job_id: String,
    video_url: String,
    path: String,
}

/// Error payload with a machine-readable kind, so the form can tell a
/// parameter mistake from a service-side failure.
#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: &'static str,
    error: String,
}

struct ApiError(VidError);

impl From<VidError> for ApiError {
    fn from(e: VidError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let body = ErrorBody {
            kind: self.0.kind(),
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Maps each error kind onto a distinct HTTP status.
fn status_for(e: &VidError) -> StatusCode {
    match e {
        VidError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        VidError::Submission { .. } => StatusCode::BAD_GATEWAY,
        VidError::Transport(_) => StatusCode::BAD_GATEWAY,
        VidError::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
        VidError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        VidError::Download(_) => StatusCode::BAD_GATEWAY,
        VidError::Io(_) | VidError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn index() -> Html<&'static str> {
    Html(FORM_HTML)
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(params): Json<GenerateParams>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let config = &state.config;

    let mut request = GenerationRequest::new(params.prompt)
        .with_duration(params.duration.unwrap_or(config.default_duration))
        .with_resolution(
            params
                .resolution
                .unwrap_or_else(|| config.default_resolution.clone()),
        )
        .with_motion_strength(
            params
                .motion_strength
                .unwrap_or(config.default_motion_strength),
        );
    if let Some(seed) = params.seed {
        request = request.with_seed(seed);
    }

    let filename = format!(
        "video_{}.mp4",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let dest = config.output_dir.join(filename);

    tracing::info!(prompt = %request.prompt, "web generation request");
    let job = state.workflow.run(&request, &dest).await?;

    Ok(Json(GenerateResponse {
        job_id: job.handle.id().to_string(),
        video_url: job.video_url,
        path: job.path.display().to_string(),
    }))
}

/// Builds the application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/generate", post(generate))
        .with_state(state)
}

/// Binds `addr` and serves the form until the process is stopped.
pub async fn serve(config: Config, addr: SocketAddr) -> crate::error::Result<()> {
    let state = Arc::new(AppState::new(config)?);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "serving generation form");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

const FORM_HTML: &str = r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>Text-to-Video Generator</title>
  <style>
    body { font-family: sans-serif; max-width: 640px; margin: 2em auto; }
    label { display: block; margin-top: 1em; }
    textarea, input, select { width: 100%; box-sizing: border-box; }
    #result { margin-top: 1.5em; white-space: pre-wrap; }
    .error { color: #b00020; }
  </style>
</head>
<body>
  <h1>Text-to-Video Generator</h1>
  <form id="gen">
    <label>Describe your video
      <textarea name="prompt" rows="4"
        placeholder="A majestic eagle soaring over mountain peaks at sunset..."></textarea>
    </label>
    <label>Duration (seconds)
      <input type="number" name="duration" min="1" max="10" value="4">
    </label>
    <label>Resolution
      <select name="resolution">
        <option>1280x768</option>
        <option>1920x1080</option>
        <option>768x1280</option>
        <option>1080x1920</option>
      </select>
    </label>
    <label>Motion strength
      <input type="number" name="motion_strength" min="0" max="1" step="0.1" value="0.8">
    </label>
    <label>Seed (optional, 0 = none)
      <input type="number" name="seed" min="0" value="0">
    </label>
    <button type="submit">Generate video</button>
  </form>
  <div id="result"></div>
  <script>
    const form = document.getElementById('gen');
    const result = document.getElementById('result');
    const labels = {
      validation: 'Invalid parameters',
      submission: 'Submission rejected',
      transport: 'Network error',
      generation_failed: 'Generation failed',
      timeout: 'Timed out',
      download: 'Download failed',
    };
    form.addEventListener('submit', async (e) => {
      e.preventDefault();
      const f = new FormData(form);
      result.textContent = 'Generating... this may take a few minutes';
      result.className = '';
      const body = {
        prompt: f.get('prompt'),
        duration: parseInt(f.get('duration'), 10),
        resolution: f.get('resolution'),
        motion_strength: parseFloat(f.get('motion_strength')),
      };
      const seed = parseInt(f.get('seed'), 10);
      if (seed > 0) body.seed = seed;
      const resp = await fetch('/api/generate', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body),
      });
      const data = await resp.json();
      if (resp.ok) {
        result.textContent = 'Video ready: ' + data.path + '\n(job ' + data.job_id + ')';
      } else {
        result.className = 'error';
        result.textContent = (labels[data.kind] || 'Error') + ': ' + data.error;
      }
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_kinds_map_to_distinct_statuses() {
        assert_eq!(
            status_for(&VidError::Validation("x".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&VidError::Timeout(Duration::from_secs(300))),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&VidError::GenerationFailed("x".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_form_exposes_all_parameters() {
        for field in ["prompt", "duration", "resolution", "motion_strength", "seed"] {
            assert!(FORM_HTML.contains(field), "form is missing {field}");
        }
    }

    #[test]
    fn test_generate_params_accepts_partial_body() {
        let params: GenerateParams =
            serde_json::from_str(r#"{"prompt": "A calm lake at sunrise"}"#).unwrap();
        assert_eq!(params.prompt, "A calm lake at sunrise");
        assert!(params.duration.is_none());
        assert!(params.seed.is_none());
    }
}
