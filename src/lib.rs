#![warn(missing_docs)]
//! runvid - text-to-video generation client for the Runway API.
//!
//! Submits a prompt plus generation parameters, polls the remote task
//! until it reaches a terminal state, and downloads the resulting video.
//!
//! # Quick Start
//!
//! ```no_run
//! use runvid::{GenerationRequest, GenerationWorkflow, Limits, RunwayClient};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> runvid::Result<()> {
//!     let client = RunwayClient::builder().build()?; // key from RUNWAY_API_KEY
//!     let workflow =
//!         GenerationWorkflow::new(client, Limits::default(), Duration::from_secs(300));
//!
//!     let request = GenerationRequest::new("A calm lake at sunrise")
//!         .with_duration(4)
//!         .with_motion_strength(0.8);
//!     let job = workflow.run(&request, Path::new("lake.mp4")).await?;
//!     println!("saved {}", job.path.display());
//!     Ok(())
//! }
//! ```

mod error;

pub mod client;
pub mod config;
pub mod service;
pub mod types;
pub mod web;
pub mod workflow;

// Re-export the commonly used types at the crate root.
pub use client::{RunwayClient, RunwayClientBuilder};
pub use config::{Config, Limits};
pub use error::{Result, VidError};
pub use service::GenerationService;
pub use types::{GenerationRequest, JobHandle, JobStatus};
pub use workflow::{CompletedJob, GenerationWorkflow};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::client::RunwayClient;
    pub use crate::config::{Config, Limits};
    pub use crate::error::{Result, VidError};
    pub use crate::service::GenerationService;
    pub use crate::types::{GenerationRequest, JobHandle, JobStatus};
    pub use crate::workflow::{CompletedJob, GenerationWorkflow};
}
