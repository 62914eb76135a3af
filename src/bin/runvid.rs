//! CLI for runvid - text-to-video generation.

use clap::{Args, Parser, Subcommand};
use runvid::{Config, GenerationRequest, GenerationWorkflow, RunwayClient, VidError};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "runvid")]
#[command(about = "Generate videos from text prompts via the Runway API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a video from a text prompt
    Generate(GenerateArgs),

    /// Run the interactive web form
    Serve(ServeArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// The text prompt describing the video
    prompt: String,

    /// Output file path (default: OUTPUT_DIR/video_<timestamp>.mp4)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Video duration in seconds (1-10)
    #[arg(short, long)]
    duration: Option<u32>,

    /// Video resolution (e.g., 1280x768)
    #[arg(short, long)]
    resolution: Option<String>,

    /// Motion strength (0.0-1.0)
    #[arg(short, long)]
    motion: Option<f32>,

    /// Seed for reproducibility (0 = none)
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum seconds to wait for the job to finish
    #[arg(long)]
    max_wait: Option<u64>,
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind the web form to
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runvid=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Generate(args) => {
            if let Err(e) = generate(args, config, cli.json).await {
                report_error(&e, cli.json);
                std::process::exit(1);
            }
        }
        Commands::Serve(args) => {
            runvid::web::serve(config, args.addr).await?;
        }
    }

    Ok(())
}

async fn generate(args: GenerateArgs, mut config: Config, json_output: bool) -> Result<(), VidError> {
    if let Some(secs) = args.max_wait {
        config.max_wait = Duration::from_secs(secs);
    }

    let mut request = GenerationRequest::new(&args.prompt)
        .with_duration(args.duration.unwrap_or(config.default_duration))
        .with_resolution(
            args.resolution
                .unwrap_or_else(|| config.default_resolution.clone()),
        )
        .with_motion_strength(args.motion.unwrap_or(config.default_motion_strength));
    if let Some(seed) = args.seed {
        request = request.with_seed(seed);
    }

    let output = match args.output {
        Some(path) => path,
        None => {
            std::fs::create_dir_all(&config.output_dir)?;
            config.output_dir.join(format!(
                "video_{}.mp4",
                chrono::Local::now().format("%Y%m%d_%H%M%S")
            ))
        }
    };

    let client = RunwayClient::builder()
        .api_key(&config.api_key)
        .api_base(&config.api_base)
        .build()?;
    let workflow = GenerationWorkflow::new(client, config.limits.clone(), config.max_wait);

    if !json_output {
        println!("Generating video: {}", args.prompt);
    }

    let handle = workflow.submit(&request).await?;
    if !json_output {
        println!("Job ID: {handle}");
        println!("Waiting for generation to complete...");
    }

    let status = workflow.await_completion(&handle, config.max_wait).await?;
    let runvid::JobStatus::Completed { video_url } = status else {
        // await_completion only returns Ok on Completed.
        unreachable!();
    };

    if !json_output {
        println!("Downloading video to {}", output.display());
    }
    let path = workflow.download_artifact(&video_url, &output).await?;

    if json_output {
        let result = serde_json::json!({
            "success": true,
            "job_id": handle.id(),
            "video_url": video_url,
            "output": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Video saved: {}", path.display());
    }

    Ok(())
}

/// Reports each error kind distinctly, so a parameter mistake reads
/// differently from a service failure or a timeout.
fn report_error(e: &VidError, json_output: bool) {
    if json_output {
        let body = serde_json::json!({
            "success": false,
            "kind": e.kind(),
            "error": e.to_string(),
        });
        eprintln!("{body}");
        return;
    }

    let label = match e {
        VidError::Validation(_) => "Invalid parameters",
        VidError::Submission { .. } => "Submission rejected",
        VidError::Transport(_) => "Network error",
        VidError::GenerationFailed(_) => "Generation failed",
        VidError::Timeout(_) => "Timed out",
        VidError::Download(_) => "Download failed",
        VidError::Io(_) | VidError::Json(_) => "Error",
    };
    eprintln!("{label}: {e}");
}
