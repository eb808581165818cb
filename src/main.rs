//! Proctor Cam CLI
//!
//! Runs the proctoring loop, submits reference snapshots, or does both in
//! the order an exam session needs them.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use proctor_cam::{
    capture::{Camera, FileConfig, MockCamera, UnavailableCamera},
    metrics::MetricsRegistry,
    proctor::{LogObserver, ObserverSet, ProctoringLoop, ResponseOrdering},
    snapshot::{FormResponse, HttpFormTarget, SnapshotForm, SnapshotSubmitter},
    verification::HttpVerifier,
    view::{ProctorView, VideoElement},
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Notify;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "proctor-cam", version, about = "Webcam client for exam proctoring")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Exam server base URL (overrides `server.base_url`).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Video source.
    #[arg(long, global = true, value_enum)]
    camera: Option<CameraKind>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the person in front of the camera on a fixed period.
    Proctor(ProctorArgs),
    /// Capture a reference snapshot and submit it with the form.
    Capture(CaptureArgs),
    /// Submit one reference snapshot, then start proctoring.
    Session(ProctorArgs),
}

#[derive(Debug, Args)]
struct ProctorArgs {
    /// Period between verifications in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// How out-of-order responses are applied.
    #[arg(long, value_enum)]
    ordering: Option<ResponseOrdering>,

    /// Per-request timeout in milliseconds.
    #[arg(long)]
    request_timeout_ms: Option<u64>,

    /// Write a PNG of the video and overlay here after each update.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Metrics server port (0 to disable).
    #[arg(long)]
    metrics_port: Option<u16>,
}

#[derive(Debug, Args)]
struct CaptureArgs {
    /// Capture and submit once instead of on every Enter press.
    #[arg(long)]
    once: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CameraKind {
    /// Hardware webcam (requires the `camera` feature).
    Device,
    /// Synthetic frames.
    Mock,
    /// No camera; blank frames are sent.
    None,
}

impl CameraKind {
    fn default_for_build() -> Self {
        if cfg!(feature = "camera") {
            CameraKind::Device
        } else {
            CameraKind::Mock
        }
    }

    fn open(self) -> Box<dyn Camera> {
        match self {
            CameraKind::Mock => Box::new(MockCamera::new()),
            CameraKind::None => Box::new(UnavailableCamera::new("camera disabled")),
            #[cfg(feature = "camera")]
            CameraKind::Device => Box::new(proctor_cam::capture::DeviceCamera::new()),
            #[cfg(not(feature = "camera"))]
            CameraKind::Device => Box::new(UnavailableCamera::new(
                "built without the `camera` feature",
            )),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Proctor Cam v{}", proctor_cam::VERSION);

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => FileConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => FileConfig::default(),
    };
    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }
    let camera = cli.camera.unwrap_or_else(CameraKind::default_for_build);

    let shutdown = Arc::new(Notify::new());
    {
        let shutdown = Arc::clone(&shutdown);
        if let Err(e) = ctrlc::set_handler(move || shutdown.notify_one()) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    match cli.command {
        Command::Proctor(args) => {
            apply_proctor_args(&mut config, &args);
            config.validate()?;
            run_proctor(&config, camera, &shutdown).await
        }
        Command::Capture(args) => {
            config.validate()?;
            run_capture(&config, camera, args.once, &shutdown).await
        }
        Command::Session(args) => {
            apply_proctor_args(&mut config, &args);
            config.validate()?;

            let response = capture_once(&config, camera).await?;
            if !response.status.is_success() {
                bail!(
                    "reference capture rejected with status {} at {}",
                    response.status,
                    response.final_url
                );
            }
            run_proctor(&config, camera, &shutdown).await
        }
    }
}

fn apply_proctor_args(config: &mut FileConfig, args: &ProctorArgs) {
    if let Some(interval_ms) = args.interval_ms {
        config.proctor.interval_ms = interval_ms;
    }
    if let Some(ordering) = args.ordering {
        config.proctor.ordering = ordering;
    }
    if let Some(timeout) = args.request_timeout_ms {
        config.proctor.request_timeout_ms = Some(timeout);
    }
    if let Some(preview) = &args.preview {
        config.proctor.preview_path = Some(preview.clone());
    }
    if let Some(port) = args.metrics_port {
        config.metrics.port = port;
    }
}

async fn run_proctor(
    config: &FileConfig,
    camera: CameraKind,
    shutdown: &Notify,
) -> anyhow::Result<()> {
    let endpoint = config.verify_url()?;
    info!(%endpoint, "Starting proctoring");

    let verifier = HttpVerifier::with_timeout(endpoint, config.proctor.request_timeout())?;
    let metrics = Arc::new(MetricsRegistry::new()?);
    let observer = ObserverSet::new()
        .with(Arc::new(LogObserver))
        .with(metrics.clone());

    #[cfg(feature = "metrics")]
    {
        use proctor_cam::metrics::{MetricsServer, MetricsServerConfig};

        if config.metrics.port != 0 {
            let server = MetricsServer::new(
                MetricsServerConfig::with_port(config.metrics.port),
                Arc::clone(&metrics),
            );
            tokio::spawn(async move {
                if let Err(e) = server.run().await {
                    warn!("Metrics server stopped: {}", e);
                }
            });
        }
    }

    let video = VideoElement::new(
        config.view.left,
        config.view.top,
        config.view.width,
        config.view.height,
    );
    let proctor = ProctoringLoop::setup(
        camera.open(),
        &config.capture,
        &config.proctor,
        ProctorView::new(video).shared(),
        Arc::new(verifier),
        Arc::new(observer),
    );

    tokio::select! {
        _ = proctor.run() => {}
        _ = shutdown.notified() => info!("Shutting down"),
    }
    Ok(())
}

fn build_submitter(config: &FileConfig, camera: CameraKind) -> anyhow::Result<SnapshotSubmitter> {
    let mut form = SnapshotForm::new(config.form_action_url()?, config.snapshot.file_field.clone());
    for (name, value) in &config.snapshot.fields {
        form = form.with_field(name.clone(), value.clone());
    }
    Ok(SnapshotSubmitter::setup(
        camera.open(),
        &config.capture,
        &config.snapshot,
        form,
        Arc::new(HttpFormTarget::new()),
    ))
}

async fn capture_once(config: &FileConfig, camera: CameraKind) -> anyhow::Result<FormResponse> {
    let mut submitter = build_submitter(config, camera)?;
    let response = submitter
        .trigger()
        .await
        .context("reference capture failed")?;
    Ok(response)
}

async fn run_capture(
    config: &FileConfig,
    camera: CameraKind,
    once: bool,
    shutdown: &Notify,
) -> anyhow::Result<()> {
    if once {
        let response = capture_once(config, camera).await?;
        println!("{} {}", response.status, response.final_url);
        return Ok(());
    }

    let mut submitter = build_submitter(config, camera)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    info!("Press Enter to capture, Ctrl-D to finish");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                if line?.is_none() {
                    break;
                }
                match submitter.trigger().await {
                    Ok(response) => println!("{} {}", response.status, response.final_url),
                    Err(e) => warn!("Snapshot submission failed: {}", e),
                }
            }
            _ = shutdown.notified() => break,
        }
    }
    Ok(())
}
