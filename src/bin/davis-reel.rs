use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Mutex,
};

use anyhow::Context as _;
use clap::Parser;
use davis_reel::{
    AssemblyConfig, AssemblyRequest, ErrorKind, Fps, TracingEventSink, VideoAssembler,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "davis-reel",
    version,
    about = "Creates a video from randomly chosen DAVIS dataset sequences"
)]
struct Cli {
    /// Number of sequences to use (between 1 and the number of sequences in the dataset).
    #[arg(long = "sets-number", alias = "sets_number")]
    sets_number: usize,

    /// Path for the output MP4 file.
    #[arg(long = "output-path", alias = "output_path")]
    output_path: PathBuf,

    /// Dataset root containing `JPEGImages/480p` and `Annotations/480p`.
    #[arg(long, env = "DAVIS_ROOT")]
    dataset_root: Option<PathBuf>,

    /// JSON config file; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overlay opacity in [0, 1].
    #[arg(long)]
    opacity: Option<f32>,

    /// Output frame rate (frames per second).
    #[arg(long)]
    fps: Option<u32>,

    /// Seed for sequence sampling (reproducible selections).
    #[arg(long)]
    seed: Option<u64>,

    /// Use directory listing order instead of sorting frames by filename.
    #[arg(long, default_value_t = false)]
    no_sort: bool,

    /// Keep a partially written output file when the run fails.
    #[arg(long, default_value_t = false)]
    keep_partial: bool,

    /// Log filter (e.g. `info`, `debug`, `davis_reel=trace`).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also append log lines to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level, cli.log_file.as_deref()) {
        eprintln!("error: {e:#}");
        return ExitCode::FAILURE;
    }

    let cfg = match build_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };

    let assembler = match VideoAssembler::new(cfg) {
        Ok(a) => a,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(2);
        }
    };

    let request = AssemblyRequest {
        sequences: cli.sets_number,
        output: cli.output_path,
    };
    match assembler.render_to_mp4(&request, &mut TracingEventSink) {
        Ok(stats) => {
            tracing::debug!(sequences = ?stats.sequences, geometry = %stats.geometry, "done");
            ExitCode::SUCCESS
        }
        Err(e) if e.kind() == ErrorKind::Configuration => ExitCode::from(2),
        Err(_) => ExitCode::FAILURE,
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<AssemblyConfig> {
    let mut cfg = match &cli.config {
        Some(path) => AssemblyConfig::from_path(path)?,
        None => AssemblyConfig::default(),
    };
    if let Some(root) = &cli.dataset_root {
        cfg.dataset.root = root.clone();
    }
    if let Some(opacity) = cli.opacity {
        cfg.opacity = opacity;
    }
    if let Some(fps) = cli.fps {
        cfg.fps = Fps::whole(fps)?;
    }
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }
    if cli.no_sort {
        cfg.sort_frames = false;
    }
    if cli.keep_partial {
        cfg.cleanup_partial_output = false;
    }
    Ok(cfg)
}

fn init_logging(filter: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter).with_context(|| format!("parse log filter '{filter}'"))?;
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(Mutex::new(open_log_file(path)?))
                .with_ansi(false)
                .with_target(true),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("install tracing subscriber")?;
    Ok(())
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create log directory '{}'", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file '{}'", path.display()))
}
