use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use cli::{
    sources::{terminal_input, ImageDirFrameSource, JsonLineSink, OverlayOut},
    AppConfig,
};
use color_eyre::eyre::Result;
use silhouette::{
    HuMomentMatcher, LearnSession, LearnSessionConfig, Learner, ObjectStore, RecognizeSession,
    Recognizer,
};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Teach and recognize objects by their silhouette", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively teach objects from a replayed frame stream
    Learn {
        /// Path to a TOML or JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory of grayscale frames replayed as the depth stream
        #[arg(short, long)]
        frames: PathBuf,
        /// Write annotated overlay frames to this directory
        #[arg(long)]
        overlay_dir: Option<PathBuf>,
    },
    /// Re-detect learned objects per frame and publish results
    Recognize {
        /// Path to a TOML or JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory of grayscale frames replayed as the depth stream
        #[arg(short, long)]
        frames: PathBuf,
        /// Write annotated overlay frames to this directory
        #[arg(long)]
        overlay_dir: Option<PathBuf>,
        /// Write recognition JSON lines here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Learn {
            config,
            frames,
            overlay_dir,
        } => run_learn(load_config(config)?, frames, overlay_dir),
        Commands::Recognize {
            config,
            frames,
            overlay_dir,
            output,
        } => run_recognize(load_config(config)?, frames, overlay_dir, output),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            Ok(AppConfig::from_file(&path)?)
        }
        None => Ok(AppConfig::default()),
    }
}

fn run_learn(config: AppConfig, frames: PathBuf, overlay_dir: Option<PathBuf>) -> Result<()> {
    let learner = Learner::new(config.labels.clone(), Box::new(HuMomentMatcher))?;
    let store = ObjectStore::load(&config.store_path);
    let frame_source = ImageDirFrameSource::new(&frames)?;
    let (keys, names) = terminal_input();
    let overlay = OverlayOut::from_dir(overlay_dir)?;

    let session_config = LearnSessionConfig {
        key_wait: Duration::from_millis(config.key_wait_ms),
        frame_interval: Duration::from_millis(config.frame_interval_ms),
        ..LearnSessionConfig::default()
    };

    let mut session = LearnSession::new(
        learner,
        config.pipeline(),
        store,
        frame_source,
        keys,
        overlay,
        names,
        session_config,
    );
    session.run()?;
    info!(learned = session.store().len(), "session finished");
    Ok(())
}

fn run_recognize(
    config: AppConfig,
    frames: PathBuf,
    overlay_dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let store = ObjectStore::load(&config.store_path);
    let frame_source = ImageDirFrameSource::new(&frames)?;
    let overlay = OverlayOut::from_dir(overlay_dir)?;
    let sink = match output {
        Some(path) => JsonLineSink::file(&path)?,
        None => JsonLineSink::stdout(),
    };

    let mut session = RecognizeSession::new(
        Recognizer::new(Box::new(HuMomentMatcher), config.max_dissimilarity),
        config.pipeline(),
        store.objects().to_vec(),
        frame_source,
        overlay,
        sink,
    );
    session.run()?;
    Ok(())
}
