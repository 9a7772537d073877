use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use callframes::{
    generate_call_review, load_session_index, run_session, write_call_review, CallReview, CallType,
    FfmpegConfig, FfmpegTool, SamplerConfig, SessionConfig, SessionRequest,
};

#[derive(Parser)]
#[command(name = "callframes")]
#[command(author, version, about = "Align call recordings with their transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample frames from a recording and link them to its transcript
    Process {
        /// Recorded call video
        video: PathBuf,

        /// Transcript file (WebVTT, SRT or timestamped text)
        transcript: PathBuf,

        /// Output directory (default: <video dir>/output/<video name>)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Seconds between baseline frames
        #[arg(short, long, default_value = "5.0")]
        interval: f64,

        /// Scene change sensitivity (0-1, lower detects more changes)
        #[arg(short, long, default_value = "0.3")]
        scene_threshold: f64,

        /// Maximum number of frames to keep
        #[arg(short, long, default_value = "500")]
        target_frames: usize,

        /// Minimum seconds between kept frames
        #[arg(long, default_value = "2.0")]
        min_gap: f64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Detect sales-call patterns in a processed session index
    Analyze {
        /// index.json written by `process`
        index_json: PathBuf,

        /// Kind of call, which sets the health expectations
        #[arg(short, long, value_enum, default_value_t = CallType::Discovery)]
        call_type: CallType,

        /// Output directory (default: next to the index)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            video,
            transcript,
            output_dir,
            interval,
            scene_threshold,
            target_frames,
            min_gap,
            verbose,
        } => {
            setup_logging(verbose);
            let config = SessionConfig {
                sampler: SamplerConfig {
                    interval_seconds: interval,
                    scene_threshold,
                    min_gap_seconds: min_gap,
                    target_frames,
                },
                ..Default::default()
            };
            process_recording(video, transcript, output_dir, config).await
        }
        Commands::Analyze {
            index_json,
            call_type,
            output_dir,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_session(index_json, call_type, output_dir)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn require_file(path: &Path, what: &str) -> Result<()> {
    if !path.is_file() {
        bail!("{} not found: {:?}", what, path);
    }
    Ok(())
}

async fn process_recording(
    video: PathBuf,
    transcript: PathBuf,
    output_dir: Option<PathBuf>,
    config: SessionConfig,
) -> Result<()> {
    require_file(&video, "Video file")?;
    require_file(&transcript, "Transcript file")?;
    config.validate()?;

    let tool = FfmpegTool::locate(FfmpegConfig::from_env())
        .await
        .context("ffmpeg is required to process recordings")?;

    let request = SessionRequest::new(video, transcript, output_dir);
    info!("Processing {:?}", request.video);
    info!("Output directory: {:?}", request.output_dir);

    let outcome = run_session(&tool, &request, &config).await?;

    println!();
    println!("Processing Complete");
    println!("===================");
    println!("Duration: {:.1}s", outcome.index.duration_seconds);
    println!("Frames: {}", outcome.index.total_frames);
    println!("Speakers: {}", outcome.index.speaker_analysis.total_speakers);
    println!("Turns: {}", outcome.index.speaker_analysis.total_turns);
    for speaker in &outcome.index.speaker_analysis.speakers {
        println!(
            "  {} ({}): {:.1}s, {:.1}%, {} words",
            speaker.speaker_id,
            speaker.speaker_name.as_deref().unwrap_or("unnamed"),
            speaker.talk_time_seconds,
            speaker.talk_time_pct,
            speaker.word_count
        );
    }
    println!("Index: {:?}", outcome.index_path);
    println!("Frames: {:?}", request.frames_dir());

    Ok(())
}

fn analyze_session(index_json: PathBuf, call_type: CallType, output_dir: Option<PathBuf>) -> Result<()> {
    require_file(&index_json, "Index file")?;

    info!("Loading index from {:?}", index_json);
    let index = load_session_index(&index_json)?;

    let output_dir = output_dir.unwrap_or_else(|| {
        index_json
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });

    info!("Analyzing call (type: {})...", call_type);
    let review = generate_call_review(&index, call_type);
    let review_path = write_call_review(&review, &output_dir)?;

    print_review_summary(&review, &review_path);
    Ok(())
}

fn print_review_summary(review: &CallReview, review_path: &Path) {
    let metrics = &review.summary.key_metrics;

    println!();
    println!("Call Analysis");
    println!("=============");
    println!("Duration: {} minutes", metrics.duration_minutes);
    println!("Speakers: {}", metrics.total_speakers);
    println!("Questions asked: {}", metrics.questions_asked);
    println!("Pain points found: {}", metrics.pain_points_found);
    println!("Objections raised: {}", metrics.objections_raised);
    println!("Buying signals: {}", metrics.buying_signals_detected);
    println!("Action items: {}", metrics.action_items_identified);
    println!();

    println!("Health Indicators");
    println!("-----------------");
    for (name, indicator) in review.summary.call_health_indicators.iter() {
        println!("  [{}] {}: {}", indicator.status.marker(), name, indicator.message);
    }
    println!();
    println!("Output: {:?}", review_path);
}
