use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::PathBuf,
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kinetype::{
    AnimationTimeline, Evaluator, FrameIndex, GenerationPipeline, GenerationRequest,
    InMemoryProjectRepository, JsonLinesSink, KinetypeConfig, RenderJob, RenderOverrides,
    RenderThreading, Resolution,
};

#[derive(Parser, Debug)]
#[command(name = "kinetype", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a timeline JSON file.
    Validate(InArgs),
    /// Print the evaluated state of one frame as JSON.
    Eval(EvalArgs),
    /// Print a timeline's derived length.
    Duration(InArgs),
    /// Stream every frame state to a JSON-lines file for an external encoder.
    Render(RenderArgs),
    /// Pair words with beat frames.
    Align(AlignArgs),
    /// Run the generation pipeline for a project request.
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
struct InArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON-lines path.
    #[arg(long)]
    out: PathBuf,

    /// Override output size, as `WxH`.
    #[arg(long)]
    size: Option<Resolution>,

    /// Override the number of frames (at least 15).
    #[arg(long)]
    duration: Option<u64>,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render chunk size (parallel mode only).
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Report frames identical to an earlier one in the same chunk as repeats.
    #[arg(long, default_value_t = false)]
    static_frame_elision: bool,
}

#[derive(Parser, Debug)]
struct AlignArgs {
    /// Words to align, whitespace separated.
    #[arg(long)]
    words: String,

    /// Beat frames, comma separated.
    #[arg(long, value_delimiter = ',')]
    beats: Vec<i64>,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Generation request JSON.
    #[arg(long)]
    request: PathBuf,

    /// Configuration JSON. Environment variables still apply on top.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the synthesized timeline here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Submit the timeline for rendering after generation.
    #[arg(long, default_value_t = false)]
    render: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Eval(args) => cmd_eval(args),
        Command::Duration(args) => cmd_duration(args),
        Command::Render(args) => cmd_render(args),
        Command::Align(args) => cmd_align(args),
        Command::Generate(args) => cmd_generate(args),
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_validate(args: InArgs) -> anyhow::Result<()> {
    let timeline = AnimationTimeline::from_path(&args.in_path)?;
    let report = kinetype::validate(&timeline);
    print_json(&report)?;
    if !report.valid {
        anyhow::bail!("'{}' is not a valid timeline", args.in_path.display());
    }
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let timeline = AnimationTimeline::from_path(&args.in_path)?;
    let state = Evaluator::eval_frame(&timeline, FrameIndex(args.frame));
    print_json(&state)
}

fn cmd_duration(args: InArgs) -> anyhow::Result<()> {
    let timeline = AnimationTimeline::from_path(&args.in_path)?;
    let frames = timeline.total_frames();
    print_json(&serde_json::json!({
        "totalFrames": frames,
        "fps": timeline.video.fps,
        "seconds": kinetype::frame_to_seconds(frames, timeline.video.fps),
    }))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let timeline = AnimationTimeline::from_path(&args.in_path)?;
    kinetype::validate(&timeline).into_result()?;

    let mut job = RenderJob::new(Arc::new(timeline));
    if let Some(size) = args.size {
        if !size.is_preset() {
            tracing::warn!(%size, "rendering at a non-preset size");
        }
        job = job.with_size(size);
    }
    if let Some(frames) = args.duration {
        job = job.with_duration(frames);
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let file = File::create(&args.out)
        .with_context(|| format!("create output '{}'", args.out.display()))?;
    let mut sink = JsonLinesSink::new(BufWriter::new(file));

    let threading = RenderThreading {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
        static_frame_elision: args.static_frame_elision,
    };
    let stats = job.run(&mut sink, &threading)?;
    sink.into_inner()
        .flush()
        .with_context(|| format!("flush '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} frames, {} repeated)",
        args.out.display(),
        stats.frames_total,
        stats.frames_elided
    );
    Ok(())
}

fn cmd_align(args: AlignArgs) -> anyhow::Result<()> {
    let words: Vec<&str> = args.words.split_whitespace().collect();
    print_json(&kinetype::align(&words, &args.beats))
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let cfg = KinetypeConfig::load(args.config.as_deref())?;
    let raw = std::fs::read_to_string(&args.request)
        .with_context(|| format!("read request '{}'", args.request.display()))?;
    let request: GenerationRequest = serde_json::from_str(&raw)
        .with_context(|| format!("parse request '{}'", args.request.display()))?;

    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    runtime.block_on(async {
        let repository = Arc::new(InMemoryProjectRepository::new());
        let pipeline = GenerationPipeline::from_config(&cfg, repository)?;
        tracing::info!(providers = ?pipeline.providers(), "providers selected");
        let project_id = request.project_id.clone();
        let output = pipeline.run(request).await?;

        let json = output.timeline.to_json_string_pretty()?;
        match &args.out {
            Some(path) => {
                std::fs::write(path, json)
                    .with_context(|| format!("write timeline '{}'", path.display()))?;
                eprintln!("wrote {}", path.display());
            }
            None => println!("{json}"),
        }

        if args.render {
            let receipt = pipeline
                .submit_render(&project_id, RenderOverrides::default())
                .await?;
            eprintln!("render {} -> {}", receipt.render_id, receipt.output_url);
        }
        Ok::<(), anyhow::Error>(())
    })
}
