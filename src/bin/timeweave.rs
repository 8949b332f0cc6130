use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use timeweave::{
    Fps, JsonLinesSink, Schedule, SessionOpts, TimelineDef, TimelineSession, flatten,
};

#[derive(Parser, Debug)]
#[command(name = "timeweave", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Flatten a timeline document and print its schedule as JSON.
    Schedule(ScheduleArgs),
    /// Print the resolved snapshot at one instant as JSON.
    Sample(SampleArgs),
    /// Sample every frame into a JSON-lines file.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct ScheduleArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Time in seconds.
    #[arg(long)]
    at: f64,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON-lines path.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Sample frames in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads when sampling in parallel.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Schedule(args) => cmd_schedule(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_timeline(path: &Path) -> anyhow::Result<TimelineDef> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read timeline '{}'", path.display()))?;
    TimelineDef::from_json(&text).with_context(|| "parse timeline JSON")
}

fn load_schedule(path: &Path) -> anyhow::Result<Schedule> {
    let def = read_timeline(path)?;
    let (graph, animation) = def.build().with_context(|| "build timeline")?;
    Ok(flatten(&graph, &animation).with_context(|| "flatten timeline")?)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).with_context(|| "write JSON to stdout")?;
    writeln!(out)?;
    Ok(())
}

fn cmd_schedule(args: ScheduleArgs) -> anyhow::Result<()> {
    let schedule = load_schedule(&args.in_path)?;
    print_json(&schedule)
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let schedule = load_schedule(&args.in_path)?;
    let snapshot = schedule
        .snapshot_at(args.at)
        .with_context(|| format!("sample at {}s", args.at))?;
    print_json(&snapshot)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let schedule = load_schedule(&args.in_path)?;
    let opts = SessionOpts {
        fps: Fps::new(args.fps, 1)?,
        parallel: args.parallel,
        threads: args.threads,
        ..SessionOpts::default()
    };
    let session = TimelineSession::from_schedule(schedule, opts);

    let f = File::create(&args.out)
        .with_context(|| format!("create output '{}'", args.out.display()))?;
    let mut sink = JsonLinesSink::new(BufWriter::new(f));
    let stats = session.render_all(&mut sink)?;
    eprintln!(
        "wrote {} frames to {}",
        stats.frames_total,
        args.out.display()
    );
    Ok(())
}
