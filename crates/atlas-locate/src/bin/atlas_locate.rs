//! atlas-locate CLI: locate captured frames inside a reference atlas.

use std::fs;
use std::path::{Path, PathBuf};

use atlas_locate::detect;
use atlas_locate::fixtures::parse_fixture_coords;
use atlas_locate::io::{LocateConfig, LocateReport};
use atlas_locate::schedule::{FrameSchedule, ScheduledFrame};
use atlas_locate::track::PathTrack;
use atlas_locate::{LocateResult, Locator, MatchOutcome};
use clap::{Args, Parser, Subcommand};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

#[derive(Parser)]
#[command(name = "atlas-locate")]
#[command(about = "Locate captured indicator regions inside a reference atlas")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON log records (needs the `tracing` feature).
    #[arg(long, global = true)]
    json_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Locate the indicator in each frame and write a JSON report.
    Locate(LocateArgs),

    /// Check labelled fixtures: `good` frames must match where their name
    /// says, `bad` frames must not match at all.
    Evaluate(EvaluateArgs),
}

#[derive(Debug, Clone, Args)]
struct LocateArgs {
    /// JSON run configuration.
    #[arg(long)]
    config: PathBuf,

    /// Report path; overrides `output_path` from the config.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Save the extracted region and the matched atlas window of every frame here.
    #[arg(long)]
    dump_dir: Option<PathBuf>,

    /// Frame images, in recording order.
    #[arg(required = true)]
    frames: Vec<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct EvaluateArgs {
    /// JSON run configuration.
    #[arg(long)]
    config: PathBuf,

    /// Frames named `<anything>_<x>_<y>.<ext>` that must resolve to `(x, y)`.
    #[arg(long)]
    good: PathBuf,

    /// Frames that must not produce a successful match.
    #[arg(long)]
    bad: PathBuf,

    /// Allowed position error in pixels, per axis.
    #[arg(long, default_value = "2")]
    tolerance: usize,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_log);

    match cli.command {
        Commands::Locate(args) => run_locate(&args),
        Commands::Evaluate(args) => run_evaluate(&args),
    }
}

/// Level used when `RUST_LOG` does not say otherwise.
fn verbosity_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

#[cfg(feature = "tracing")]
fn init_logging(verbose: u8, json: bool) {
    let _ = tracing_log::LogTracer::init();
    atlas_locate::core::init_tracing(json, verbosity_level(verbose));
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: u8, json: bool) {
    let _ = atlas_locate::core::init_with_level(verbosity_level(verbose));
    if json {
        log::warn!("--json-log requires the `tracing` feature; using plain logs");
    }
}

fn config_dir(config: &Path) -> PathBuf {
    config.parent().map(Path::to_path_buf).unwrap_or_default()
}

fn outcome_label(outcome: MatchOutcome) -> &'static str {
    match outcome {
        MatchOutcome::Successful => "successful",
        MatchOutcome::Ambiguous => "ambiguous",
        MatchOutcome::Failed => "failed",
    }
}

fn describe(result: &LocateResult) -> String {
    let position = result
        .position
        .map_or_else(|| "-".to_string(), |p| format!("{},{}", p.x, p.y));
    format!(
        "{}\t{}\tscore={:.3}\tdistinct={:.1}",
        outcome_label(result.outcome),
        position,
        result.score,
        result.distinctiveness
    )
}

// ── locate ─────────────────────────────────────────────────────────────

fn run_locate(args: &LocateArgs) -> CliResult<()> {
    let cfg = LocateConfig::load_json(&args.config)?;
    let base_dir = config_dir(&args.config);
    let locator = detect::build_locator(&cfg, &base_dir)?;

    let selected: Vec<(&PathBuf, Option<ScheduledFrame>)> = match &cfg.schedule {
        Some(params) => {
            let schedule = FrameSchedule::new(params, args.frames.len() as u64)?;
            log::info!(
                "schedule: frames {}..{} every {}",
                schedule.landing_frame(),
                schedule.end_frame(),
                schedule.skip() + 1
            );
            schedule
                .frames()
                .filter_map(|f| args.frames.get(f.index as usize).map(|p| (p, Some(f))))
                .collect()
        }
        None => args.frames.iter().map(|p| (p, None)).collect(),
    };

    if let Some(dir) = &args.dump_dir {
        fs::create_dir_all(dir)?;
    }

    let mut report = LocateReport::new(&cfg, &args.config);
    let mut track = PathTrack::new();

    for (path, scheduled) in selected {
        let progress = scheduled.map_or_else(String::new, |s| format!("[{:>3}%] ", s.percent));
        let frame = match detect::load_rgb(path) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("skipping {}: {e}", path.display());
                println!("{progress}{}\terror\t{e}", path.display());
                report.push_error(path, e);
                continue;
            }
        };

        let result = locator.find_position(&frame.view());
        match &result {
            Ok(r) => {
                track.record(r);
                println!("{progress}{}\t{}", path.display(), describe(r));
                if let Some(dir) = &args.dump_dir {
                    if let Err(e) = dump_match(&locator, &frame, r, path, dir) {
                        log::warn!("could not dump crops for {}: {e}", path.display());
                    }
                }
            }
            Err(e) => {
                log::warn!("frame {} failed: {e}", path.display());
                println!("{progress}{}\terror\t{e}", path.display());
            }
        }
        report.push(path, scheduled, result);
    }

    if !track.is_empty() {
        let atlas = locator.atlas();
        report.path_bounds = Some(track.bounds(atlas.width(), atlas.height()));
    }

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| cfg.output_path(&base_dir));
    report.write_json(&out)?;

    let s = report.summary;
    log::info!("report written to {}", out.display());
    println!(
        "summary: {} successful, {} ambiguous, {} failed, {} errors",
        s.successful, s.ambiguous, s.failed, s.errors
    );
    Ok(())
}

fn dump_match(
    locator: &Locator,
    frame: &atlas_locate::RgbImage,
    result: &LocateResult,
    frame_path: &Path,
    dir: &Path,
) -> CliResult<()> {
    let stem = frame_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let region = locator.extractor().extract(&frame.view())?;
    let rect = locator.params().region;
    let matched = locator
        .atlas()
        .sub_region(result.top_left.x, result.top_left.y, rect.width, rect.height)?;

    detect::save_rgb(&region.pixels, dir.join(format!("{stem}_region.png")))?;
    detect::save_rgb(&matched, dir.join(format!("{stem}_match.png")))?;
    log::debug!("dumped {stem} crops to {}", dir.display());
    Ok(())
}

// ── evaluate ───────────────────────────────────────────────────────────

fn list_images(dir: &Path) -> CliResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if path.is_file() && is_image {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn locate_file(locator: &Locator, path: &Path) -> CliResult<LocateResult> {
    let frame = detect::load_rgb(path)?;
    Ok(locator.find_position(&frame.view())?)
}

fn check_good(locator: &Locator, path: &Path, tolerance: usize) -> Result<(), String> {
    let Some((ex, ey)) = parse_fixture_coords(path) else {
        return Err("no coordinates in file name".to_string());
    };
    let r = locate_file(locator, path).map_err(|e| e.to_string())?;
    match r.position {
        Some(p) if p.x.abs_diff(ex) <= tolerance && p.y.abs_diff(ey) <= tolerance => Ok(()),
        _ => Err(format!("expected ({ex}, {ey}), got {}", describe(&r))),
    }
}

fn check_bad(locator: &Locator, path: &Path) -> Result<(), String> {
    let r = locate_file(locator, path).map_err(|e| e.to_string())?;
    if r.is_successful() {
        Err(format!("unexpected match: {}", describe(&r)))
    } else {
        Ok(())
    }
}

fn run_evaluate(args: &EvaluateArgs) -> CliResult<()> {
    let cfg = LocateConfig::load_json(&args.config)?;
    let locator = detect::build_locator(&cfg, &config_dir(&args.config))?;

    let good = list_images(&args.good)?;
    let bad = list_images(&args.bad)?;
    let mut failures = Vec::new();

    for path in &good {
        if let Err(why) = check_good(&locator, path, args.tolerance) {
            failures.push(format!("good {}: {why}", path.display()));
        }
    }
    for path in &bad {
        if let Err(why) = check_bad(&locator, path) {
            failures.push(format!("bad {}: {why}", path.display()));
        }
    }

    let total = good.len() + bad.len();
    for f in &failures {
        eprintln!("{f}");
    }
    println!("{} of {} fixtures passed", total - failures.len(), total);

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} of {} fixtures failed", failures.len(), total).into())
    }
}
