use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use pagediff::{DiffSummary, OutputTarget, RenderConfig};

/// Render one page from each of two documents and write an image marking
/// the pixels that differ in semi-transparent red.
#[derive(Parser, Debug)]
#[command(name = "pagediff", version)]
struct Args {
    /// First document
    file1: PathBuf,
    /// Zero-based page of the first document
    page1: usize,
    /// Second document
    file2: PathBuf,
    /// Zero-based page of the second document
    page2: usize,
    /// Output path (.png, .pam or .ppm), or -png / -pam / -ppm for stdout
    #[arg(allow_hyphen_values = true)]
    output: String,

    /// Render scale factor (1.0 = 72 dpi for PDF pages)
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Print a JSON summary of the diff to stderr
    #[arg(long)]
    summary: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    // Resolve the output first so a bad extension fails before any rendering
    let target = OutputTarget::parse(&args.output)?;
    let config = RenderConfig { scale: args.scale };

    let diff = pagediff::diff_pages(&args.file1, args.page1, &args.file2, args.page2, &config)
        .with_context(|| {
            format!(
                "diffing {} page {} against {} page {}",
                args.file1.display(),
                args.page1,
                args.file2.display(),
                args.page2
            )
        })?;

    let summary = DiffSummary::from_diff(&diff);
    log::info!(
        "{} of {} pixels differ ({}x{})",
        summary.differing_pixels,
        summary.total_pixels,
        summary.width,
        summary.height
    );

    target.write(&diff)?;

    if args.summary {
        eprintln!("{}", serde_json::to_string(&summary)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
