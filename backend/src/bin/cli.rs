//! ShotMarker command-line tool.
//!
//! ```bash
//! shotmarker shots.csv --prefix club --distance 900 [--x 0] [--y 0] [--output-dir output]
//! ```
//!
//! Writes `{output-dir}/{prefix}_l.svg`, `_m.svg` and `_r.svg` for each firing
//! position that has shots.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use shotmarker::render::{RenderContext, SvgRenderer};
use shotmarker::services::{generate_plots, PlotRequest, SighterPolicy};

#[derive(Parser, Debug)]
#[command(name = "shotmarker", version, about = "Plot shot groups onto target diagrams")]
struct Args {
    /// The csv file to process
    filename: PathBuf,

    /// Prefix for the output files
    #[arg(long)]
    prefix: String,

    /// Distance in meters (300, 500, 600, 700, 800, 900)
    #[arg(long)]
    distance: u32,

    /// X offset in mm; any non-zero value fixes the x window
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    x: i64,

    /// Y offset in mm; any non-zero value fixes the y window
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    y: i64,

    /// Directory the diagrams are written to
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Skip pairs containing sighters instead of stopping the spread scan at the first one
    #[arg(long)]
    exclude_sighters: bool,
}

fn main() -> ExitCode {
    FmtSubscriber::builder()
        .with_max_level(
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .init();

    let args = Args::parse();

    let mut request = PlotRequest::new(
        args.prefix,
        args.distance,
        chrono::Local::now().date_naive(),
    )
    .with_offsets(args.x, args.y);
    if args.exclude_sighters {
        request.sighter_policy = SighterPolicy::ExcludeSighterPairs;
    }

    let renderer = SvgRenderer::new(RenderContext::default());

    match generate_plots(&args.filename, &request, &renderer, &args.output_dir) {
        Ok(outputs) => {
            for file in &outputs.files {
                info!(
                    "{} group: {} ({} shots, score {})",
                    file.position,
                    file.path.display(),
                    file.statistics.shot_count,
                    file.statistics.score_line()
                );
            }
            for failure in &outputs.failures {
                error!("{} group skipped: {}", failure.position, failure.message);
            }
            if outputs.files.is_empty() && outputs.failures.is_empty() {
                info!("No shots with an L, M or R identifier found");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
