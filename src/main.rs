//! Command-line entry point.
//!
//! Thin consumer of the analysis engine: runs one analysis and prints the
//! summary or the serialized report. Exit code 1 signals predicted
//! conflicts, 2 an analysis failure.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use premerge::application::ConflictAnalyzer;
use premerge::domain::AnalysisError;
use premerge::infra::git::GitCli;

#[derive(Parser, Debug)]
#[command(name = "premerge")]
#[command(about = "Predict merge conflicts between two branches before merging", long_about = None)]
struct Args {
    /// Branch being merged
    source: String,

    /// Branch being merged into
    target: String,

    /// Repository path (defaults to the current directory)
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Adjacency threshold in lines for MEDIUM classification
    #[arg(long, default_value_t = 3)]
    threshold: u32,

    /// Per-git-call timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args).await {
        Ok(has_conflicts) => {
            if has_conflicts {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

async fn run(args: &Args) -> Result<bool> {
    let vcs = GitCli::new(&args.repo)
        .context("set up git backend")?
        .with_call_timeout(Duration::from_secs(args.timeout_secs));

    let analyzer = ConflictAnalyzer::new(Arc::new(vcs)).with_threshold(args.threshold);

    let analysis = match analyzer.analyze(&args.source, &args.target).await {
        Ok(analysis) => analysis,
        Err(err @ AnalysisError::NoMergeBase { .. }) => {
            return Err(anyhow::Error::new(err));
        }
        Err(AnalysisError::Vcs(err)) => return Err(err.context("analysis failed")),
    };

    let report = analysis.report();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(report.has_conflicts());
    }

    println!("{}", report.summary());
    for conflict in &analysis.conflicts {
        println!(
            "  [{}] {} (source {} by {}, target {} by {})",
            conflict.severity,
            conflict.file,
            conflict.source_range,
            conflict.source_author,
            conflict.target_range,
            conflict.target_author
        );
    }
    if !analysis.safe_files.is_empty() {
        println!("safe files: {}", analysis.safe_files.join(", "));
    }

    Ok(report.has_conflicts())
}
