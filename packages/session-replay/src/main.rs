//! Session replay CLI - batch analysis of archived Baloot sessions.
//!
//! Reads archive documents (plain or gzip, JSON or JSONL), runs each session
//! through extraction, scoring and comparison, and writes the reports as JSON.
//! A session that fails to parse or analyze is logged and counted; the batch
//! continues.

mod input;
mod output;
mod types;

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use analyzer::{analyze_archive, AnalyzerConfig, DivergenceLog, Scorecard, SessionAnalysis};
use clap::Parser;
use input::{collect_inputs, read_sources};
use output::{create_file, OutputWriter};
use tracing::{info, warn};
use types::{DetailLevel, OutputFormat};

#[derive(Parser)]
#[command(name = "session-replay")]
#[command(about = "Replay archived Baloot sessions through the analyzer")]
struct Args {
    /// Archive files or directories (.json, .jsonl, optionally .gz)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show the batch summary and scorecard on stderr
    #[arg(long)]
    show_output: bool,

    /// Structured JSON logs filtered by RUST_LOG (default info)
    #[arg(long, conflicts_with = "verbose")]
    log_json: bool,

    /// Write reports to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "jsonl")]
    output_format: OutputFormat,

    /// Report detail level
    #[arg(long, default_value = "report")]
    detail: DetailLevel,

    /// Also write a per-session CSV summary (gzip if the path ends in .gz)
    #[arg(long)]
    summary_csv: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the reports.
    if args.log_json {
        analyzer::telemetry::init_tracing();
    } else {
        let filter = if args.verbose {
            "debug"
        } else if args.show_output {
            "info"
        } else {
            "warn"
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = AnalyzerConfig::from_env()?;
    let paths = collect_inputs(&args.inputs)?;
    if args.show_output {
        info!("Replaying {} input file(s)", paths.len());
    }

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(create_file(path)?),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = OutputWriter::new(
        sink,
        args.output_format.clone(),
        args.detail.clone(),
        args.summary_csv.as_deref(),
    )?;

    let start = Instant::now();
    let mut analyses: Vec<SessionAnalysis> = Vec::new();
    let mut log = DivergenceLog::new();
    let mut errors = 0u32;

    for path in &paths {
        let sources = match read_sources(path) {
            Ok(sources) => sources,
            Err(e) => {
                errors += 1;
                warn!("Failed to read {}: {}", path.display(), e);
                continue;
            }
        };
        for source in sources {
            let analysis = source
                .doc
                .map_err(|e| e.to_string())
                .and_then(|doc| {
                    analyze_archive(&doc, &source.name, &config).map_err(|e| e.to_string())
                });
            match analysis {
                Ok(analysis) => {
                    if let Err(e) = writer.write_session(&analysis) {
                        warn!("Failed to write report for {}: {}", analysis.session, e);
                    }
                    log.extend(analysis.comparison.divergences.iter().cloned());
                    analyses.push(analysis);
                }
                Err(e) => {
                    errors += 1;
                    warn!("Session {} failed: {}", source.name, e);
                }
            }
        }
    }

    let reports: Vec<_> = analyses.iter().map(|a| a.comparison.clone()).collect();
    let scorecard = Scorecard::from_reports(&reports, &config.comparator);
    let csv_path = writer.csv_path().cloned();
    writer.finish(&scorecard, &log)?;

    if args.show_output {
        if let Some(path) = csv_path {
            info!("Summary CSV written to: {}", path.display());
        }
        print_summary(&analyses, &scorecard, &log, errors, start.elapsed());
    }

    Ok(())
}

fn print_summary(
    analyses: &[SessionAnalysis],
    scorecard: &Scorecard,
    log: &DivergenceLog,
    errors: u32,
    elapsed: std::time::Duration,
) {
    eprintln!("\n=== Replay Summary ===");
    eprintln!("Sessions analyzed: {}", analyses.len());
    if errors > 0 {
        eprintln!("Errors: {}", errors);
    }
    eprintln!("Total time: {:?}", elapsed);

    let rounds: usize = analyses.iter().map(|a| a.extraction.rounds.len()).sum();
    let warnings: usize = analyses.iter().map(|a| a.extraction.warnings.len()).sum();
    eprintln!("Rounds: {}, extraction warnings: {}", rounds, warnings);

    eprintln!("\n=== Scorecard ===");
    for c in &scorecard.categories {
        eprintln!(
            "{:<18} {:>5}/{:<5} {:>6.1}%  {:?}",
            c.name, c.passed, c.total, c.pct, c.grade
        );
    }

    if !log.is_empty() {
        eprintln!("\n=== Divergences ({}) ===", log.len());
        for (kind, n) in log.counts_by_kind() {
            eprintln!("{:<16} {}", kind.label(), n);
        }
        for (severity, n) in log.counts_by_severity() {
            eprintln!("{:<16} {}", format!("{severity:?}"), n);
        }
    }
}
