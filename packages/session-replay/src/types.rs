//! Shared types for the replay CLI.

use analyzer::SessionAnalysis;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// One session per line, written as each session finishes
    Jsonl,
    /// A single document with every session and the batch scorecard
    Json,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum DetailLevel {
    /// Comparison report only
    Report,
    /// Extraction, scoring and comparison
    Full,
}

/// One row of the CSV summary.
#[derive(Debug, Serialize)]
pub struct CsvSummaryRow {
    pub session: String,
    pub analyzed_at: String,
    pub rounds: usize,
    pub tricks: usize,
    pub agreed_tricks: usize,
    pub agreement_pct: f64,
    pub point_consistency_pct: f64,
    pub divergences: usize,
    pub warnings: usize,
    pub team0_gp: i32,
    pub team1_gp: i32,
}

impl CsvSummaryRow {
    pub fn new(analysis: &SessionAnalysis, analyzed_at: &str) -> Self {
        let report = &analysis.comparison;
        Self {
            session: analysis.session.clone(),
            analyzed_at: analyzed_at.to_string(),
            rounds: analysis.extraction.rounds.len(),
            tricks: report.total_tricks,
            agreed_tricks: report.agreed_tricks,
            agreement_pct: report.agreement_pct,
            point_consistency_pct: report.point_consistency_pct,
            divergences: report.divergences.len(),
            warnings: analysis.extraction.warnings.len(),
            team0_gp: analysis.score.totals[0],
            team1_gp: analysis.score.totals[1],
        }
    }
}
