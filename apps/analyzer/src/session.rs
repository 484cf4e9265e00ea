//! End-to-end pipelines: capture or archive in, reports out.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::comparator::{compare_session, ComparisonReport};
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::extraction::{extract_archive, extract_live, ArchiveSession, ExtractionResult};
use crate::protocol::{Classifier, Direction, GameEvent};
use crate::scoring::{score_session, SessionScore};

/// One intercepted frame, still encoded.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub timestamp: i64,
    pub direction: Direction,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionAnalysis {
    pub session: String,
    pub extraction: ExtractionResult,
    pub score: SessionScore,
    pub comparison: ComparisonReport,
}

/// Decode and classify frames in capture order.
pub fn decode_frames(
    frames: &[CapturedFrame],
    config: &AnalyzerConfig,
    classifier: &Classifier,
) -> Vec<GameEvent> {
    frames
        .iter()
        .map(|f| {
            GameEvent::from_frame(
                f.timestamp,
                f.direction,
                &f.bytes,
                false,
                &config.decoder,
                classifier,
            )
        })
        .collect()
}

pub fn analyze_live(session: &str, events: &[GameEvent], config: &AnalyzerConfig) -> SessionAnalysis {
    let extraction = extract_live(events, &config.fields, &config.extraction);
    finish(session, extraction, config)
}

/// `fallback_name` is used when the document carries no `session` field.
pub fn analyze_archive(
    doc: &Value,
    fallback_name: &str,
    config: &AnalyzerConfig,
) -> Result<SessionAnalysis, AnalyzerError> {
    let archive = ArchiveSession::from_value(doc)?;
    let name = archive
        .session
        .clone()
        .unwrap_or_else(|| fallback_name.to_string());
    let extraction = extract_archive(&archive, &config.extraction);
    Ok(finish(&name, extraction, config))
}

fn finish(session: &str, extraction: ExtractionResult, config: &AnalyzerConfig) -> SessionAnalysis {
    let score = score_session(&extraction.rounds);
    let comparison = compare_session(session, &extraction, &config.comparator);
    info!(
        session,
        rounds = extraction.rounds.len(),
        totals = ?score.totals,
        "session analyzed"
    );
    SessionAnalysis {
        session: session.to_string(),
        extraction,
        score,
        comparison,
    }
}
