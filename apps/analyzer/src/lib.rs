#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod comparator;
pub mod config;
pub mod domain;
pub mod error;
pub mod extraction;
pub mod protocol;
pub mod scoring;
pub mod session;
pub mod telemetry;

// Re-exports for public API
pub use comparator::{ComparisonReport, DivergenceLog, Scorecard};
pub use config::{AnalyzerConfig, ComparatorConfig, ExtractionConfig, FieldNames};
pub use error::AnalyzerError;
pub use extraction::{ExtractionResult, LiveStateTracker, RoundStateMachine};
pub use protocol::{decode, Classifier, ClassifierConfig, GameEvent};
pub use scoring::{score_round, PointAnalysis};
pub use session::{analyze_archive, analyze_live, decode_frames, CapturedFrame, SessionAnalysis};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    analyzer_test_support::logging::init();
}
