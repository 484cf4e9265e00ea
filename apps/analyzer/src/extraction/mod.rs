//! Session reconstruction: ordered events into rounds, tricks and bids.

pub mod archive;
pub mod bidding;
pub mod boundary;
pub mod live;
pub mod machine;
pub mod seat_view;
pub mod types;

pub use archive::ArchiveSession;
pub use bidding::{Bid, BidAction, BidResolution, BidSequence, Escalation};
pub use boundary::{Boundary, BoundaryDetector, HandCountResetDetector, MarkerBoundaryDetector};
pub use live::LiveNormalizer;
pub use machine::RoundStateMachine;
pub use seat_view::{LiveStateTracker, LiveView};
pub use types::{
    DeclarationRecord, ExtractedRound, ExtractedTrick, ExtractionResult, ExtractionWarning,
    FoldInfo, RoundFlag, TableEvent, TableSnapshot, WarningKind,
};

use crate::config::{ExtractionConfig, FieldNames};
use crate::protocol::GameEvent;

/// Reconstruct a live capture. `events_scanned` counts wire events.
pub fn extract_live(
    events: &[GameEvent],
    fields: &FieldNames,
    config: &ExtractionConfig,
) -> ExtractionResult {
    let normalizer = LiveNormalizer::new(fields.clone());
    let mut machine = RoundStateMachine::new(
        HandCountResetDetector::new(config.full_hand),
        config.clone(),
    );
    for event in events {
        for table_event in normalizer.normalize(event) {
            machine.apply_event(event.timestamp, table_event);
        }
    }
    let mut result = machine.finish();
    result.events_scanned = events.len();
    result
}

/// Reconstruct an archive session. `events_scanned` counts archive records.
pub fn extract_archive(session: &ArchiveSession, config: &ExtractionConfig) -> ExtractionResult {
    let mut machine = RoundStateMachine::new(MarkerBoundaryDetector, config.clone());
    for (timestamp, event) in &session.events {
        machine.apply_event(*timestamp, event.clone());
    }
    let mut result = machine.finish();
    result.events_scanned = session.records_scanned;
    let mut warnings = session.warnings.clone();
    warnings.append(&mut result.warnings);
    result.warnings = warnings;
    result
}
