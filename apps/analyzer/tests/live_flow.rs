//! Live capture end to end: framed bytes through decoding, classification,
//! reconstruction, scoring and comparison.

mod common;

use analyzer::domain::{Mode, Suit};
use analyzer::protocol::{ActionKind, FrameBuilder};
use analyzer::{analyze_live, decode_frames, AnalyzerConfig, Classifier, LiveStateTracker};
use common::{wire, Capture};

fn two_round_capture() -> Capture {
    let mut cap = Capture::new();
    cap.snapshot([8, 8, 8, 8], 3, "bidding")
        .bid(0, "pass")
        .bid(1, "sun")
        .bid(2, "pass")
        .bid(3, "pass")
        .snapshot([8, 8, 8, 8], 3, "play")
        // Embedded result deliberately disagrees with the next-acting seat.
        .trick(0, ["AS", "7S", "8S", "9S"], 0, 2)
        .trick(0, ["TS", "JS", "QS", "KS"], 0, 0)
        .push_bytes(vec![0x80, 0x00, 0x10, 0x12]);

    cap.snapshot([8, 8, 8, 8], 0, "bidding")
        .bid(1, "hokum")
        .bid(1, "hearts");
    cap.push_bytes(
        wire(FrameBuilder::new().int("cp", common::idx("7H")).byte("ps", 1)).compressed_frame(),
    );
    cap.play(2, "AS")
        .play(3, "8C")
        .play(0, "9C")
        .push(FrameBuilder::new().byte("eat", 1).byte("mv", 1).byte("rs", 1));
    cap
}

#[test]
fn frames_reconstruct_rounds_and_tricks() {
    let config = AnalyzerConfig::default();
    let classifier = Classifier::default();
    let cap = two_round_capture();
    let events = decode_frames(cap.frames(), &config, &classifier);
    assert_eq!(events.len(), cap.frames().len());

    let unknown: Vec<_> = events
        .iter()
        .filter(|e| e.action == ActionKind::Unknown)
        .collect();
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].raw_preview.as_deref(), Some("80001012"));
    assert!(!unknown[0].decode_errors.is_empty());

    let analysis = analyze_live("live-1", &events, &config);
    let rounds = &analysis.extraction.rounds;
    assert_eq!(rounds.len(), 2);
    assert_eq!(analysis.extraction.events_scanned, events.len());

    assert_eq!(rounds[0].dealer, Some(3));
    assert_eq!(rounds[0].mode, Some(Mode::Sun));
    assert_eq!(rounds[0].tricks.len(), 2);
    assert_eq!(rounds[0].tricks[0].winner, 0);
    assert_eq!(rounds[0].tricks[0].leader, Some(0));

    assert_eq!(rounds[1].dealer, Some(0));
    assert_eq!(rounds[1].mode, Some(Mode::Hokum));
    assert_eq!(rounds[1].trump, Some(Suit::Hearts));
    assert_eq!(rounds[1].tricks.len(), 1);
    assert_eq!(rounds[1].tricks[0].winner, 1);

    assert!(analysis.extraction.warnings.is_empty());
    assert_eq!(analysis.comparison.total_tricks, 3);
    assert_eq!(analysis.comparison.agreed_tricks, 3);
    assert!(analysis.comparison.divergences.is_empty());
}

#[test]
fn rerunning_a_session_is_deterministic() {
    let config = AnalyzerConfig::default();
    let classifier = Classifier::default();
    let cap = two_round_capture();

    let run = || {
        let events = decode_frames(cap.frames(), &config, &classifier);
        let analysis = analyze_live("live-det", &events, &config);
        serde_json::to_value(&analysis).expect("analysis serializes")
    };
    assert_eq!(run(), run());
}

#[test]
fn tracker_follows_the_consumer_seat() {
    let config = AnalyzerConfig::default();
    let classifier = Classifier::default();
    let mut cap = Capture::new();
    cap.push(
        FrameBuilder::new()
            .int_array("tc", &[-1, common::idx("QD"), -1, -1])
            .bytes("hc", &[8, 7, 8, 8])
            .byte("dl", 0)
            .string_array("pn", &["Ali", "Sara", "Omar", "Huda"])
            .bytes("hd", &[12, 25, 38])
            .short_array("sc", &[40, 75]),
    );
    let events = decode_frames(cap.frames(), &config, &classifier);
    assert_eq!(events[0].action, ActionKind::StateSnapshot);

    let mut tracker = LiveStateTracker::new("omar", config.fields.clone());
    for event in &events {
        tracker.observe(event);
    }
    assert_eq!(tracker.my_seat(), Some(2));
    let view = tracker.view();
    // Seat 1 sits to the consumer's right, relative position 3.
    assert!(view.table[3].is_some());
    assert_eq!(view.dealer, Some(2));
    assert_eq!(view.hand.len(), 3);
    assert_eq!(view.scores, Some([40, 75]));
}
