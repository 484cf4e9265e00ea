//! Whole-pipeline properties over randomly dealt archive sessions.

mod common;

include!("common/proptest_prelude.rs");

use analyzer::domain::Mode;
use analyzer::{analyze_archive, AnalyzerConfig};
use analyzer_test_support::archive::{deck_tokens, ArchiveBuilder};
use proptest::prelude::*;
use serde_json::Value;

/// One complete round: the deck is cut into eight tricks, each led by the
/// previous trick's winner.
fn dealt_round(
    deck: &[String],
    winners: &[u8],
    mode: Mode,
    trump: Option<&str>,
) -> Value {
    let mode_name = match mode {
        Mode::Sun => "sun",
        Mode::Hokum => "hokum",
    };
    let mut builder = ArchiveBuilder::new("prop").round_start(3, Some(mode_name), trump);
    let mut leader = 0u8;
    for (chunk, &winner) in deck.chunks(4).zip(winners) {
        let cards = [
            chunk[0].as_str(),
            chunk[1].as_str(),
            chunk[2].as_str(),
            chunk[3].as_str(),
        ];
        builder = builder.trick(leader, cards, winner);
        leader = winner;
    }
    builder.build()
}

fn session() -> impl Strategy<Value = (Vec<String>, Vec<u8>, Mode, Option<&'static str>)> {
    (
        Just(deck_tokens()).prop_shuffle(),
        proptest::collection::vec(0u8..4, 8),
        prop_oneof![Just(Mode::Sun), Just(Mode::Hokum)],
        prop_oneof![Just("S"), Just("H"), Just("C"), Just("D")],
    )
        .prop_map(|(deck, winners, mode, suit)| {
            let trump = (mode == Mode::Hokum).then_some(suit);
            (deck, winners, mode, trump)
        })
}

proptest! {
    #![proptest_config(proptest_prelude_config())]

    #[test]
    fn complete_rounds_hit_deck_total_and_target(
        (deck, winners, mode, trump) in session()
    ) {
        let doc = dealt_round(&deck, &winners, mode, trump);
        let analysis = analyze_archive(&doc, "p", &AnalyzerConfig::default()).unwrap();
        let pa = &analysis.score.rounds[0];
        prop_assert!(pa.complete);
        prop_assert_eq!(pa.card_points[0] + pa.card_points[1], mode.deck_total());
        prop_assert_eq!(pa.card_gp[0] + pa.card_gp[1], mode.gp_target());
        prop_assert_eq!(analysis.comparison.total_tricks, 8);
        prop_assert_eq!(
            analysis.comparison.agreed_tricks + analysis.comparison.divergences.len(),
            8
        );
    }

    #[test]
    fn rerun_is_identical((deck, winners, mode, trump) in session()) {
        let doc = dealt_round(&deck, &winners, mode, trump);
        let config = AnalyzerConfig::default();
        let a = serde_json::to_value(analyze_archive(&doc, "p", &config).unwrap()).unwrap();
        let b = serde_json::to_value(analyze_archive(&doc, "p", &config).unwrap()).unwrap();
        prop_assert_eq!(a, b);
    }
}

#[test]
fn parallel_sessions_match_their_sequential_runs() {
    let deck = deck_tokens();
    let mut reversed = deck.clone();
    reversed.reverse();
    let docs = [
        dealt_round(&deck, &[0, 1, 2, 3, 0, 1, 2, 3], Mode::Sun, None),
        dealt_round(&reversed, &[1, 1, 3, 0, 2, 2, 0, 1], Mode::Hokum, Some("H")),
    ];
    let config = AnalyzerConfig::default();
    let run = |doc: &Value, name: &str| {
        serde_json::to_value(analyze_archive(doc, name, &config).unwrap()).unwrap()
    };

    let sequential = [run(&docs[0], "left"), run(&docs[1], "right")];
    let parallel = std::thread::scope(|s| {
        let left = s.spawn(|| run(&docs[0], "left"));
        let right = s.spawn(|| run(&docs[1], "right"));
        [left.join().unwrap(), right.join().unwrap()]
    });

    assert_ne!(sequential[0], sequential[1]);
    assert_eq!(parallel, sequential);
}
