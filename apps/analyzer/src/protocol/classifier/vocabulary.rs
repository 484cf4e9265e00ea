//! Closed action vocabulary and the immutable tables the classifier matches against.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Semantic label attached to every decoded event.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Bid,
    CardPlayed,
    /// Trick resolved: the table is collected by the winner.
    CardsCollected,
    RoundOver,
    StateSnapshot,
    Connection,
    Chat,
    Declaration,
    Doubling,
    /// Early concession (kaboot).
    Fold,
    GameOver,
    Unknown,
}

impl ActionKind {
    pub const fn label(self) -> &'static str {
        match self {
            ActionKind::Bid => "bid",
            ActionKind::CardPlayed => "card_played",
            ActionKind::CardsCollected => "cards_collected",
            ActionKind::RoundOver => "round_over",
            ActionKind::StateSnapshot => "state_snapshot",
            ActionKind::Connection => "connection",
            ActionKind::Chat => "chat",
            ActionKind::Declaration => "declaration",
            ActionKind::Doubling => "doubling",
            ActionKind::Fold => "fold",
            ActionKind::GameOver => "game_over",
            ActionKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A set of keys that, present together, identify an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    pub keys: Vec<String>,
    pub action: ActionKind,
}

impl Fingerprint {
    pub fn new(keys: &[&str], action: ActionKind) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            action,
        }
    }
}

/// Immutable classifier vocabulary. Built once and handed to
/// [`crate::protocol::classifier::Classifier::new`].
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Key of the parameter object at each nesting level.
    pub params_key: String,
    /// Root keys of the numeric `controller:action-id` pair.
    pub controller_key: String,
    pub action_id_key: String,
    /// Field names that identify an action by their presence; checked in order.
    pub key_actions: Vec<(String, ActionKind)>,
    /// Exact string values (command names) that identify an action.
    pub value_actions: HashMap<String, ActionKind>,
    pub fingerprints: Vec<Fingerprint>,
    pub numeric_actions: HashMap<(i64, i64), ActionKind>,
    /// Last-resort needles searched in the lowercased JSON rendering; checked in order.
    pub substrings: Vec<(String, ActionKind)>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        use ActionKind::*;

        let key_actions = [
            ("bd", Bid),
            ("dbl", Doubling),
            ("cp", CardPlayed),
            ("eat", CardsCollected),
            ("rr", RoundOver),
            ("prj", Declaration),
            ("kbt", Fold),
            ("msg", Chat),
            ("go", GameOver),
        ];
        let value_actions = [
            ("bid", Bid),
            ("a_bid", Bid),
            ("play_card", CardPlayed),
            ("card_played", CardPlayed),
            ("eat_cards", CardsCollected),
            ("cards_collected", CardsCollected),
            ("trick_end", CardsCollected),
            ("round_over", RoundOver),
            ("round_result", RoundOver),
            ("game_state", StateSnapshot),
            ("sync", StateSnapshot),
            ("project", Declaration),
            ("declare", Declaration),
            ("double", Doubling),
            ("kaboot", Fold),
            ("chat", Chat),
            ("pub_msg", Chat),
            ("game_over", GameOver),
            ("login", Connection),
            ("reconnect", Connection),
            ("handshake", Connection),
        ];
        let fingerprints = vec![
            Fingerprint::new(&["tc", "hc", "dl"], StateSnapshot),
            Fingerprint::new(&["mv", "rs"], CardsCollected),
            Fingerprint::new(&["tc", "ps"], CardPlayed),
            Fingerprint::new(&["un", "pw"], Connection),
            Fingerprint::new(&["zn", "un"], Connection),
            Fingerprint::new(&["r", "u", "m"], Chat),
        ];
        let numeric_actions = [
            ((0, 0), Connection),
            ((0, 1), Connection),
            ((0, 2), Connection),
            ((0, 7), Chat),
            ((0, 29), Connection),
        ];
        let substrings = [
            ("kaboot", Fold),
            ("project", Declaration),
            ("double", Doubling),
            ("chat", Chat),
            ("bid", Bid),
            ("card", CardPlayed),
            ("score", RoundOver),
        ];

        Self {
            params_key: "p".to_string(),
            controller_key: "c".to_string(),
            action_id_key: "a".to_string(),
            key_actions: key_actions
                .iter()
                .map(|(k, a)| (k.to_string(), *a))
                .collect(),
            value_actions: value_actions
                .iter()
                .map(|(k, a)| (k.to_string(), *a))
                .collect(),
            fingerprints,
            numeric_actions: numeric_actions.into_iter().collect(),
            substrings: substrings
                .iter()
                .map(|(k, a)| (k.to_string(), *a))
                .collect(),
        }
    }
}
