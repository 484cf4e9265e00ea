use crate::protocol::classifier::vocabulary::{ActionKind, ClassifierConfig};
use crate::protocol::value::DecodedValue;

/// One step of the classification chain. Each variant inspects a different
/// view of the value tree and either names an action or defers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Matcher {
    /// Keys of the parameter object (`root.p`).
    NestedParamKey,
    /// Keys of the inner parameter object (`root.p.p`).
    DoublyNestedParamKey,
    TopLevelKey,
    /// String values at root and parameter levels (command names).
    ExactValue,
    Fingerprint,
    /// `controller:action-id` pair at the root.
    NumericCode,
    SubstringScan,
}

impl Matcher {
    /// Chain order; the first matcher that answers wins.
    pub const CHAIN: [Matcher; 7] = [
        Matcher::NestedParamKey,
        Matcher::DoublyNestedParamKey,
        Matcher::TopLevelKey,
        Matcher::ExactValue,
        Matcher::Fingerprint,
        Matcher::NumericCode,
        Matcher::SubstringScan,
    ];

    pub fn apply(self, root: &DecodedValue, config: &ClassifierConfig) -> Option<ActionKind> {
        match self {
            Matcher::NestedParamKey => params(root, config).and_then(|p| by_key(p, config)),
            Matcher::DoublyNestedParamKey => params(root, config)
                .and_then(|p| params(p, config))
                .and_then(|pp| by_key(pp, config)),
            Matcher::TopLevelKey => by_key(root, config),
            Matcher::ExactValue => by_value(root, config),
            Matcher::Fingerprint => by_fingerprint(root, config),
            Matcher::NumericCode => by_numeric(root, config),
            Matcher::SubstringScan => by_substring(root, config),
        }
    }
}

fn params<'a>(v: &'a DecodedValue, config: &ClassifierConfig) -> Option<&'a DecodedValue> {
    v.get(&config.params_key).filter(|p| p.is_object())
}

fn by_key(obj: &DecodedValue, config: &ClassifierConfig) -> Option<ActionKind> {
    config
        .key_actions
        .iter()
        .find(|(key, _)| obj.get(key).is_some())
        .map(|(_, action)| *action)
}

/// Root, then `p`, then `p.p`.
fn levels<'a>(root: &'a DecodedValue, config: &ClassifierConfig) -> Vec<&'a DecodedValue> {
    let mut out = vec![root];
    if let Some(p) = params(root, config) {
        out.push(p);
        if let Some(pp) = params(p, config) {
            out.push(pp);
        }
    }
    out
}

fn by_value(root: &DecodedValue, config: &ClassifierConfig) -> Option<ActionKind> {
    levels(root, config).into_iter().find_map(|level| match level {
        DecodedValue::Object(fields) => fields.iter().find_map(|(_, v)| {
            v.as_str()
                .and_then(|s| config.value_actions.get(&s.to_ascii_lowercase()))
                .copied()
        }),
        _ => None,
    })
}

fn by_fingerprint(root: &DecodedValue, config: &ClassifierConfig) -> Option<ActionKind> {
    let levels = levels(root, config);
    config.fingerprints.iter().find_map(|fp| {
        levels
            .iter()
            .any(|level| fp.keys.iter().all(|k| level.get(k).is_some()))
            .then_some(fp.action)
    })
}

fn by_numeric(root: &DecodedValue, config: &ClassifierConfig) -> Option<ActionKind> {
    let controller = root.get(&config.controller_key)?.as_i64()?;
    let action = root.get(&config.action_id_key)?.as_i64()?;
    config.numeric_actions.get(&(controller, action)).copied()
}

fn by_substring(root: &DecodedValue, config: &ClassifierConfig) -> Option<ActionKind> {
    if !root.is_object() {
        return None;
    }
    let text = root.to_json().to_string().to_ascii_lowercase();
    config
        .substrings
        .iter()
        .find(|(needle, _)| text.contains(needle.as_str()))
        .map(|(_, action)| *action)
}
