//! Maps a decoded value tree to one label of the closed [`ActionKind`] vocabulary.

mod matchers;
mod vocabulary;

use serde::Serialize;
use tracing::trace;

pub use matchers::Matcher;
pub use vocabulary::{ActionKind, ClassifierConfig, Fingerprint};

use crate::protocol::value::DecodedValue;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct Classification {
    pub action: ActionKind,
    /// `None` when nothing matched and the label fell back to `unknown`.
    pub matched_by: Option<Matcher>,
}

/// Immutable classifier; share by reference across sessions.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(&self, root: &DecodedValue) -> Classification {
        for matcher in Matcher::CHAIN {
            if let Some(action) = matcher.apply(root, &self.config) {
                trace!(?matcher, %action, "classified");
                return Classification {
                    action,
                    matched_by: Some(matcher),
                };
            }
        }
        Classification {
            action: ActionKind::Unknown,
            matched_by: None,
        }
    }
}
