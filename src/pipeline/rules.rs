//! Stop-phrase and key-phrase rule sets, precomputed at startup.
//!
//! Phrases are normalized once at construction; every lookup normalizes
//! the candidate text and tests substring containment, so matching is
//! insensitive to case and internal spacing on both sides.

use crate::error::ConfigError;
use crate::pipeline::normalize::normalize;

/// Immutable phrase sets driving the routing decision.
#[derive(Debug, Clone)]
pub struct RuleSets {
    stop_phrases: Vec<String>,
    key_phrases: Vec<String>,
}

impl RuleSets {
    /// Build rule sets from raw phrase lists.
    ///
    /// Fails if either list is empty once blank entries are dropped: an
    /// empty set would make its predicate vacuously false and silently
    /// collapse the pipeline, so this surfaces at startup instead.
    pub fn new<S: AsRef<str>>(stop_phrases: &[S], key_phrases: &[S]) -> Result<Self, ConfigError> {
        let stop_phrases = normalize_list(stop_phrases);
        let key_phrases = normalize_list(key_phrases);

        if stop_phrases.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "RELAY_STOP_PHRASES".into(),
                hint: "configure at least one non-blank stop phrase".into(),
            });
        }
        if key_phrases.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "RELAY_KEY_PHRASES".into(),
                hint: "configure at least one non-blank key phrase".into(),
            });
        }

        Ok(Self {
            stop_phrases,
            key_phrases,
        })
    }

    /// True iff any stop phrase occurs in the normalized text.
    pub fn contains_stop_phrase(&self, text: &str) -> bool {
        contains_any(&self.stop_phrases, text)
    }

    /// True iff any key phrase occurs in the normalized text.
    pub fn contains_key_phrase(&self, text: &str) -> bool {
        contains_any(&self.key_phrases, text)
    }
}

fn normalize_list<S: AsRef<str>>(phrases: &[S]) -> Vec<String> {
    phrases
        .iter()
        .map(|p| normalize(p.as_ref()))
        .filter(|p| !p.is_empty())
        .collect()
}

fn contains_any(phrases: &[String], text: &str) -> bool {
    let clean = normalize(text);
    phrases.iter().any(|p| clean.contains(p.as_str()))
}
