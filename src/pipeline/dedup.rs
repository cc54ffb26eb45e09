//! Time-windowed near-duplicate store with fuzzy matching.
//!
//! Holds the raw text of every message admitted by the key-phrase branch,
//! with its admission time. A candidate is a duplicate when any retained
//! original scores at or above [`SIMILARITY_THRESHOLD`]. Expiry is lazy:
//! the dispatch loop sweeps once per incoming message, before the
//! similarity check, so stale entries never count as live duplicates.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// Similarity ratio (inclusive) at or above which a message counts as a
/// duplicate.
pub const SIMILARITY_THRESHOLD: f64 = 90.0;

/// Default retention window for admitted messages.
const FILTER_DURATION_HOURS: i64 = 24;

/// Previously admitted message texts, keyed by the raw original.
///
/// Exclusively owned and mutated by the dispatch loop; the sequential
/// consumer is the single-writer guarantee.
#[derive(Debug)]
pub struct DuplicateStore {
    entries: HashMap<String, DateTime<Utc>>,
    window: Duration,
}

impl DuplicateStore {
    /// Store with the default 24-hour retention window.
    pub fn new() -> Self {
        Self::with_window(Duration::hours(FILTER_DURATION_HOURS))
    }

    /// Store with a custom retention window.
    pub fn with_window(window: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            window,
        }
    }

    /// Fuzzy similarity ratio between two raw texts.
    ///
    /// Symmetric, 0–100, 100 for identical strings. Texts are compared
    /// as-is — case and spacing differences lower the score.
    pub fn similarity(a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b) * 100.0
    }

    /// True iff any retained original scores at or above
    /// [`SIMILARITY_THRESHOLD`] against the candidate.
    ///
    /// O(n) over the store; n is bounded by the retention window.
    pub fn is_similar_to_any(&self, text: &str) -> bool {
        self.entries
            .keys()
            .any(|stored| Self::similarity(stored, text) >= SIMILARITY_THRESHOLD)
    }

    /// Record an admitted message. Re-admitting an existing text
    /// refreshes its timestamp.
    pub fn admit(&mut self, text: &str, now: DateTime<Utc>) {
        self.entries.insert(text.to_owned(), now);
    }

    /// Remove entries strictly older than the retention window.
    pub fn expire(&mut self, now: DateTime<Utc>) {
        self.entries.retain(|_, admitted_at| now - *admitted_at <= self.window);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DuplicateStore {
    fn default() -> Self {
        Self::new()
    }
}
