//! Per-message routing decision.
//!
//! Stage order is load-bearing: the stop-phrase veto runs before dedup so
//! repeated policy-violating content is never silently suppressed as a
//! duplicate, and dedup runs before key-phrase admission so a duplicate is
//! never re-admitted and cannot refresh its own retention timestamp.

use chrono::{DateTime, Utc};

use crate::pipeline::dedup::DuplicateStore;
use crate::pipeline::rules::RuleSets;
use crate::pipeline::types::{DropReason, RouteDecision};

/// Classify one message. Total — there is no error path.
///
/// Runs the lazy expiry sweep before the similarity check, so entries
/// past the retention window never count as live duplicates.
pub fn classify(
    text: &str,
    now: DateTime<Utc>,
    rules: &RuleSets,
    store: &mut DuplicateStore,
) -> RouteDecision {
    if text.is_empty() {
        return RouteDecision::Drop(DropReason::NoText);
    }

    store.expire(now);

    if rules.contains_stop_phrase(text) {
        return RouteDecision::ForwardQuarantine;
    }

    if store.is_similar_to_any(text) {
        return RouteDecision::Drop(DropReason::Duplicate);
    }

    if rules.contains_key_phrase(text) {
        store.admit(text, now);
        return RouteDecision::ForwardPrimary;
    }

    RouteDecision::Drop(DropReason::NoKeyPhrase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn rules() -> RuleSets {
        RuleSets::new(&["scam"], &["deal"]).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        "2026-01-10T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn empty_text_is_dropped_without_touching_the_store() {
        let mut store = DuplicateStore::new();
        let decision = classify("", t0(), &rules(), &mut store);
        assert_eq!(decision, RouteDecision::Drop(DropReason::NoText));
        assert!(store.is_empty());
    }

    #[test]
    fn stop_phrase_wins_over_key_phrase_and_is_not_admitted() {
        let mut store = DuplicateStore::new();
        let decision = classify("this is a scam deal", t0(), &rules(), &mut store);
        assert_eq!(decision, RouteDecision::ForwardQuarantine);
        assert!(store.is_empty());
    }

    #[test]
    fn repeated_stop_phrase_messages_always_forward() {
        let mut store = DuplicateStore::new();
        for _ in 0..3 {
            let decision = classify("this is a scam deal", t0(), &rules(), &mut store);
            assert_eq!(decision, RouteDecision::ForwardQuarantine);
        }
        assert!(store.is_empty());
    }

    #[test]
    fn stop_phrase_wins_even_when_similar_to_a_stored_message() {
        let mut store = DuplicateStore::new();
        // Admitted via the key-phrase branch ("scan" is not "scam").
        let admitted = "mega deal on graphics cards at the scan warehouse outlet";
        assert_eq!(
            classify(admitted, t0(), &rules(), &mut store),
            RouteDecision::ForwardPrimary
        );

        // One character away from the stored text, but it now carries a
        // stop phrase — the veto precedes the duplicate check.
        let near_copy = "mega deal on graphics cards at the scam warehouse outlet";
        assert!(DuplicateStore::similarity(admitted, near_copy) >= 90.0);
        assert_eq!(
            classify(near_copy, t0(), &rules(), &mut store),
            RouteDecision::ForwardQuarantine
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn key_phrase_match_is_admitted_and_forwarded() {
        let mut store = DuplicateStore::new();
        let decision = classify("Great  deal!", t0(), &rules(), &mut store);
        assert_eq!(decision, RouteDecision::ForwardPrimary);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn near_duplicate_is_dropped_and_not_readmitted() {
        let mut store = DuplicateStore::new();
        classify("Great  deal!", t0(), &rules(), &mut store);

        let decision = classify("Great  deal!!", t0(), &rules(), &mut store);
        assert_eq!(decision, RouteDecision::Drop(DropReason::Duplicate));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicate_drop_does_not_refresh_the_retention_timestamp() {
        let mut store = DuplicateStore::new();
        classify("Great  deal!", t0(), &rules(), &mut store);

        // A repeat 23h in is suppressed but must not extend retention.
        let decision = classify("Great  deal!", t0() + Duration::hours(23), &rules(), &mut store);
        assert_eq!(decision, RouteDecision::Drop(DropReason::Duplicate));

        // Past the original admission's window the entry is gone, so the
        // same text is admitted fresh.
        let later = t0() + Duration::hours(24) + Duration::minutes(1);
        let decision = classify("Great  deal!", later, &rules(), &mut store);
        assert_eq!(decision, RouteDecision::ForwardPrimary);
    }

    #[test]
    fn expired_entry_no_longer_blocks_admission() {
        let mut store = DuplicateStore::new();
        classify("Great  deal!", t0(), &rules(), &mut store);

        let just_inside = t0() + Duration::hours(23) + Duration::minutes(59);
        assert_eq!(
            classify("Great  deal!", just_inside, &rules(), &mut store),
            RouteDecision::Drop(DropReason::Duplicate)
        );

        let just_outside = t0() + Duration::hours(24) + Duration::minutes(1);
        assert_eq!(
            classify("Great  deal!", just_outside, &rules(), &mut store),
            RouteDecision::ForwardPrimary
        );
    }

    #[test]
    fn no_key_phrase_drops_and_admits_nothing() {
        let mut store = DuplicateStore::new();
        let decision = classify("weather is lovely today", t0(), &rules(), &mut store);
        assert_eq!(decision, RouteDecision::Drop(DropReason::NoKeyPhrase));
        assert!(store.is_empty());
    }

    #[test]
    fn spec_scenario_end_to_end() {
        let mut store = DuplicateStore::new();

        // "Great  deal!" → normalized "greatdeal!" contains "deal"
        assert_eq!(
            classify("Great  deal!", t0(), &rules(), &mut store),
            RouteDecision::ForwardPrimary
        );

        // A raw near-copy of the stored original is suppressed
        assert_eq!(
            classify("Great  deal!!", t0(), &rules(), &mut store),
            RouteDecision::Drop(DropReason::Duplicate)
        );

        // Stop phrase routes to quarantine regardless of "deal"
        assert_eq!(
            classify("this is a scam deal", t0(), &rules(), &mut store),
            RouteDecision::ForwardQuarantine
        );
    }
}
