//! Classification-and-dedup pipeline.
//!
//! Every inbound message flows through, in strict order:
//! 1. no-text drop
//! 2. lazy expiry sweep of the duplicate store
//! 3. stop-phrase veto → quarantine destination (bypasses dedup)
//! 4. fuzzy duplicate suppression
//! 5. key-phrase admission → primary destination
//! 6. drop

pub mod classifier;
pub mod dedup;
pub mod normalize;
pub mod rules;
pub mod types;

pub use classifier::classify;
pub use dedup::DuplicateStore;
pub use rules::RuleSets;
pub use types::{DropReason, NewMessageEvent, RouteDecision};
