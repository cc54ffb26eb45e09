//! Shared types for the relay pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Inbound event ───────────────────────────────────────────────────

/// One inbound message from a watched chat.
///
/// The transport adapter converts its native update format into this
/// struct. It lives for a single dispatch cycle; nothing retains message
/// content beyond the dedup window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessageEvent {
    /// Chat the message arrived in.
    pub chat_id: i64,
    /// Platform message id. Together with `chat_id` this is the opaque
    /// handle a `Forwarder` needs to relay the original message.
    pub message_id: i64,
    /// Message body. Empty when the update carried no text.
    pub text: String,
    /// When the message was received.
    pub received_at: DateTime<Utc>,
}

// ── Routing decision ────────────────────────────────────────────────

/// Routing decision for one message. First matching pipeline stage wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Key phrase matched and no live duplicate: forward to the primary
    /// destination.
    ForwardPrimary,
    /// Stop phrase matched: forward to the quarantine destination.
    /// Repeats are forwarded too — quarantine traffic is never deduped.
    ForwardQuarantine,
    /// Not forwarded.
    Drop(DropReason),
}

/// Why a message was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The update carried no text.
    NoText,
    /// Scored at or above the similarity threshold against a retained
    /// original.
    Duplicate,
    /// No key phrase matched.
    NoKeyPhrase,
}

impl RouteDecision {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ForwardPrimary => "forward_primary",
            Self::ForwardQuarantine => "forward_quarantine",
            Self::Drop(DropReason::NoText) => "drop_no_text",
            Self::Drop(DropReason::Duplicate) => "drop_duplicate",
            Self::Drop(DropReason::NoKeyPhrase) => "drop_no_key_phrase",
        }
    }
}
