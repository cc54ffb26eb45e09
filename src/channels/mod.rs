//! Transport seams: event intake and message forwarding.
//!
//! The relay core never talks to the messaging platform directly — it
//! consumes an [`EventStream`] from an [`EventSource`] and performs its
//! forward actions through a [`Forwarder`]. The Telegram Bot API
//! implementation of both lives in [`telegram`].

pub mod telegram;

pub use telegram::TelegramClient;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::TransportError;
use crate::pipeline::NewMessageEvent;

/// Live stream of inbound message events. Events from all watched chats
/// are fanned into this one sequence, preserving the single-writer
/// guarantee on the duplicate store. Terminates only on disconnect or
/// shutdown.
pub type EventStream = Pin<Box<dyn Stream<Item = NewMessageEvent> + Send>>;

/// Produces the inbound event sequence from the watched chats.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Transport name for logging.
    fn name(&self) -> &str;

    /// Start consuming events. The stream is live and unbounded — it is
    /// not restartable mid-flight.
    async fn subscribe(&self) -> Result<EventStream, TransportError>;
}

/// Forwards an original message to a destination chat.
#[async_trait]
pub trait Forwarder: Send + Sync {
    /// Relay `message` to `destination`, preserving its content as seen
    /// by recipients.
    async fn forward(
        &self,
        destination: i64,
        message: &NewMessageEvent,
    ) -> Result<(), TransportError>;
}
