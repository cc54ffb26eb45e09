//! Dispatch loop — consumes events, classifies, forwards.
//!
//! One sequential consumer: messages are processed in arrival order, one
//! at a time, and the loop is the sole writer of the duplicate store.
//! Pacing and cooldown are plain sleeps on this task — suspension points,
//! not blocking waits — so the surrounding runtime keeps doing its work.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::StreamExt;
use tokio::sync::watch;
use tracing::{error, info};

use crate::channels::{EventStream, Forwarder};
use crate::error::TransportError;
use crate::pipeline::{DuplicateStore, NewMessageEvent, RouteDecision, RuleSets, classify};

/// Pause after each successful primary forward, for destination-side
/// rate limits.
pub const FORWARD_PACING: Duration = Duration::from_secs(2);

/// Cooldown after a failed forward. The failed message is not retried.
pub const FAILURE_COOLDOWN: Duration = Duration::from_secs(60);

/// Sequential dispatch loop owning the duplicate store.
pub struct Relay {
    rules: RuleSets,
    store: DuplicateStore,
    forwarder: Arc<dyn Forwarder>,
    primary_destination: i64,
    stop_destination: i64,
}

impl Relay {
    pub fn new(
        rules: RuleSets,
        forwarder: Arc<dyn Forwarder>,
        primary_destination: i64,
        stop_destination: i64,
    ) -> Self {
        Self {
            rules,
            store: DuplicateStore::new(),
            forwarder,
            primary_destination,
            stop_destination,
        }
    }

    /// Consume the stream until Ctrl+C or the source disconnects.
    pub async fn run(self, events: EventStream) {
        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl+C received, shutting down");
                let _ = tx.send(true);
            }
        });

        self.run_with_shutdown(events, rx).await;
    }

    /// Like [`Relay::run`], but stops when `shutdown` fires. Shutdown is
    /// honored between messages — in-flight work finishes first, and no
    /// further events are drained.
    pub async fn run_with_shutdown(
        mut self,
        mut events: EventStream,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!(
            primary = self.primary_destination,
            quarantine = self.stop_destination,
            "Relay ready and listening"
        );

        loop {
            let event = tokio::select! {
                biased;
                _ = shutdown.changed() => {
                    info!("Shutdown requested, exiting");
                    break;
                }
                ev = events.next() => match ev {
                    Some(ev) => ev,
                    None => {
                        info!("Event stream ended, shutting down");
                        break;
                    }
                },
            };

            self.dispatch(&event).await;
        }
    }

    /// Classify one event and perform the resulting forward action.
    ///
    /// A transport failure is logged and followed by the fixed cooldown;
    /// the message is considered lost and the loop resumes with the next
    /// event.
    async fn dispatch(&mut self, event: &NewMessageEvent) {
        info!(
            chat_id = event.chat_id,
            message_id = event.message_id,
            "Received new message"
        );

        let decision = classify(&event.text, Utc::now(), &self.rules, &mut self.store);

        match decision {
            RouteDecision::ForwardQuarantine => {
                match self.forwarder.forward(self.stop_destination, event).await {
                    Ok(()) => info!(
                        chat_id = event.chat_id,
                        destination = self.stop_destination,
                        "Stop phrase hit, forwarded to quarantine"
                    ),
                    Err(e) => self.cool_down(&e).await,
                }
            }
            RouteDecision::ForwardPrimary => {
                match self.forwarder.forward(self.primary_destination, event).await {
                    Ok(()) => {
                        info!(
                            chat_id = event.chat_id,
                            destination = self.primary_destination,
                            "Forwarded message"
                        );
                        tokio::time::sleep(FORWARD_PACING).await;
                    }
                    Err(e) => self.cool_down(&e).await,
                }
            }
            RouteDecision::Drop(_) => {
                info!(
                    chat_id = event.chat_id,
                    reason = decision.label(),
                    "Dropped message"
                );
            }
        }
    }

    async fn cool_down(&self, err: &TransportError) {
        error!(
            error = %err,
            cooldown_secs = FAILURE_COOLDOWN.as_secs(),
            "Forward failed, cooling down"
        );
        tokio::time::sleep(FAILURE_COOLDOWN).await;
    }
}
