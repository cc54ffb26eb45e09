//! Telegram transport — long-polls the Bot API for updates and relays
//! messages with `forwardMessage`.
//!
//! Implements both transport seams ([`EventSource`], [`Forwarder`]) on a
//! single client so the update loop and the forward calls share one HTTP
//! client and token.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::channels::{EventSource, EventStream, Forwarder};
use crate::error::TransportError;
use crate::pipeline::NewMessageEvent;

/// Long-poll timeout passed to getUpdates, in seconds.
const POLL_TIMEOUT_SECS: u64 = 30;

/// Delay before retrying after a failed poll cycle.
const POLL_RETRY_DELAY: std::time::Duration = std::time::Duration::from_secs(5);

/// Telegram Bot API client.
pub struct TelegramClient {
    token: Arc<SecretString>,
    watched_chats: HashSet<i64>,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(token: SecretString, watched_chats: HashSet<i64>) -> Self {
        Self {
            token: Arc::new(token),
            watched_chats,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "https://api.telegram.org/bot{}/{method}",
            self.token.expose_secret()
        )
    }

    /// Verify the token against getMe before entering the dispatch loop.
    pub async fn health_check(&self) -> Result<(), TransportError> {
        let resp = self
            .client
            .get(self.api_url("getMe"))
            .send()
            .await
            .map_err(|e| TransportError::StartupFailed {
                name: "telegram".into(),
                reason: e.to_string(),
            })?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(TransportError::StartupFailed {
                name: "telegram".into(),
                reason: format!("getMe returned {}", resp.status()),
            })
        }
    }
}

// ── EventSource implementation ──────────────────────────────────────

#[async_trait]
impl EventSource for TelegramClient {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn subscribe(&self) -> Result<EventStream, TransportError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let token = Arc::clone(&self.token);
        let watched = self.watched_chats.clone();
        let client = self.client.clone();

        tokio::spawn(async move {
            let mut offset: i64 = 0;

            tracing::info!(chats = watched.len(), "Telegram update loop listening");

            loop {
                let url = format!(
                    "https://api.telegram.org/bot{}/getUpdates",
                    token.expose_secret()
                );
                let body = serde_json::json!({
                    "offset": offset,
                    "timeout": POLL_TIMEOUT_SECS,
                    "allowed_updates": ["message", "channel_post"],
                });

                let resp = match client.post(&url).json(&body).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!("Telegram poll error: {e}");
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                        continue;
                    }
                };

                let data: serde_json::Value = match resp.json().await {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::warn!("Telegram parse error: {e}");
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                        continue;
                    }
                };

                let Some(results) = data.get("result").and_then(serde_json::Value::as_array)
                else {
                    tracing::warn!("Telegram getUpdates returned no result array");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                };

                for update in results {
                    if let Some(uid) = update.get("update_id").and_then(serde_json::Value::as_i64)
                    {
                        offset = uid + 1;
                    }

                    let Some(event) = event_from_update(update, &watched) else {
                        continue;
                    };

                    if tx.send(event).is_err() {
                        tracing::info!("Telegram event consumer gone, stopping update loop");
                        return;
                    }
                }
            }
        });

        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }
}

// ── Forwarder implementation ────────────────────────────────────────

#[async_trait]
impl Forwarder for TelegramClient {
    async fn forward(
        &self,
        destination: i64,
        message: &NewMessageEvent,
    ) -> Result<(), TransportError> {
        let body = serde_json::json!({
            "chat_id": destination,
            "from_chat_id": message.chat_id,
            "message_id": message.message_id,
        });

        let resp = self
            .client
            .post(self.api_url("forwardMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::SendFailed {
                destination,
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err = resp.text().await.unwrap_or_default();
            return Err(TransportError::SendFailed {
                destination,
                reason: format!("forwardMessage returned {status}: {err}"),
            });
        }

        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Convert one getUpdates entry into an event, if it belongs to a
/// watched chat. Text-less updates still produce an event with an empty
/// body — the pipeline handles the no-text drop.
fn event_from_update(
    update: &serde_json::Value,
    watched: &HashSet<i64>,
) -> Option<NewMessageEvent> {
    let message = update.get("message").or_else(|| update.get("channel_post"))?;

    let chat_id = message.get("chat")?.get("id")?.as_i64()?;
    if !watched.contains(&chat_id) {
        return None;
    }

    let message_id = message.get("message_id")?.as_i64()?;
    let text = message
        .get("text")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string();
    let received_at = message
        .get("date")
        .and_then(serde_json::Value::as_i64)
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .unwrap_or_else(Utc::now);

    Some(NewMessageEvent {
        chat_id,
        message_id,
        text,
        received_at,
    })
}
