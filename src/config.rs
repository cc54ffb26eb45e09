//! Environment-driven configuration, validated eagerly at startup.

use std::collections::HashSet;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Relay configuration. Every field is required; a missing or malformed
/// value is fatal before any event is consumed.
#[derive(Debug)]
pub struct RelayConfig {
    /// Bot API token — credential and session identity in one.
    pub bot_token: SecretString,
    /// Chats to watch for inbound messages.
    pub chats: HashSet<i64>,
    /// Destination for key-phrase matches.
    pub primary_destination: i64,
    /// Destination for stop-phrase matches.
    pub stop_destination: i64,
    /// Phrases that gate primary forwarding.
    pub key_phrases: Vec<String>,
    /// Phrases that force quarantine routing.
    pub stop_phrases: Vec<String>,
}

impl RelayConfig {
    /// Load and validate configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bot_token: SecretString::from(require("TELEGRAM_BOT_TOKEN", env("TELEGRAM_BOT_TOKEN"))?),
            chats: parse_id_set("RELAY_CHATS", env("RELAY_CHATS"))?,
            primary_destination: parse_id("RELAY_DESTINATION", env("RELAY_DESTINATION"))?,
            stop_destination: parse_id("RELAY_STOP_DESTINATION", env("RELAY_STOP_DESTINATION"))?,
            key_phrases: parse_list("RELAY_KEY_PHRASES", env("RELAY_KEY_PHRASES"))?,
            stop_phrases: parse_list("RELAY_STOP_PHRASES", env("RELAY_STOP_PHRASES"))?,
        })
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// A required value; missing or blank is a fatal config error naming the
/// variable.
fn require(key: &str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingRequired {
            key: key.into(),
            hint: format!("set {key} in the environment"),
        }),
    }
}

fn parse_id(key: &str, value: Option<String>) -> Result<i64, ConfigError> {
    let raw = require(key, value)?;
    raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
        key: key.into(),
        message: format!("expected a chat id, got {raw:?}: {e}"),
    })
}

fn parse_id_set(key: &str, value: Option<String>) -> Result<HashSet<i64>, ConfigError> {
    let raw = require(key, value)?;
    let mut ids = HashSet::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id = part.parse().map_err(|e| ConfigError::InvalidValue {
            key: key.into(),
            message: format!("expected a chat id, got {part:?}: {e}"),
        })?;
        ids.insert(id);
    }
    if ids.is_empty() {
        return Err(ConfigError::MissingRequired {
            key: key.into(),
            hint: "provide at least one chat id (comma-separated)".into(),
        });
    }
    Ok(ids)
}

fn parse_list(key: &str, value: Option<String>) -> Result<Vec<String>, ConfigError> {
    let raw = require(key, value)?;
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if items.is_empty() {
        return Err(ConfigError::MissingRequired {
            key: key.into(),
            hint: "provide at least one phrase (comma-separated)".into(),
        });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn missing_value_names_the_variable() {
        let err = require("RELAY_CHATS", None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingRequired { ref key, .. } if key == "RELAY_CHATS"
        ));
    }

    #[test]
    fn blank_value_counts_as_missing() {
        assert!(require("TELEGRAM_BOT_TOKEN", some("   ")).is_err());
    }

    #[test]
    fn parses_single_id() {
        assert_eq!(parse_id("RELAY_DESTINATION", some(" -100123 ")).unwrap(), -100123);
    }

    #[test]
    fn rejects_malformed_id() {
        let err = parse_id("RELAY_DESTINATION", some("not-a-number")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "RELAY_DESTINATION"
        ));
    }

    #[test]
    fn parses_id_set() {
        let ids = parse_id_set("RELAY_CHATS", some("100, 200 ,300,")).unwrap();
        assert_eq!(ids, HashSet::from([100, 200, 300]));
    }

    #[test]
    fn rejects_malformed_id_in_set() {
        assert!(parse_id_set("RELAY_CHATS", some("100,oops")).is_err());
    }

    #[test]
    fn empty_id_set_counts_as_missing() {
        assert!(parse_id_set("RELAY_CHATS", some(" , ,")).is_err());
    }

    #[test]
    fn parses_phrase_list() {
        let phrases = parse_list("RELAY_KEY_PHRASES", some("deal, free shipping ,sale")).unwrap();
        assert_eq!(phrases, vec!["deal", "free shipping", "sale"]);
    }

    #[test]
    fn empty_phrase_list_counts_as_missing() {
        let err = parse_list("RELAY_STOP_PHRASES", some(" , ")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingRequired { ref key, .. } if key == "RELAY_STOP_PHRASES"
        ));
    }
}
