use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whether the message body is sent as HTML or plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ContentMode {
    Html,
    Text,
}

/// A hyperlink appended to the message body. When `text` is absent the URL
/// itself is used as the display text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub text: Option<String>,
}

impl Link {
    pub fn display_text(&self) -> &str {
        self.text.as_deref().unwrap_or(&self.url)
    }
}

/// A fully composed message, identical for every recipient. The `to` address
/// is bound by the transport at send time.
///
/// Exactly one of `html_body` / `plain_body` is non-empty, matching `mode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub from_name: String,
    pub subject: String,
    pub mode: ContentMode,
    pub html_body: String,
    pub plain_body: String,
    pub attachment: Option<PathBuf>,
}

impl Message {
    /// The body matching the active content mode.
    pub fn active_body(&self) -> &str {
        match self.mode {
            ContentMode::Html => &self.html_body,
            ContentMode::Text => &self.plain_body,
        }
    }
}

/// Ordered list of recipient addresses, trimmed and non-empty. Duplicates
/// are preserved; order matches the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientList(Vec<String>);

impl RecipientList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Trims the address and appends it; blank input is silently dropped,
    /// which keeps the no-empty-entry invariant in one place.
    pub fn push_trimmed(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            self.0.push(trimmed.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a RecipientList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Terminal outcome of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "reason")]
pub enum Outcome {
    Sent,
    Failed(String),
}

/// Per-recipient delivery record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub recipient: String,
    pub outcome: Outcome,
}

/// Ordered, immutable record of one dispatch run. One entry per recipient,
/// in the order delivery was attempted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub results: Vec<DeliveryResult>,
    pub sent: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DeliveryReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }
}

/// Transport construction parameters. Owned by the caller; transports copy
/// what they need and never mutate it.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Backend identifier: a well-known relay name (`gmail`, `outlook`,
    /// `yahoo`), `smtp:host[:port]`, or an `http(s)://` provider endpoint.
    pub service: String,
    /// Authenticated account address; also the effective `from` address.
    pub username: String,
    /// SMTP password or provider API key.
    pub password: String,
    pub from_name: Option<String>,
    /// Optional proxy connection string (http/https/socks5 URL).
    pub proxy: Option<String>,
}

impl DeliveryConfig {
    /// Display name paired with the authenticated address in `from` headers.
    pub fn sender_name(&self) -> &str {
        self.from_name.as_deref().unwrap_or("Sender")
    }
}
