//! Transport seam between the session and the relay endpoint.

use async_trait::async_trait;
use parley_gemini::Turn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Client side of the relay envelope contract.
///
/// `history` already includes the user turn for `message`; the `message`
/// field on its own is only consulted by the relay when the history is
/// empty.
#[derive(Debug, Serialize)]
pub struct ExchangeRequest<'a> {
    pub message: &'a str,
    pub history: &'a [Turn],
}

#[derive(Debug, Deserialize)]
struct ReplyEnvelope {
    reply: String,
}

/// Performs one message/history round trip and yields the reply text
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(&self, message: &str, history: &[Turn]) -> Result<String>;
}

/// HTTP transport that posts the envelope to a relay endpoint
pub struct RelayTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl RelayTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Transport for RelayTransport {
    async fn exchange(&self, message: &str, history: &[Turn]) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ExchangeRequest { message, history })
            .send()
            .await?;

        let status = response.status();
        // The body is read raw first: an HTML error page from a proxy or a
        // crashed relay must surface as the NotJson error, not a parse panic.
        let raw = response.text().await?;
        let envelope: ReplyEnvelope = serde_json::from_str(&raw).map_err(|_| Error::NotJson)?;

        if !status.is_success() {
            return Err(Error::Relay {
                status: status.as_u16(),
                reply: envelope.reply,
            });
        }
        Ok(envelope.reply)
    }
}
