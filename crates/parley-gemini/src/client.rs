//! Non-streaming client for the Gemini generateContent endpoint.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    types::Turn,
};

/// Production endpoint; overridable for self-hosted proxies and tests
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API client
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| Error::InvalidApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Override the endpoint base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Generate a reply for the given conversation.
    ///
    /// The credential travels as a query parameter, which is the scheme the
    /// API mandates for key auth.
    pub async fn generate(&self, model: &str, contents: &[Turn]) -> Result<GenerateResponse> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );
        tracing::debug!(model, turns = contents.len(), "calling generateContent");

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest { contents })
            .send()
            .await?;

        // No status check: an error body parses as a response without
        // candidates and surfaces through the fallback reply downstream.
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: &'a [Turn],
}

// Response types are parsed defensively: the provider schema is not
// validated beyond what reply extraction needs.

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// The first candidate's first part's text, when structurally present
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}
