use std::time::Duration;

use log::{debug, error, warn};
use serde::Deserialize;

use crate::error::{WordSourceError, WordSourceResult};

pub const DEFAULT_ENDPOINT: &str = "http://api.quotable.io/random";
pub const DEFAULT_MAX_WORDS: usize = 200;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Provides the target words for a session. Never fails: problems are logged
/// and an empty list is returned.
pub trait WordSource: Send {
    fn load(&self) -> Vec<String>;
}

#[derive(Debug, Deserialize)]
struct Quote {
    content: Option<serde_json::Value>,
}

/// First `max_words` whitespace-separated tokens of `text`
pub fn split_words(text: &str, max_words: usize) -> Vec<String> {
    text.split_whitespace()
        .take(max_words)
        .map(str::to_owned)
        .collect()
}

/// Extract words from a quote response body of the form `{"content": "..."}`
pub fn parse_quote(body: &str, max_words: usize) -> WordSourceResult<Vec<String>> {
    let quote: Quote = serde_json::from_str(body)?;
    match quote.content {
        Some(serde_json::Value::String(content)) if !content.is_empty() => {
            Ok(split_words(&content, max_words))
        }
        _ => Err(WordSourceError::MissingContent),
    }
}

/// Fetches a random quote over HTTP
#[derive(Debug, Clone)]
pub struct QuoteWordSource {
    endpoint: String,
    max_words: usize,
    timeout: Duration,
}

impl Default for QuoteWordSource {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl QuoteWordSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            max_words: DEFAULT_MAX_WORDS,
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }

    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn fetch(&self) -> WordSourceResult<Vec<String>> {
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();

        let response = agent.get(&self.endpoint).call().map_err(|e| match e {
            ureq::Error::Status(code, _) => WordSourceError::Status(code),
            ureq::Error::Transport(t) => WordSourceError::network(t.to_string()),
        })?;

        let body = response
            .into_string()
            .map_err(|e| WordSourceError::network(e.to_string()))?;

        parse_quote(&body, self.max_words)
    }
}

impl WordSource for QuoteWordSource {
    fn load(&self) -> Vec<String> {
        match self.fetch() {
            Ok(words) => {
                debug!("fetched {} words from {}", words.len(), self.endpoint);
                words
            }
            Err(e @ WordSourceError::Network(_)) => {
                error!("failed to fetch words from {}: {}", self.endpoint, e);
                Vec::new()
            }
            Err(e) => {
                warn!("unusable quote from {}: {}", self.endpoint, e);
                Vec::new()
            }
        }
    }
}

/// Fixed text, e.g. a prompt given on the command line
#[derive(Debug, Clone)]
pub struct StaticWordSource {
    text: String,
    max_words: usize,
}

impl StaticWordSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            max_words: DEFAULT_MAX_WORDS,
        }
    }

    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }
}

impl WordSource for StaticWordSource {
    fn load(&self) -> Vec<String> {
        split_words(&self.text, self.max_words)
    }
}
