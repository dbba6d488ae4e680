use std::time::Duration;

use dictionary_api::{get_definition, DICTIONARY_API_URL};

mod dictionary;
mod dictionary_api;

pub use dictionary::{Definition, DictionaryEntry, Meaning, Phonetic};

pub const NOT_FOUND_MESSAGE: &str = "Word not found. Please try another word.";
pub const CONNECTIVITY_MESSAGE: &str =
    "Failed to fetch word definition. Please check your connection and try again.";

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("invalid dictionary base url {0}")]
    InvalidBaseUrl(String),
    #[error("request to the dictionary api failed: {0}")]
    Fetch(#[source] reqwest::Error),
    #[error("no definition for '{term}' (status {status})")]
    NotFound { term: String, status: u16 },
    #[error("malformed dictionary response: {0}")]
    Deserialize(#[source] serde_json::Error),
    #[error("dictionary response contained no entries")]
    Empty,
}

/// How a failed lookup is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailure {
    NotFound,
    Connectivity,
}

impl LookupFailure {
    pub fn message(self) -> &'static str {
        match self {
            LookupFailure::NotFound => NOT_FOUND_MESSAGE,
            LookupFailure::Connectivity => CONNECTIVITY_MESSAGE,
        }
    }
}

impl DictionaryError {
    /// Any answer from the api that isn't a definition reads as "not found",
    /// anything that went wrong on the way reads as a connectivity problem.
    pub fn kind(&self) -> LookupFailure {
        match self {
            // a 2xx with no entries still means the api has nothing for the term
            DictionaryError::NotFound { .. } | DictionaryError::Empty => LookupFailure::NotFound,
            DictionaryError::InvalidBaseUrl(_)
            | DictionaryError::Fetch(_)
            | DictionaryError::Deserialize(_) => LookupFailure::Connectivity,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind().message()
    }
}

pub struct Dictionary {
    client: reqwest::Client,
    base_url: String,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::with_base_url(DICTIONARY_API_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// A client whose requests give up after `timeout`; expiry surfaces as [`DictionaryError::Fetch`].
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DictionaryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DictionaryError::Fetch)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Looks `term` up verbatim. Callers trim and reject empty input first.
    pub async fn get_definition(&self, term: &str) -> Result<DictionaryEntry, DictionaryError> {
        get_definition(&self.client, &self.base_url, term).await
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}
