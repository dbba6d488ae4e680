// https://dictionaryapi.dev/ - free, no key, returns an array of entries per word

use serde::Deserialize;

use crate::dictionary::{Definition, DictionaryEntry, Meaning, Phonetic};
use crate::DictionaryError;

pub(crate) const DICTIONARY_API_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEntry {
    word: String,
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<ApiPhonetic>,
    #[serde(default)]
    meanings: Vec<ApiMeaning>,
    #[serde(default)]
    source_urls: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ApiPhonetic {
    text: Option<String>,
    audio: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMeaning {
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<ApiDefinition>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiDefinition {
    definition: String,
    example: Option<String>,
}

impl From<ApiEntry> for DictionaryEntry {
    fn from(entry: ApiEntry) -> Self {
        Self {
            word: entry.word,
            phonetic: entry.phonetic.filter(|phonetic| !phonetic.is_empty()),
            phonetics: entry
                .phonetics
                .into_iter()
                .map(|phonetic| Phonetic {
                    text: phonetic.text.filter(|text| !text.is_empty()),
                    audio_url: phonetic.audio,
                })
                .collect(),
            meanings: entry.meanings.into_iter().map(Meaning::from).collect(),
            source_urls: entry.source_urls.unwrap_or_default(),
        }
    }
}

impl From<ApiMeaning> for Meaning {
    fn from(meaning: ApiMeaning) -> Self {
        Self {
            part_of_speech: meaning.part_of_speech,
            definitions: meaning
                .definitions
                .into_iter()
                .map(|definition| Definition {
                    text: definition.definition,
                    example: definition.example.filter(|example| !example.is_empty()),
                })
                .collect(),
            synonyms: distinct(meaning.synonyms),
            antonyms: distinct(meaning.antonyms),
        }
    }
}

fn distinct(words: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(words.len());
    for word in words {
        if !unique.contains(&word) {
            unique.push(word);
        }
    }
    unique
}

/// Builds `{base}/{term}` with the term percent-encoded as a single path segment.
pub(crate) fn entry_url(base_url: &str, term: &str) -> Result<reqwest::Url, DictionaryError> {
    let mut url = reqwest::Url::parse(base_url)
        .map_err(|error| DictionaryError::InvalidBaseUrl(format!("{base_url}: {error}")))?;
    url.path_segments_mut()
        .map_err(|_| DictionaryError::InvalidBaseUrl(format!("{base_url}: cannot be a base")))?
        .pop_if_empty()
        .push(term);
    Ok(url)
}

/// Decodes a response body. Only the first entry is kept, the rest are dropped rather than merged.
pub(crate) fn parse_entries(body: &[u8]) -> Result<DictionaryEntry, DictionaryError> {
    let entries: Vec<ApiEntry> =
        serde_json::from_slice(body).map_err(DictionaryError::Deserialize)?;
    entries
        .into_iter()
        .next()
        .map(DictionaryEntry::from)
        .ok_or(DictionaryError::Empty)
}

pub(crate) async fn get_definition(
    client: &reqwest::Client,
    base_url: &str,
    term: &str,
) -> Result<DictionaryEntry, DictionaryError> {
    let url = entry_url(base_url, term)?;
    tracing::debug!(%url, "requesting definition");
    let res = client.get(url).send().await.map_err(DictionaryError::Fetch)?;
    let status = res.status();
    if !status.is_success() {
        return Err(DictionaryError::NotFound {
            term: term.to_owned(),
            status: status.as_u16(),
        });
    }
    let body = res.bytes().await.map_err(DictionaryError::Fetch)?;
    parse_entries(&body)
}
