//! Projection of a fetched entry into what should be on screen.
//!
//! Nothing here touches the network, the terminal or any shared state: the same
//! entry and the same saved words always produce the same view.

use dictionary::{DictionaryEntry, Meaning};

use crate::storage::SavedWordStore;

pub const SAVE_LABEL: &str = "Save Word";
pub const SAVED_LABEL: &str = "Saved";
pub const PLAY_AUDIO_LABEL: &str = "Play Audio";
pub const SEARCH_LABEL: &str = "Search";
pub const SEARCHING_LABEL: &str = "Searching...";
pub const SOURCE_LINK_REL: &str = "noopener noreferrer";

/// Everything the presentation adapter needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayModel {
    pub theme: Theme,
    pub search: SearchControl,
    pub panel: Panel,
    /// Standalone message that doesn't replace the panel, e.g. audio failures.
    pub notice: Option<String>,
    /// `None` while nothing is saved, the region is hidden then.
    pub saved_words: Option<Vec<String>>,
}

/// The main region. Welcome, error and word data are mutually exclusive, and
/// none of them shows while a lookup is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    Welcome,
    Loading,
    Error(String),
    Entry(EntryView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchControl {
    pub enabled: bool,
    pub label: &'static str,
}

impl SearchControl {
    pub fn idle() -> Self {
        Self {
            enabled: true,
            label: SEARCH_LABEL,
        }
    }

    pub fn busy() -> Self {
        Self {
            enabled: false,
            label: SEARCHING_LABEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeIcon {
    Sun,
    Moon,
}

impl Theme {
    pub fn from_dark_mode(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// The one icon visible for this theme.
    pub fn icon(self) -> ThemeIcon {
        match self {
            Theme::Light => ThemeIcon::Sun,
            Theme::Dark => ThemeIcon::Moon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub title: String,
    pub phonetic: Option<String>,
    pub save_button: SaveButton,
    /// Set on the entry container iff the word is saved.
    pub highlighted: bool,
    /// `None` hides the audio section.
    pub audio: Option<Vec<AudioButton>>,
    pub meanings: Vec<MeaningBlock>,
    /// `None` hides the sources section.
    pub sources: Option<Vec<SourceLink>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveButton {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioButton {
    pub label: String,
    /// Already normalized, ready to hand to a player.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeaningBlock {
    pub part_of_speech: String,
    pub definitions: Option<Vec<DefinitionItem>>,
    pub synonyms: Option<Vec<String>>,
    pub antonyms: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionItem {
    pub text: String,
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    pub url: String,
    /// Opened in a new browsing context.
    pub new_context: bool,
    pub rel: &'static str,
}

/// Protocol relative urls (`//host/a.mp3`) get an explicit `https:` scheme.
pub fn normalize_audio_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url.to_owned()
    }
}

pub fn render_entry(entry: &DictionaryEntry, saved: &SavedWordStore) -> EntryView {
    let is_saved = saved.has(&entry.word);
    EntryView {
        title: entry.word.clone(),
        phonetic: entry.phonetic.clone(),
        save_button: save_button(is_saved),
        highlighted: is_saved,
        audio: render_audio(entry),
        meanings: entry.meanings.iter().map(render_meaning).collect(),
        sources: non_empty(
            entry
                .source_urls
                .iter()
                .map(|url| SourceLink {
                    url: url.clone(),
                    new_context: true,
                    rel: SOURCE_LINK_REL,
                })
                .collect(),
        ),
    }
}

pub fn save_button(is_saved: bool) -> SaveButton {
    if is_saved {
        SaveButton {
            label: SAVED_LABEL,
            enabled: false,
        }
    } else {
        SaveButton {
            label: SAVE_LABEL,
            enabled: true,
        }
    }
}

fn render_audio(entry: &DictionaryEntry) -> Option<Vec<AudioButton>> {
    non_empty(
        entry
            .playable_phonetics()
            .filter_map(|phonetic| {
                let url = phonetic.audio_url.as_deref()?;
                Some(AudioButton {
                    label: phonetic
                        .text
                        .clone()
                        .unwrap_or_else(|| PLAY_AUDIO_LABEL.to_owned()),
                    url: normalize_audio_url(url),
                })
            })
            .collect(),
    )
}

fn render_meaning(meaning: &Meaning) -> MeaningBlock {
    MeaningBlock {
        part_of_speech: meaning.part_of_speech.clone(),
        definitions: non_empty(
            meaning
                .definitions
                .iter()
                .map(|definition| DefinitionItem {
                    text: definition.text.clone(),
                    example: definition.example.clone(),
                })
                .collect(),
        ),
        synonyms: non_empty(meaning.synonyms.clone()),
        antonyms: non_empty(meaning.antonyms.clone()),
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
