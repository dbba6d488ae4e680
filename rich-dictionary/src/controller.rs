use dictionary::{DictionaryEntry, DictionaryError};

use crate::audio::{AudioError, AudioPlayer, AUDIO_ERROR_MESSAGE};
use crate::render::{normalize_audio_url, render_entry, DisplayModel, Panel, SearchControl, Theme};
use crate::storage::SavedWordStore;

/// Where the search workflow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Displaying,
    Error,
}

/// Transient state owned by the controller.
#[derive(Debug, Default)]
pub struct AppState {
    phase: Phase,
    /// Kept after a failed lookup, just not shown.
    current_entry: Option<DictionaryEntry>,
    is_dark_mode: bool,
    last_error: Option<String>,
}

impl AppState {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
    /// No entry on screen: nothing looked up yet, a lookup in flight, or an error shown.
    NothingDisplayed,
}

/// Handed out for every accepted search. Only the latest ticket may complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    id: u64,
    term: String,
}

impl SearchTicket {
    pub fn term(&self) -> &str {
        &self.term
    }
}

pub struct AppController {
    state: AppState,
    saved: SavedWordStore,
    notice: Option<String>,
    latest_search: u64,
}

impl AppController {
    pub fn new() -> Self {
        Self {
            state: AppState::default(),
            saved: SavedWordStore::new(),
            notice: None,
            latest_search: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn saved_words(&self) -> &SavedWordStore {
        &self.saved
    }

    /// Starts a search for the trimmed `term`. Blank input is ignored without any state change.
    /// A search already in flight is superseded: its result will be discarded by [`Self::complete`].
    pub fn submit(&mut self, term: &str) -> Option<SearchTicket> {
        let term = term.trim();
        if term.is_empty() {
            tracing::debug!("ignoring empty search");
            return None;
        }
        if self.state.is_loading() {
            tracing::debug!(superseded = self.latest_search, "replacing in-flight search");
        }
        self.latest_search += 1;
        self.state.phase = Phase::Loading;
        self.state.last_error = None;
        self.notice = None;
        tracing::info!(term, id = self.latest_search, "searching");
        Some(SearchTicket {
            id: self.latest_search,
            term: term.to_owned(),
        })
    }

    /// Applies a lookup result. Returns false if the ticket was superseded and nothing changed.
    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        result: Result<DictionaryEntry, DictionaryError>,
    ) -> bool {
        if ticket.id != self.latest_search || !self.state.is_loading() {
            tracing::debug!(id = ticket.id, term = ticket.term.as_str(), "discarding stale lookup result");
            return false;
        }
        match result {
            Ok(entry) => {
                tracing::debug!(word = entry.word.as_str(), "displaying entry");
                self.state.current_entry = Some(entry);
                self.state.phase = Phase::Displaying;
            }
            Err(error) => {
                tracing::warn!(term = ticket.term.as_str(), "lookup failed: {error}");
                self.state.last_error = Some(error.user_message().to_owned());
                self.state.phase = Phase::Error;
            }
        }
        true
    }

    /// Saves the displayed word.
    ///
    /// Only acts while an entry is on screen; the entry kept behind an error is never saved.
    pub fn save_current(&mut self) -> SaveOutcome {
        let entry = match (self.state.phase, &self.state.current_entry) {
            (Phase::Displaying, Some(entry)) => entry,
            _ => return SaveOutcome::NothingDisplayed,
        };
        if !self.saved.add(&entry.word) {
            return SaveOutcome::AlreadySaved;
        }
        tracing::info!(word = entry.word.as_str(), "saved word");
        SaveOutcome::Saved
    }

    /// Flips dark mode and returns the new setting.
    pub fn toggle_theme(&mut self) -> bool {
        self.state.is_dark_mode = !self.state.is_dark_mode;
        tracing::debug!(dark = self.state.is_dark_mode, "theme toggled");
        self.state.is_dark_mode
    }

    /// Plays the `index`-th playable pronunciation of the displayed entry.
    ///
    /// A player failure leaves a notice for the user but never touches the search state.
    pub fn play_audio(&mut self, player: &dyn AudioPlayer, index: usize) -> Result<(), AudioError> {
        let entry = match (&self.state.phase, &self.state.current_entry) {
            (Phase::Displaying, Some(entry)) => entry,
            _ => return Err(AudioError::NothingDisplayed),
        };
        let url = entry
            .playable_phonetics()
            .nth(index)
            .and_then(|phonetic| phonetic.audio_url.as_deref())
            .map(normalize_audio_url)
            .ok_or(AudioError::NoSuchItem(index))?;
        self.notice = None;
        player.play(&url).map_err(|error| {
            self.audio_failed(&error);
            error
        })
    }

    /// Records a playback failure, including ones reported after the player started.
    pub fn audio_failed(&mut self, error: &AudioError) {
        tracing::warn!("audio playback failed: {error}");
        self.notice = Some(AUDIO_ERROR_MESSAGE.to_owned());
    }

    pub fn display_model(&self) -> DisplayModel {
        let panel = match (self.state.phase, &self.state.current_entry, &self.state.last_error) {
            (Phase::Loading, _, _) => Panel::Loading,
            (Phase::Displaying, Some(entry), _) => Panel::Entry(render_entry(entry, &self.saved)),
            (Phase::Error, _, Some(message)) => Panel::Error(message.clone()),
            _ => Panel::Welcome,
        };
        DisplayModel {
            theme: Theme::from_dark_mode(self.state.is_dark_mode),
            search: if self.state.is_loading() {
                SearchControl::busy()
            } else {
                SearchControl::idle()
            },
            panel,
            notice: self.notice.clone(),
            saved_words: if self.saved.is_empty() {
                None
            } else {
                Some(self.saved.list().to_vec())
            },
        }
    }
}

impl Default for AppController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use dictionary::{Definition, Meaning, Phonetic, NOT_FOUND_MESSAGE, CONNECTIVITY_MESSAGE};

    use super::*;
    use crate::lookup::Lookup;
    use crate::render::{EntryView, ThemeIcon, SAVED_LABEL, SAVE_LABEL, SEARCHING_LABEL, SEARCH_LABEL};

    /// Answers from a fixed table and records every term it was asked for.
    #[derive(Default)]
    struct FakeDictionary {
        entries: HashMap<String, DictionaryEntry>,
        calls: Mutex<Vec<String>>,
        offline: bool,
    }

    impl FakeDictionary {
        fn with(entries: impl IntoIterator<Item = DictionaryEntry>) -> Self {
            Self {
                entries: entries
                    .into_iter()
                    .map(|entry| (entry.word.clone(), entry))
                    .collect(),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Lookup for FakeDictionary {
        async fn lookup(&self, term: &str) -> Result<DictionaryEntry, DictionaryError> {
            self.calls.lock().unwrap().push(term.to_owned());
            if self.offline {
                let error = serde_json::from_str::<u8>("<html>").unwrap_err();
                return Err(DictionaryError::Deserialize(error));
            }
            self.entries
                .get(term)
                .cloned()
                .ok_or_else(|| DictionaryError::NotFound {
                    term: term.to_owned(),
                    status: 404,
                })
        }
    }

    struct FakePlayer {
        fail: bool,
        played: Mutex<Vec<String>>,
    }

    impl FakePlayer {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                played: Mutex::new(Vec::new()),
            }
        }
    }

    impl AudioPlayer for FakePlayer {
        fn play(&self, url: &str) -> Result<(), AudioError> {
            self.played.lock().unwrap().push(url.to_owned());
            if self.fail {
                return Err(AudioError::Spawn {
                    player: "fake".to_owned(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "fake"),
                });
            }
            Ok(())
        }
    }

    /// Drives one search the way the REPL does: submit, look up, complete.
    async fn search(app: &mut AppController, dict: &FakeDictionary, term: &str) -> Option<Phase> {
        let ticket = app.submit(term)?;
        let result = dict.lookup(ticket.term()).await;
        app.complete(&ticket, result);
        Some(app.state.phase)
    }

    fn shown_entry(model: &DisplayModel) -> Option<&EntryView> {
        match &model.panel {
            Panel::Entry(view) => Some(view),
            _ => None,
        }
    }

    fn shown_error(model: &DisplayModel) -> Option<&str> {
        match &model.panel {
            Panel::Error(message) => Some(message),
            _ => None,
        }
    }

    fn hello() -> DictionaryEntry {
        DictionaryEntry {
            word: "hello".to_owned(),
            phonetic: Some("/həˈləʊ/".to_owned()),
            phonetics: vec![
                Phonetic {
                    text: Some("/həˈləʊ/".to_owned()),
                    audio_url: Some("//example.com/a.mp3".to_owned()),
                },
                Phonetic {
                    text: None,
                    audio_url: Some(String::new()),
                },
            ],
            meanings: vec![Meaning {
                part_of_speech: "exclamation".to_owned(),
                definitions: vec![Definition {
                    text: "used as a greeting".to_owned(),
                    example: None,
                }],
                synonyms: vec![],
                antonyms: vec![],
            }],
            source_urls: vec![],
        }
    }

    fn word(word: &str) -> DictionaryEntry {
        DictionaryEntry {
            word: word.to_owned(),
            phonetic: None,
            phonetics: vec![],
            meanings: vec![],
            source_urls: vec![],
        }
    }

    #[test]
    fn starts_on_welcome() {
        let app = AppController::new();
        let model = app.display_model();
        assert_eq!(model.panel, Panel::Welcome);
        assert_eq!(model.search, SearchControl::idle());
        assert_eq!(model.saved_words, None);
        assert_eq!(model.theme.icon(), ThemeIcon::Sun);
    }

    #[tokio::test]
    async fn successful_search_renders_entry() {
        let dict = FakeDictionary::with([hello()]);
        let mut app = AppController::new();
        assert_eq!(search(&mut app, &dict, "  hello ").await, Some(Phase::Displaying));
        assert_eq!(dict.calls(), vec!["hello"]);

        let model = app.display_model();
        assert_eq!(model.search.label, SEARCH_LABEL);
        assert!(model.search.enabled);
        let view = shown_entry(&model).unwrap();
        assert_eq!(view.title, "hello");
        assert_eq!(view.phonetic.as_deref(), Some("/həˈləʊ/"));
        assert_eq!(view.meanings.len(), 1);
        assert_eq!(view.meanings[0].definitions.as_ref().unwrap().len(), 1);
        assert_eq!(view.meanings[0].synonyms, None);
        assert_eq!(view.meanings[0].antonyms, None);
        assert_eq!(view.save_button.label, SAVE_LABEL);
        assert!(view.save_button.enabled);
    }

    #[tokio::test]
    async fn failed_search_shows_not_found() {
        let dict = FakeDictionary::default();
        let mut app = AppController::new();
        assert_eq!(search(&mut app, &dict, "zzzxxx123").await, Some(Phase::Error));
        let model = app.display_model();
        assert_eq!(shown_error(&model), Some(NOT_FOUND_MESSAGE));
        assert!(shown_entry(&model).is_none());
        assert_eq!(model.search, SearchControl::idle());
    }

    #[tokio::test]
    async fn transport_failure_shows_connectivity_message() {
        let dict = FakeDictionary {
            offline: true,
            ..Default::default()
        };
        let mut app = AppController::new();
        search(&mut app, &dict, "hello").await;
        assert_eq!(shown_error(&app.display_model()), Some(CONNECTIVITY_MESSAGE));
        assert_eq!(app.state.last_error.as_deref(), Some(CONNECTIVITY_MESSAGE));
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let dict = FakeDictionary::with([hello()]);
        let mut app = AppController::new();
        search(&mut app, &dict, "hello").await;
        let before = app.display_model();
        assert_eq!(search(&mut app, &dict, "   \t").await, None);
        assert_eq!(search(&mut app, &dict, "").await, None);
        assert_eq!(dict.calls().len(), 1);
        assert_eq!(app.display_model(), before);
    }

    #[test]
    fn loading_disables_search_and_hides_panels() {
        let mut app = AppController::new();
        let ticket = app.submit("hello").unwrap();
        let model = app.display_model();
        assert_eq!(model.panel, Panel::Loading);
        assert_eq!(model.search.label, SEARCHING_LABEL);
        assert!(!model.search.enabled);
        assert!(app.complete(&ticket, Ok(hello())));
        assert_eq!(app.display_model().search, SearchControl::idle());
    }

    #[test]
    fn newer_search_wins_over_late_response() {
        let mut app = AppController::new();
        let first = app.submit("first").unwrap();
        let second = app.submit("second").unwrap();
        assert!(app.complete(&second, Ok(word("second"))));
        assert!(!app.complete(&first, Ok(word("first"))));
        assert_eq!(shown_entry(&app.display_model()).unwrap().title, "second");
    }

    #[test]
    fn superseded_result_does_not_end_loading() {
        let mut app = AppController::new();
        let first = app.submit("first").unwrap();
        let _second = app.submit("second").unwrap();
        assert!(!app.complete(
            &first,
            Err(DictionaryError::NotFound {
                term: "first".to_owned(),
                status: 404,
            })
        ));
        assert!(app.state().is_loading());
        assert_eq!(app.state.last_error.as_deref(), None);
    }

    #[tokio::test]
    async fn save_is_idempotent() {
        let dict = FakeDictionary::with([hello()]);
        let mut app = AppController::new();
        search(&mut app, &dict, "hello").await;
        assert_eq!(app.save_current(), SaveOutcome::Saved);
        let view = shown_entry(&app.display_model()).cloned().unwrap();
        assert_eq!(view.save_button.label, SAVED_LABEL);
        assert!(!view.save_button.enabled);
        assert!(view.highlighted);
        assert_eq!(app.save_current(), SaveOutcome::AlreadySaved);
        assert_eq!(app.saved_words().list(), ["hello"]);
        assert_eq!(app.display_model().saved_words, Some(vec!["hello".to_owned()]));
    }

    #[test]
    fn save_without_entry_is_noop() {
        let mut app = AppController::new();
        assert_eq!(app.save_current(), SaveOutcome::NothingDisplayed);
        assert!(app.saved_words().is_empty());
    }

    #[tokio::test]
    async fn error_keeps_previous_entry_but_blocks_save() {
        let dict = FakeDictionary::with([hello()]);
        let mut app = AppController::new();
        search(&mut app, &dict, "hello").await;
        search(&mut app, &dict, "zzzxxx123").await;
        assert_eq!(app.state.current_entry.as_ref().map(|entry| entry.word.as_str()), Some("hello"));
        assert_eq!(app.save_current(), SaveOutcome::NothingDisplayed);
        assert!(app.saved_words().is_empty());
    }

    #[tokio::test]
    async fn resaved_word_renders_as_saved_on_next_lookup() {
        let dict = FakeDictionary::with([hello(), word("world")]);
        let mut app = AppController::new();
        search(&mut app, &dict, "hello").await;
        app.save_current();
        search(&mut app, &dict, "world").await;
        assert_eq!(shown_entry(&app.display_model()).unwrap().save_button.label, SAVE_LABEL);
        search(&mut app, &dict, "hello").await;
        assert_eq!(shown_entry(&app.display_model()).unwrap().save_button.label, SAVED_LABEL);
    }

    #[test]
    fn theme_toggles_back_and_forth() {
        let mut app = AppController::new();
        assert!(app.toggle_theme());
        assert_eq!(app.display_model().theme, Theme::Dark);
        assert_eq!(app.display_model().theme.icon(), ThemeIcon::Moon);
        assert!(!app.toggle_theme());
        assert_eq!(app.display_model().theme, Theme::Light);
    }

    #[tokio::test]
    async fn plays_normalized_url() {
        let dict = FakeDictionary::with([hello()]);
        let player = FakePlayer::new(false);
        let mut app = AppController::new();
        search(&mut app, &dict, "hello").await;
        app.play_audio(&player, 0).unwrap();
        assert_eq!(*player.played.lock().unwrap(), vec!["https://example.com/a.mp3"]);
        assert!(matches!(app.play_audio(&player, 1), Err(AudioError::NoSuchItem(1))));
    }

    #[tokio::test]
    async fn playback_failure_is_a_notice_only() {
        let dict = FakeDictionary::with([hello()]);
        let player = FakePlayer::new(true);
        let mut app = AppController::new();
        search(&mut app, &dict, "hello").await;
        assert!(app.play_audio(&player, 0).is_err());
        let model = app.display_model();
        assert_eq!(model.notice.as_deref(), Some(AUDIO_ERROR_MESSAGE));
        assert_eq!(shown_entry(&model).unwrap().title, "hello");
        assert_eq!(app.state.phase, Phase::Displaying);

        search(&mut app, &dict, "hello").await;
        assert_eq!(app.display_model().notice, None);
    }

    #[test]
    fn no_audio_without_entry() {
        let player = FakePlayer::new(false);
        let mut app = AppController::new();
        assert!(matches!(app.play_audio(&player, 0), Err(AudioError::NothingDisplayed)));
        assert!(player.played.lock().unwrap().is_empty());
    }

    #[test]
    fn save_reports_why_nothing_happened() {
        let mut app = AppController::new();
        assert_eq!(app.save_current(), SaveOutcome::NothingDisplayed);
        let ticket = app.submit("hello").unwrap();
        assert_eq!(app.save_current(), SaveOutcome::NothingDisplayed);
        app.complete(&ticket, Ok(hello()));
        assert_eq!(app.save_current(), SaveOutcome::Saved);
        assert_eq!(app.save_current(), SaveOutcome::AlreadySaved);
    }

    #[tokio::test]
    async fn late_playback_failure_sets_notice_only() {
        let dict = FakeDictionary::with([hello()]);
        let player = FakePlayer::new(false);
        let mut app = AppController::new();
        search(&mut app, &dict, "hello").await;
        app.play_audio(&player, 0).unwrap();
        assert_eq!(app.display_model().notice, None);

        // the player started fine but gave up on the url later
        app.audio_failed(&AudioError::Wait {
            player: "fake".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "decode error"),
        });
        let model = app.display_model();
        assert_eq!(model.notice.as_deref(), Some(AUDIO_ERROR_MESSAGE));
        assert_eq!(shown_entry(&model).unwrap().title, "hello");
        assert_eq!(app.state.phase, Phase::Displaying);
        assert_eq!(app.state.last_error, None);
    }
}
