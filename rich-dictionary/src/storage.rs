use std::collections::HashSet;

/// Words the user marked as saved. Lives only as long as the process.
#[derive(Debug, Default, Clone)]
pub struct SavedWordStore {
    words: Vec<String>,
    index: HashSet<String>,
}

impl SavedWordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact, case sensitive match against the word form the api returned.
    pub fn has(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    /// Attempt to add a word, returns true if the word was not saved before
    pub fn add(&mut self, word: &str) -> bool {
        if self.index.contains(word) {
            return false;
        }
        self.index.insert(word.to_owned());
        self.words.push(word.to_owned());
        true
    }

    /// Saved words in the order they were added
    pub fn list(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
