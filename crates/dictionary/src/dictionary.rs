/// One dictionary record for a word, built from the first element of a lookup response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub word: String,
    pub phonetic: Option<String>,
    pub phonetics: Vec<Phonetic>,
    pub meanings: Vec<Meaning>,
    pub source_urls: Vec<String>,
}

impl DictionaryEntry {
    /// Phonetic variants that carry a playable audio url, in response order.
    pub fn playable_phonetics(&self) -> impl Iterator<Item = &Phonetic> {
        self.phonetics.iter().filter(|phonetic| phonetic.has_audio())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phonetic {
    pub text: Option<String>,
    pub audio_url: Option<String>,
}

impl Phonetic {
    pub fn has_audio(&self) -> bool {
        self.audio_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meaning {
    pub part_of_speech: String,
    pub definitions: Vec<Definition>,
    /// Distinct, in the order the api lists them.
    pub synonyms: Vec<String>,
    /// Distinct, in the order the api lists them.
    pub antonyms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub text: String,
    pub example: Option<String>,
}
