use dictionary::{Dictionary, DictionaryEntry, DictionaryError};

/// Source of dictionary entries the controller searches through.
#[async_trait::async_trait]
pub trait Lookup: Send + Sync {
    async fn lookup(&self, term: &str) -> Result<DictionaryEntry, DictionaryError>;
}

#[async_trait::async_trait]
impl Lookup for Dictionary {
    async fn lookup(&self, term: &str) -> Result<DictionaryEntry, DictionaryError> {
        self.get_definition(term).await
    }
}
