use thiserror::Error;

#[derive(Clone, Error, Debug, PartialEq)]
pub enum SnippetError {
    /// No live snippet with the requested id. Expired and never-existed are
    /// deliberately the same value.
    #[error("Snippet not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(String),
}
