mod errors;
mod store;
mod types;

pub use errors::SnippetError;
pub use store::{PERMITTED_EXPIRY_DAYS, SnippetStore};
pub use types::Snippet;
