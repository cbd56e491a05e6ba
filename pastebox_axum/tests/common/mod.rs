pub mod fixtures;
pub mod mock_browser;

pub use fixtures::*;
pub use mock_browser::{MockBrowser, body_text};
