use pastebox::{SessionManager, SnippetStore, UserStore};

/// Shared application state, cloned into every handler and middleware layer.
///
/// All three stores are cheap-clone handles over `Arc`-backed connections,
/// so cloning the state per request costs a few reference counts.
#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub snippets: SnippetStore,
    pub sessions: SessionManager,
}

impl AppState {
    pub fn new(users: UserStore, snippets: SnippetStore, sessions: SessionManager) -> Self {
        Self {
            users,
            snippets,
            sessions,
        }
    }
}
