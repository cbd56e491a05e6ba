use axum::Router;

use pastebox_axum::{
    AppState, SessionManager, SnippetStore, UserStore, connect_cache_store, connect_data_store,
    router,
};

/// Test user fixtures for integration testing
pub struct TestUsers;

impl TestUsers {
    pub fn alice() -> TestUser {
        TestUser {
            name: "Alice Jones".to_string(),
            email: "alice@example.com".to_string(),
            password: "pa55word!".to_string(),
        }
    }

    pub fn bob() -> TestUser {
        TestUser {
            name: "Bob Smith".to_string(),
            email: "bob@example.com".to_string(),
            password: "hunter2hunter2".to_string(),
        }
    }
}

pub struct TestUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl TestUser {
    /// The form fields a signup submission needs, minus the CSRF token.
    pub fn signup_fields(&self) -> [(&str, &str); 3] {
        [
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
        ]
    }

    pub fn login_fields(&self) -> [(&str, &str); 2] {
        [
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
        ]
    }
}

/// The site router over fresh in-memory stores, plus the state handle
/// behind it for seeding data directly.
pub async fn test_app() -> (Router, AppState) {
    let data = connect_data_store("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    let cache = connect_cache_store("memory")
        .await
        .expect("Failed to open in-memory cache");

    let users = UserStore::new(data.clone());
    users.init().await.expect("Failed to create user tables");
    let snippets = SnippetStore::new(data);
    snippets
        .init()
        .await
        .expect("Failed to create snippet tables");

    let state = AppState::new(users, snippets, SessionManager::new(cache));
    (router(state.clone()), state)
}
