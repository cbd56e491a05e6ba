mod server;

use std::net::SocketAddr;

use dotenvy::dotenv;

use pastebox_axum::{
    AppState, SessionManager, SnippetStore, UserStore, connect_cache_store, connect_data_store,
    router,
};

use server::{init_tracing, serve_https};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install default CryptoProvider for rustls to prevent errors
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install default CryptoProvider");

    init_tracing("pastebox_web");

    dotenv().ok();

    let bind_addr: SocketAddr = std::env::var("PASTEBOX_BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:4000".to_string())
        .parse()?;
    let data_url =
        std::env::var("DATA_STORE_URL").unwrap_or_else(|_| "sqlite:pastebox.db".to_string());
    let session_url = std::env::var("SESSION_STORE").unwrap_or_else(|_| "memory".to_string());

    let data = connect_data_store(&data_url).await?;
    let cache = connect_cache_store(&session_url).await?;

    let users = UserStore::new(data.clone());
    users.init().await?;
    let snippets = SnippetStore::new(data);
    snippets.init().await?;

    let state = AppState::new(users, snippets, SessionManager::new(cache));
    let app = router(state);

    serve_https(bind_addr, app).await?;
    Ok(())
}
