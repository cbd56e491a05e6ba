use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tower_http::timeout::TimeoutLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long a handler may take before the request is aborted. An aborted
/// request commits no session write.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);
/// How long reading a request's header block may take.
const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(5);
/// Idle allowance for HTTP/2 keep-alive pings.
const KEEP_ALIVE_TIMEOUT: Duration = Duration::from_secs(60);

pub(crate) async fn serve_https(addr: SocketAddr, app: Router) -> std::io::Result<()> {
    let cert = std::env::var("PASTEBOX_TLS_CERT").unwrap_or_else(|_| "./tls/cert.pem".to_string());
    let key = std::env::var("PASTEBOX_TLS_KEY").unwrap_or_else(|_| "./tls/key.pem".to_string());
    let tls_config = RustlsConfig::from_pem_file(cert, key).await?;

    let mut server = axum_server::bind_rustls(addr, tls_config);
    server
        .http_builder()
        .http1()
        .header_read_timeout(HEADER_READ_TIMEOUT)
        .http2()
        .keep_alive_timeout(KEEP_ALIVE_TIMEOUT);

    let app = app.layer(TimeoutLayer::new(RESPONSE_TIMEOUT));

    tracing::info!("HTTPS server listening on {}", addr);
    server
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await
}

pub(crate) fn init_tracing(app_name: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        #[cfg(debug_assertions)]
        {
            format!("pastebox=debug,pastebox_axum=debug,{app_name}=debug,info").into()
        }

        #[cfg(not(debug_assertions))]
        {
            "info".into()
        }
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("You can increase verbosity by setting the RUST_LOG environment variable.");
}
