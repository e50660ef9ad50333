use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bulletin_api::{build_router, config::Config, db, AppState};

/// Allow the configured site, its subdomains, and local development origins.
fn origin_allowed(origin: &str, base: &str) -> bool {
    if origin.starts_with("http://localhost") || origin.starts_with("http://127.0.0.1") {
        return true;
    }
    if origin == base {
        return true;
    }
    if let Some(idx) = base.find("://") {
        let after_scheme = &base[idx + 3..];
        let domain = after_scheme.split('/').next().unwrap_or(after_scheme);
        let domain = domain.split(':').next().unwrap_or(domain);
        if origin.ends_with(&format!(".{domain}")) {
            return true;
        }
    }
    false
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store = db::connect(
        &config.mongodb_uri,
        &config.mongodb_database,
        &config.announcements_collection,
    )
    .await?;
    info!(
        "MongoDB connected ({}.{})",
        config.mongodb_database, config.announcements_collection
    );

    let state = AppState { store: Arc::new(store) };

    let base = config.app_base_url.clone();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|o| origin_allowed(o, &base))
                .unwrap_or(false)
        }));

    let app = build_router(state, &config.jwt_secret).layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Bulletin API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
