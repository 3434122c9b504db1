use std::sync::{Arc, Mutex};

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use screenbook::config::AppConfig;
use screenbook::db;
use screenbook::handlers;
use screenbook::services::auth::firebase::FirebaseCredentialService;
use screenbook::services::notify::brevo::BrevoNotifier;
use screenbook::services::notify::log::LogNotifier;
use screenbook::services::notify::Notifier;
use screenbook::services::seed;
use screenbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    let conn = db::init_db(&config.database_url)?;
    if config.seed_screens {
        seed::seed_screens(&conn)?;
    }
    let purged = db::queries::purge_expired_sessions(&conn)?;
    if purged > 0 {
        tracing::info!(purged, "removed expired sessions");
    }

    let notifier: Box<dyn Notifier> = if config.brevo_api_key.is_empty() {
        tracing::warn!("BREVO_API_KEY not set, confirmation emails will only be logged");
        Box::new(LogNotifier)
    } else {
        tracing::info!(sender = %config.email_sender_address, "using Brevo for confirmation emails");
        Box::new(BrevoNotifier::new(
            config.brevo_api_key.clone(),
            config.email_sender_name.clone(),
            config.email_sender_address.clone(),
        ))
    };

    if config.firebase_api_key.is_empty() {
        tracing::warn!("FIREBASE_API_KEY not set, customer sign-in will fail");
    }
    if config.admin_password_hash.is_empty() {
        tracing::warn!("ADMIN_PASSWORD_HASH not set, staff login is disabled");
    }
    tracing::info!(timezone = %config.venue_tz, "venue timezone");

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        notifier,
        credentials: Box::new(FirebaseCredentialService::new(config.firebase_api_key.clone())),
    });

    let app = handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
