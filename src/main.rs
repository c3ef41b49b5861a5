//! Duetick Server: reminders with email notifications.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use duetick_core::config::AppConfig;
use duetick_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("DUETICK_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Duetick v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db_pool = duetick_database::connection::create_pool(&config.database).await?;
    duetick_database::migration::run_migrations(&db_pool).await?;

    // ── Step 2: Initialize repositories ──────────────────────────
    let user_repo = Arc::new(duetick_database::repositories::user::UserRepository::new(
        db_pool.clone(),
    ));
    let reminder_repo = Arc::new(
        duetick_database::repositories::reminder::ReminderRepository::new(db_pool.clone()),
    );

    // ── Step 3: Initialize auth system ───────────────────────────
    let password_hasher = Arc::new(duetick_auth::password::PasswordHasher::default());
    let password_validator = Arc::new(duetick_auth::password::PasswordValidator::new(&config.auth));
    let jwt_encoder = Arc::new(duetick_auth::jwt::JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(duetick_auth::jwt::JwtDecoder::new(&config.auth));
    let oauth_client = Arc::new(duetick_auth::oauth::OAuthClient::new(config.oauth.clone()));

    // ── Step 4: Initialize mailer ────────────────────────────────
    // A broken SMTP setup is a deploy problem; surface it at startup
    // instead of on the first notification cycle.
    let mailer = Arc::new(duetick_mailer::SmtpMailer::new(&config.smtp)?);

    // ── Step 5: Initialize services ──────────────────────────────
    let auth_service = Arc::new(duetick_service::AuthService::new(
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&password_validator),
        Arc::clone(&jwt_encoder),
        Arc::clone(&jwt_decoder),
        Arc::clone(&oauth_client),
    ));
    let reminder_service = Arc::new(duetick_service::ReminderService::new(Arc::clone(
        &reminder_repo,
    )));
    let user_service = Arc::new(duetick_service::UserService::new(Arc::clone(&user_repo)));

    tracing::info!("Services initialized");

    // ── Step 6: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 7: Start notification worker ────────────────────────
    let worker_handle = if config.worker.enabled {
        let dispatcher = duetick_worker::EmailDispatcher::new(
            reminder_repo.clone(),
            user_repo.clone(),
            mailer.clone(),
            config.worker.concurrency,
        );
        let runner = duetick_worker::NotifierRunner::new(
            reminder_repo.clone(),
            dispatcher,
            config.worker.clone(),
        );

        let worker_cancel = shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            runner.run(worker_cancel).await;
        });

        tracing::info!("Notification worker started");
        Some(handle)
    } else {
        tracing::info!("Notification worker disabled");
        None
    };

    // ── Step 8: Build and start HTTP server ──────────────────────
    let app_state = duetick_api::AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        jwt_decoder: Arc::clone(&jwt_decoder),
        auth_service: Arc::clone(&auth_service),
        reminder_service: Arc::clone(&reminder_service),
        user_service: Arc::clone(&user_service),
    };

    let app = duetick_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Duetick server listening on {addr}");

    // ── Step 9: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 10: Wait for the worker to finish its cycle ─────────
    if let Some(handle) = worker_handle {
        tracing::info!("Waiting for in-flight notifications...");
        let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Notification worker did not stop within the grace period");
        }
    }

    tracing::info!("Duetick server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
