use std::sync::Arc;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use taskone::cli::App;
use taskone::config::AppConfig;
use taskone::preferences::{LocaleStore, PreferenceManager};
use taskone::store::{Database, LibSqlBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let _log_guard = init_tracing(&config);

    eprintln!("TaskOne v{}", env!("CARGO_PKG_VERSION"));

    // ── Database ─────────────────────────────────────────────────────────
    let db: Arc<dyn Database> = Arc::new(
        LibSqlBackend::new_local(&config.db_path)
            .await
            .unwrap_or_else(|e| {
                eprintln!(
                    "Error: Failed to open database at {}: {}",
                    config.db_path.display(),
                    e
                );
                std::process::exit(1);
            }),
    );
    eprintln!("   Database: {}", config.db_path.display());

    // ── Preferences ──────────────────────────────────────────────────────
    let prefs = Arc::new(PreferenceManager::load(Arc::clone(&db), config.user_id.clone()).await?);
    let locale = LocaleStore::load(db, config.user_id.clone(), config.default_language).await?;
    eprintln!(
        "   Onboarding: {}",
        if prefs.is_onboarding_completed() {
            "completed"
        } else {
            "not completed"
        }
    );
    eprintln!("   Language: {}", locale.language());
    eprintln!("   Type 'help' for commands.\n");

    let (app, completions) = App::new(prefs, locale);
    app.run(completions).await?;

    Ok(())
}

/// Log to stderr, and to a daily file when a log directory is configured.
///
/// The returned guard must stay alive for the file writer to flush.
fn init_tracing(config: &AppConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "taskone.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}
