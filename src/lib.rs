pub mod chart;
pub mod config;
pub mod db;
pub mod models;
pub mod records;
pub mod stats;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for embedding applications. Respects `RUST_LOG`,
/// falling back to the crate default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("intraop registry v{}", config::APP_VERSION);
}
