use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "analytics_service=info,sqlx=warn";

/// Install the global fmt subscriber. `RUST_LOG` replaces the default
/// directives entirely. Calling this twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
