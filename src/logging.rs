use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Set up tracing on stderr. An explicit `level` wins over `RUST_LOG`;
/// with neither, only this crate's info-and-up events are shown.
pub fn setup_tracing(level: Option<&str>) {
    let default_filter = || EnvFilter::new(format!("wsreloc={}", level.unwrap_or("info")));

    let filter = if level.is_some() {
        default_filter()
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(env_filter) => env_filter,
            Err(_) => default_filter(),
        }
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}
