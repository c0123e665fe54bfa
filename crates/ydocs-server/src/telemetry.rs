use color_eyre::owo_colors::OwoColorize;
use std::fmt;
use tracing::Subscriber;
use tracing_error::ErrorLayer;
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Registry, fmt::Layer, layer::SubscriberExt};

/// `RUST_LOG` wins over `env_filter` when set.
pub fn get_subscriber(env_filter: String) -> impl Subscriber + Send + Sync {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));

    Registry::default()
        .with(env_filter)
        .with(
            Layer::new()
                .compact()
                .with_ansi(true)
                .with_timer(YdocsTimer::new())
                .with_writer(std::io::stderr),
        )
        .with(ErrorLayer::default())
}

/// # Errors
/// Fails if a global logger or subscriber has already been installed.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync + 'static) -> eyre::Result<()> {
    LogTracer::init().map_err(|err| eyre::eyre!("Failed to set logger: {err}"))?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

struct YdocsTimer;

impl YdocsTimer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for YdocsTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl tracing_subscriber::fmt::time::FormatTime for YdocsTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let datetime = chrono::Local::now().format("%H:%M:%S");
        write!(w, "{}", datetime.bright_blue())
    }
}
