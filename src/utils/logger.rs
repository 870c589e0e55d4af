// Logger initialization and the diagnostic sink used by the relay

use crate::types::Progress;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Calling this twice is harmless; the
/// second attempt is ignored.
pub fn init_logger(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Where the fire-and-forget relay reports what it cannot return.
pub trait DiagnosticSink: Send + Sync {
    /// A failure that ends the relay. Called at most once per relay.
    fn failure(&self, message: &str);

    /// Download progress; informational only.
    fn progress(&self, progress: Progress);
}

/// Default sink: forwards to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn failure(&self, message: &str) {
        error!("{}", message);
    }

    fn progress(&self, progress: Progress) {
        debug!("Downloading file: {}", progress);
    }
}
