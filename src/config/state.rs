// Application state module
// Shared state handed to every connection task

use super::types::Config;
use crate::metrics::AppMetrics;

/// Application state
pub struct AppState {
    pub config: Config,
    pub metrics: AppMetrics,
}

impl AppState {
    /// Create `AppState` with the metric registry set up once at startup.
    /// The `app_info` version label comes from the crate version.
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            metrics: AppMetrics::new(env!("CARGO_PKG_VERSION")),
        }
    }
}
