pub mod audio;
pub mod config;
pub mod error;
pub mod provider;
pub mod services;
pub mod web;

use std::sync::Arc;

use config::Settings;
use provider::ClientFactory;

// App state structure
pub struct AppState {
    pub settings: Settings,
    pub provider: Arc<dyn ClientFactory>,
}

impl AppState {
    pub fn new(settings: Settings, provider: Arc<dyn ClientFactory>) -> Self {
        Self { settings, provider }
    }
}
