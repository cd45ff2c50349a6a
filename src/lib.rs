use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod errors;
pub mod http_client;
pub mod logging;
pub mod mcp;
pub mod transport;

use http_client::HttpClient;

/// Shared by every request task; holds nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub http_client: Arc<dyn HttpClient>,
}

impl AppState {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }
}
