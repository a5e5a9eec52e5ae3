use crate::api::ApiClient;
use crate::config::{DashboardConfig, PanelSettings};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub client: ApiClient,
    pub panel: Arc<PanelSettings>,
}

impl AppState {
    pub fn new(client: ApiClient, panel: PanelSettings) -> Self {
        Self {
            client,
            panel: Arc::new(panel),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(ApiClient::new(&config.api_url), config.panel.clone())
    }
}
