pub mod adapters;
pub mod config;
pub mod domain;
pub mod services;

use {
    adapters::kassa_client::KassaClient, services::dispatcher::NotificationDispatcher,
    std::sync::Arc,
};

#[derive(Clone)]
pub struct AppState {
    pub kassa: Arc<KassaClient>,
    pub dispatcher: Arc<NotificationDispatcher>,
}
