use std::sync::Arc;

use crate::config::WebhookConfig;
use crate::finalizers::OrderFinalizer;
use crate::orders::OrderStore;

/// Shared app state for Axum handlers. The store is optional so the server
/// can start and report health when the database is not running.
#[derive(Clone)]
pub struct AppState {
    pub store: Option<Arc<dyn OrderStore>>,
    pub finalizer: Arc<dyn OrderFinalizer>,
    pub config: WebhookConfig,
}
