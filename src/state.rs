use crate::config::Config;
use crate::storage::DocumentStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<Mutex<DocumentStore>>,
}

impl AppState {
    pub fn new(config: Config, store: DocumentStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(Mutex::new(store)),
        }
    }
}
