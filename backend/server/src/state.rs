use std::sync::Arc;

use tokio::sync::Mutex;

use super::{config::Config, store::ProjectStore};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ProjectStore>,
    /// Held across every load/mutate/save so concurrent requests never interleave on the file.
    pub store_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ProjectStore>) -> Arc<Self> {
        Arc::new(Self {
            config,
            store,
            store_lock: Mutex::new(()),
        })
    }
}
