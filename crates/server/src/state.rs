use std::sync::Arc;

use ruler_rules::store::MemoryStore;
use ruler_rules::RulerService;

/// Shared state handed to every handler.
pub struct AppState {
    pub ruler: RulerService,
}

impl AppState {
    pub fn new(ruler: RulerService) -> Self {
        Self { ruler }
    }

    /// State backed by an in-memory store that also resolves namespaces.
    pub fn with_memory_store(store: Arc<MemoryStore>) -> Self {
        Self::new(RulerService::from_memory(store))
    }
}
