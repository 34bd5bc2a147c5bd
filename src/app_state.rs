use std::sync::Arc;

use crate::engine::ListingEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ListingEngine>,
}

impl AppState {
    pub fn new(engine: ListingEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
