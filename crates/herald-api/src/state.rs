use std::sync::Arc;

use herald_dispatch::DispatchEngine;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub engine: DispatchEngine,
}

impl AppStateInner {
    pub fn new(engine: DispatchEngine) -> AppState {
        Arc::new(Self { engine })
    }
}
