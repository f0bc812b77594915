use crate::config::ViewConfig;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// View settings applied when a request does not override them
    pub view_defaults: ViewConfig,
}

impl AppState {
    pub fn new(view_defaults: ViewConfig) -> Self {
        Self { view_defaults }
    }
}
